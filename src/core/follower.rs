//! The cursor controller.
//!
//! [`Follower`] owns the cursor subtree inside a [`Dom`], reacts to pointer
//! events on its container and advances its motion on every [`Follower::tick`].
//! It never schedules anything by itself: timers and tweens are resolved
//! against `Dom::now` whenever the frame driver ticks it.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::interpolation::EasingFunction;
use crate::animation::tweening::Tween;
use crate::core::config::FollowerOptions;
use crate::core::constants;
use crate::core::geo::Point;
use crate::core::timers::{TimerAction, TimerSlot, Timers};
use crate::dom::{Dom, MediaKind, Transform};
use crate::input::dataset::CursorParams;
use crate::input::events::{PointerEvent, PointerEventType};
use crate::input::handler::{self, EventKind, EventManager, FollowerEvent, ListenerId, SharedEvents};
use crate::prelude::HashSet;
use crate::Result;

/// Display mode, derived from the root element's state classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Plain,
    Text,
    Icon,
    Media,
}

/// One position tween and the raw pointer it was started for
#[derive(Debug, Clone)]
struct MotionTween {
    tween: Tween<Point>,
    pointer: Point,
}

/// Dataset values that carry content must be non-empty to count
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// CSS selector matching every class of a (possibly multi-class) class name
fn class_selector(class_name: &str) -> String {
    class_name
        .split_whitespace()
        .map(|class| format!(".{}", class))
        .collect()
}

pub struct Follower<D: Dom> {
    options: FollowerOptions,
    dom: D,
    easing: EasingFunction,

    el: Option<D::Node>,
    container: Option<D::Node>,
    inner: Option<D::Node>,
    text: Option<D::Node>,
    media_box: Option<D::Node>,
    media_img: Option<D::Node>,
    media_video: Option<D::Node>,

    pos: Point,
    vel: Point,
    stick: Option<Point>,
    skewing: f64,
    skew_tween: Option<Tween<f64>>,
    motion: Vec<MotionTween>,
    visible: bool,

    timers: Timers,
    bindings: HashSet<PointerEventType>,
    first_move_pending: bool,
    events: SharedEvents,
    /// Events held back for delivery once the follower is released
    queued: Option<Vec<FollowerEvent>>,

    transform: Transform,
    inner_transform: Transform,
    destroyed: bool,
}

impl<D: Dom> Follower<D> {
    /// Build a follower, resolving `el` and `container` from the option selectors.
    pub fn new(dom: D, options: FollowerOptions) -> Result<Self> {
        let container = match options.container.as_deref() {
            Some(selector) => dom.query_selector(selector),
            None => dom.body(),
        };
        let el = options
            .el
            .as_deref()
            .and_then(|selector| dom.query_selector(selector));
        Self::with_nodes(dom, options, container, el)
    }

    /// Build a follower on explicit nodes. Without `el` the cursor subtree is
    /// created and appended to `container`.
    pub fn with_nodes(
        dom: D,
        options: FollowerOptions,
        container: Option<D::Node>,
        el: Option<D::Node>,
    ) -> Result<Self> {
        let options = options.resolved();
        let pos = match options.initial_pos {
            Some([x, y]) => Point::new(x, y),
            None => {
                let viewport = dom.viewport_size();
                Point::new(-viewport.x, -viewport.y)
            }
        };

        let mut follower = Self {
            easing: options.easing(),
            skewing: options.skewing,
            options,
            dom,
            el: None,
            container,
            inner: None,
            text: None,
            media_box: None,
            media_img: None,
            media_video: None,
            pos,
            vel: Point::default(),
            stick: None,
            skew_tween: None,
            motion: Vec::new(),
            visible: false,
            timers: Timers::new(),
            bindings: HashSet::default(),
            first_move_pending: false,
            events: Rc::new(RefCell::new(EventManager::new())),
            queued: None,
            transform: Transform::translate(pos),
            inner_transform: Transform::default(),
            destroyed: false,
        };

        match el {
            Some(el) => follower.adopt(el),
            None => follower.create()?,
        }
        follower.bind();
        follower.render(true);
        Ok(follower)
    }

    fn create(&mut self) -> Result<()> {
        let dom = &mut self.dom;
        let options = &self.options;

        let el = dom.create_element("div")?;
        dom.set_class_name(&el, &options.class_name);
        dom.add_classes(&el, &options.hidden_state);

        let inner = dom.create_element("div")?;
        dom.set_class_name(&inner, &options.inner_class_name);
        let text = dom.create_element("div")?;
        dom.set_class_name(&text, &options.text_class_name);
        let media = dom.create_element("div")?;
        dom.set_class_name(&media, &options.media_class_name);
        let media_box = dom.create_element("div")?;
        dom.set_class_name(&media_box, &options.media_box_class_name);

        dom.append_child(&media, &media_box);
        dom.append_child(&inner, &media);
        dom.append_child(&inner, &text);
        dom.append_child(&el, &inner);
        if let Some(container) = &self.container {
            dom.append_child(container, &el);
        }

        self.el = Some(el);
        self.inner = Some(inner);
        self.text = Some(text);
        self.media_box = Some(media_box);
        Ok(())
    }

    /// Take over existing markup, looking its parts up by class name
    fn adopt(&mut self, el: D::Node) {
        let find = |class_name: &str| {
            self.dom
                .query_selector_within(&el, &class_selector(class_name))
        };
        let inner = find(&self.options.inner_class_name);
        let text = find(&self.options.text_class_name);
        let media_box = find(&self.options.media_box_class_name);
        self.inner = inner;
        self.text = text;
        self.media_box = media_box;
        log::debug!(
            "adopted cursor element {:?} (inner: {}, text: {}, media box: {})",
            el,
            self.inner.is_some(),
            self.text.is_some(),
            self.media_box.is_some()
        );
        self.el = Some(el);
    }

    fn bind(&mut self) {
        if self.container.is_none() {
            log::warn!("no container found, pointer events will not be bound");
            return;
        }
        let options = &self.options;
        let mut bind = |event_type| {
            self.bindings.insert(event_type);
        };

        if options.hide_on_leave {
            bind(PointerEventType::MouseLeave);
        }
        if options.visible {
            bind(PointerEventType::MouseEnter);
        }
        if options.active_state.is_some() {
            bind(PointerEventType::MouseDown);
            bind(PointerEventType::MouseUp);
        }
        bind(PointerEventType::MouseMove);
        if options.tracks_hover() {
            bind(PointerEventType::MouseOver);
            bind(PointerEventType::MouseOut);
        }
        self.first_move_pending = options.visible;
    }

    /// Pointer event types the host should forward to [`Follower::handle_event`]
    pub fn bound_events(&self) -> Vec<PointerEventType> {
        PointerEventType::ALL
            .into_iter()
            .filter(|event_type| self.bindings.contains(event_type))
            .collect()
    }

    /// Entry point for pointer events raised on the container.
    ///
    /// Events of a type that is not bound are ignored.
    pub fn handle_event(&mut self, event: PointerEvent<D::Node>) {
        if self.destroyed || !self.bindings.contains(&event.event_type()) {
            return;
        }

        match event {
            PointerEvent::MouseLeave => self.hide(),
            PointerEvent::MouseEnter => self.show(),
            PointerEvent::MouseDown => {
                if let Some(state) = self.options.active_state.clone() {
                    self.add_state(&state);
                }
            }
            PointerEvent::MouseUp => {
                if let Some(state) = self.options.active_state.clone() {
                    self.remove_state(&state);
                }
            }
            PointerEvent::MouseMove { position } => {
                self.on_move(position);
                if self.first_move_pending {
                    self.first_move_pending = false;
                    self.show();
                }
            }
            PointerEvent::MouseOver {
                target,
                related_target,
            } => self.on_hover(target, related_target, true),
            PointerEvent::MouseOut {
                target,
                related_target,
            } => self.on_hover(target, related_target, false),
        }
    }

    fn on_move(&mut self, pointer: Point) {
        let target = match &self.stick {
            Some(stick) => pointer.pulled_toward(stick, self.options.stick_delta),
            None => pointer,
        };
        let duration = if self.visible {
            self.options.speed_ms()
        } else {
            0.0
        };
        if self.options.overwrite {
            self.motion.clear();
        }

        let now = self.dom.now();
        let mut motion = MotionTween {
            tween: Tween::with_easing(self.pos, target, duration, self.easing).started(now),
            pointer,
        };
        // Instant moves land immediately instead of waiting for the next frame
        if duration <= 0.0 {
            if let Some(pos) = motion.tween.update(now) {
                self.pos = pos;
                self.vel = pointer.subtract(&pos);
            }
            return;
        }
        self.motion.push(motion);
    }

    /// Walk from `target` up to the container, applying detection rules and
    /// data attributes of every node the pointer really entered or left.
    fn on_hover(&mut self, target: D::Node, related: Option<D::Node>, entering: bool) {
        let mut current = Some(target);
        while let Some(node) = current {
            if self.container.as_ref() == Some(&node) {
                break;
            }
            if related
                .as_ref()
                .is_some_and(|related| self.dom.contains(&node, related))
            {
                break;
            }

            let states: Vec<String> = self
                .options
                .detection_rules()
                .filter(|(_, selector)| self.dom.matches(&node, selector))
                .map(|(state, _)| state.to_string())
                .collect();
            for state in states {
                if entering {
                    self.add_state(&state);
                } else {
                    self.remove_state(&state);
                }
            }

            if let Some(attr) = self.options.data_attr.clone() {
                let params = CursorParams::from_node(&self.dom, &node, &attr);
                if entering {
                    self.apply_params(&params, &node);
                } else {
                    self.revert_params(&params);
                }
            }

            current = self.dom.parent(&node);
        }
    }

    fn apply_params(&mut self, params: &CursorParams, node: &D::Node) {
        if let Some(state) = non_empty(&params.state) {
            self.add_state(state);
        }
        if let Some(text) = non_empty(&params.text) {
            self.set_text(text);
        }
        if let Some(icon) = non_empty(&params.icon) {
            self.set_icon(icon, "");
        }
        if let Some(img) = non_empty(&params.img) {
            self.set_img(img);
        }
        if let Some(video) = non_empty(&params.video) {
            self.set_video(video);
        }
        if params.show.is_some() {
            self.show();
        }
        match params.stick.as_deref() {
            Some("") => self.set_stick(node),
            Some(selector) => self.set_stick_selector(selector),
            None => {}
        }
    }

    fn revert_params(&mut self, params: &CursorParams) {
        if let Some(state) = non_empty(&params.state) {
            self.remove_state(state);
        }
        if non_empty(&params.text).is_some() {
            self.remove_text();
        }
        if non_empty(&params.icon).is_some() {
            self.remove_icon();
        }
        if non_empty(&params.img).is_some() {
            self.remove_img();
        }
        if non_empty(&params.video).is_some() {
            self.remove_video();
        }
        if params.show.is_some() {
            self.hide();
        }
        if params.stick.is_some() {
            self.remove_stick();
        }
    }

    /// Advance timers and tweens to `Dom::now`, then render.
    pub fn tick(&mut self) {
        if self.destroyed {
            return;
        }
        let now = self.dom.now();

        for action in self.timers.take_due(now) {
            self.run_timer(action);
        }

        for motion in &mut self.motion {
            if let Some(pos) = motion.tween.update(now) {
                self.pos = pos;
                self.vel = motion.pointer.subtract(&pos);
            }
        }
        self.motion.retain(|motion| motion.tween.is_running());

        if let Some(tween) = &mut self.skew_tween {
            if let Some(skewing) = tween.update(now) {
                self.skewing = skewing;
            }
        }
        if self.skew_tween.as_ref().is_some_and(|tween| !tween.is_running()) {
            self.skew_tween = None;
        }

        self.render(false);
    }

    fn run_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::Reveal => {
                if let Some(el) = &self.el {
                    self.dom.remove_classes(el, &self.options.hidden_state);
                }
                self.visible = true;
                self.render(true);
            }
            TimerAction::MarkHidden => self.visible = false,
            TimerAction::ApplyMediaState => {
                let state = self.options.media_state.clone();
                self.add_state(&state);
            }
            TimerAction::ClearMediaBox => {
                if let Some(media_box) = &self.media_box {
                    self.dom.clear_children(media_box);
                }
            }
        }
    }

    /// Write position and skew to the cursor.
    ///
    /// An unforced render with no velocity only releases the compositor hint.
    pub fn render(&mut self, force: bool) {
        let Some(el) = self.el.clone() else {
            return;
        };
        if !force && self.vel.is_zero() {
            self.dom.set_will_change(&el, "auto");
            return;
        }

        self.emit(FollowerEvent::Render);
        self.dom.set_will_change(&el, "transform");
        self.transform.x = self.pos.x;
        self.transform.y = self.pos.y;

        if self.skewing != 0.0 {
            let scale = (self.vel.length() * self.options.skewing_delta)
                .min(self.options.skewing_delta_max)
                * self.skewing;
            let angle = self.vel.angle_degrees();

            self.transform.rotation = angle;
            self.transform.scale_x = 1.0 + scale;
            self.transform.scale_y = 1.0 - scale;
            self.inner_transform.rotation = -angle;
            if let Some(inner) = &self.inner {
                self.dom.set_transform(inner, &self.inner_transform);
            }
        }
        self.dom.set_transform(&el, &self.transform);
    }

    pub fn show(&mut self) {
        self.emit(FollowerEvent::Show);
        let due = self.dom.now() + self.options.show_timeout;
        self.timers
            .schedule(TimerSlot::Visibility, due, TimerAction::Reveal);
    }

    pub fn hide(&mut self) {
        self.emit(FollowerEvent::Hide);
        if let Some(el) = &self.el {
            self.dom.add_classes(el, &self.options.hidden_state);
        }
        let due = self.dom.now() + self.options.hide_timeout;
        self.timers
            .schedule(TimerSlot::Visibility, due, TimerAction::MarkHidden);
    }

    /// Show or hide; `None` flips the current visibility
    pub fn toggle(&mut self, force: Option<bool>) {
        if force.unwrap_or(!self.visible) {
            self.show();
        } else {
            self.hide();
        }
    }

    /// Add one or more space-separated state classes
    pub fn add_state(&mut self, state: &str) {
        self.emit(FollowerEvent::AddState(state.to_string()));
        if state == self.options.hidden_state {
            return self.hide();
        }
        if let Some(el) = &self.el {
            self.dom.add_classes(el, state);
        }
        if self.options.visible_on_state {
            self.show();
        }
    }

    pub fn remove_state(&mut self, state: &str) {
        self.emit(FollowerEvent::RemoveState(state.to_string()));
        if state == self.options.hidden_state {
            return self.show();
        }
        let Some(el) = &self.el else {
            return;
        };
        self.dom.remove_classes(el, state);
        if self.options.visible_on_state && self.dom.class_name(el) == self.options.class_name {
            self.hide();
        }
    }

    /// Add or remove; `None` decides by whether the state is currently set
    pub fn toggle_state(&mut self, state: &str, force: Option<bool>) {
        if force.unwrap_or_else(|| !self.has_state(state)) {
            self.add_state(state);
        } else {
            self.remove_state(state);
        }
    }

    /// Whether every class of `state` is on the root element
    pub fn has_state(&self, state: &str) -> bool {
        let Some(el) = &self.el else {
            return false;
        };
        let mut classes = state.split_whitespace().peekable();
        classes.peek().is_some() && classes.all(|class| self.dom.has_class(el, class))
    }

    pub fn mode(&self) -> Mode {
        if self.has_state(&self.options.media_state) {
            Mode::Media
        } else if self.has_state(&self.options.icon_state) {
            Mode::Icon
        } else if self.has_state(&self.options.text_state) {
            Mode::Text
        } else {
            Mode::Plain
        }
    }

    /// Ease the skew factor to `value`
    pub fn set_skewing(&mut self, value: f64) {
        let now = self.dom.now();
        self.skew_tween = Some(
            Tween::with_easing(
                self.skewing,
                value,
                constants::SKEWING_TWEEN_MS,
                EasingFunction::EaseOutQuad,
            )
            .started(now),
        );
    }

    /// Ease the skew factor back to the configured one
    pub fn remove_skewing(&mut self) {
        self.set_skewing(self.options.skewing);
    }

    /// Anchor motion to the center of `node`
    pub fn set_stick(&mut self, node: &D::Node) {
        if let Some(rect) = self.dom.bounding_rect(node) {
            self.stick = Some(rect.center());
        }
    }

    /// Anchor motion to the first element matching `selector`, if any
    pub fn set_stick_selector(&mut self, selector: &str) {
        match self.dom.query_selector(selector) {
            Some(node) => self.set_stick(&node),
            None => log::debug!("stick target '{}' not found", selector),
        }
    }

    pub fn remove_stick(&mut self) {
        self.stick = None;
    }

    pub fn set_text(&mut self, text: &str) {
        if let Some(node) = &self.text {
            self.dom.set_inner_html(node, text);
        }
        let state = self.options.text_state.clone();
        self.add_state(&state);
        self.set_skewing(self.options.skewing_text);
    }

    pub fn remove_text(&mut self) {
        let state = self.options.text_state.clone();
        self.remove_state(&state);
        self.remove_skewing();
    }

    /// Show an icon from the configured SVG sprite
    pub fn set_icon(&mut self, name: &str, style: &str) {
        let options = &self.options;
        let svg = format!(
            "<svg class='{} {}{}' style='{}'><use xlink:href='{}#{}'></use></svg>",
            options.icon_svg_class_name,
            options.icon_svg_name_prefix,
            name,
            style,
            options.icon_svg_src,
            name
        );
        if let Some(node) = &self.text {
            self.dom.set_inner_html(node, &svg);
        }
        let state = self.options.icon_state.clone();
        self.add_state(&state);
        self.set_skewing(self.options.skewing_icon);
    }

    pub fn remove_icon(&mut self) {
        let state = self.options.icon_state.clone();
        self.remove_state(&state);
        self.remove_skewing();
    }

    /// Put `node` in the media box; the media state follows shortly after
    pub fn set_media(&mut self, node: Option<&D::Node>) {
        self.timers.cancel(TimerSlot::Media);
        if let (Some(node), Some(media_box)) = (node, &self.media_box) {
            self.dom.clear_children(media_box);
            self.dom.append_child(media_box, node);
        }
        let due = self.dom.now() + constants::MEDIA_STATE_DELAY_MS;
        self.timers
            .schedule(TimerSlot::Media, due, TimerAction::ApplyMediaState);
        self.set_skewing(self.options.skewing_media);
    }

    pub fn remove_media(&mut self) {
        self.timers.cancel(TimerSlot::Media);
        let state = self.options.media_state.clone();
        self.remove_state(&state);
        let due = self.dom.now() + self.options.hide_media_timeout;
        self.timers
            .schedule(TimerSlot::Media, due, TimerAction::ClearMediaBox);
        self.remove_skewing();
    }

    /// The cached media element of `kind`, created on first use
    fn media_element(&mut self, kind: MediaKind) -> Option<D::Node> {
        let cached = match kind {
            MediaKind::Image => &mut self.media_img,
            MediaKind::Video => &mut self.media_video,
        };
        if let Some(node) = cached.as_ref() {
            return Some(node.clone());
        }
        match self.dom.create_media(kind) {
            Ok(node) => {
                *cached = Some(node.clone());
                Some(node)
            }
            Err(err) => {
                log::warn!("could not create {:?} element: {}", kind, err);
                None
            }
        }
    }

    pub fn set_img(&mut self, url: &str) {
        let Some(img) = self.media_element(MediaKind::Image) else {
            return;
        };
        if self.dom.media_src(&img).as_deref() != Some(url) {
            self.dom.set_media_src(&img, url);
        }
        self.set_media(Some(&img));
    }

    pub fn remove_img(&mut self) {
        self.remove_media();
    }

    pub fn set_video(&mut self, url: &str) {
        let Some(video) = self.media_element(MediaKind::Video) else {
            return;
        };
        if self.dom.media_src(&video).as_deref() != Some(url) {
            self.dom.set_media_src(&video, url);
            self.dom.load_media(&video);
        }
        self.dom.play_media(&video);
        self.set_media(Some(&video));
    }

    pub fn remove_video(&mut self) {
        if let Some(video) = &self.media_video {
            if self.dom.media_ready_state(video) > constants::MEDIA_HAVE_CURRENT_DATA {
                self.dom.pause_media(video);
            }
        }
        self.remove_media();
    }

    /// Subscribe to a lifecycle event
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&FollowerEvent) + 'static,
    {
        self.events.borrow_mut().on(kind, callback)
    }

    pub fn off(&mut self, kind: EventKind, id: Option<ListenerId>) {
        self.events.borrow_mut().off(kind, id);
    }

    pub fn trigger(&self, event: &FollowerEvent) {
        handler::dispatch(&self.events, event);
    }

    fn emit(&mut self, event: FollowerEvent) {
        match &mut self.queued {
            Some(queue) => queue.push(event),
            None => handler::dispatch(&self.events, &event),
        }
    }

    /// Hold lifecycle events back until [`Follower::take_events`] instead of
    /// calling listeners in place.
    ///
    /// Shared followers use this so listeners run after the borrow is released
    /// and can call back into the follower. Listeners are then no longer
    /// cleared by [`Follower::destroy`]; whoever delivers the events does it.
    pub fn defer_events(&mut self) {
        self.queued.get_or_insert_with(Vec::new);
    }

    /// Drain the events held back since the last call
    pub fn take_events(&mut self) -> Vec<FollowerEvent> {
        self.queued.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// The listener table, for delivering taken events
    pub fn listeners(&self) -> SharedEvents {
        self.events.clone()
    }

    /// Tear down: unbind, drop timers and tweens, detach the cursor.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.emit(FollowerEvent::Destroy);
        self.bindings.clear();
        self.timers.clear();
        self.motion.clear();
        self.skew_tween = None;
        if self.queued.is_none() {
            self.events.borrow_mut().clear();
        }

        if let Some(el) = self.el.take() {
            if let Some(container) = &self.container {
                self.dom.remove_child(container, &el);
            }
            self.media_img = None;
            self.media_video = None;
        }
        self.destroyed = true;
        log::debug!("follower destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn velocity(&self) -> Point {
        self.vel
    }

    pub fn stick(&self) -> Option<Point> {
        self.stick
    }

    /// Current (possibly mid-tween) skew factor
    pub fn skewing(&self) -> f64 {
        self.skewing
    }

    /// Whether a position tween is still running
    pub fn is_moving(&self) -> bool {
        !self.motion.is_empty()
    }

    pub fn options(&self) -> &FollowerOptions {
        &self.options
    }

    pub fn el(&self) -> Option<&D::Node> {
        self.el.as_ref()
    }

    pub fn container(&self) -> Option<&D::Node> {
        self.container.as_ref()
    }

    pub fn inner(&self) -> Option<&D::Node> {
        self.inner.as_ref()
    }

    pub fn text(&self) -> Option<&D::Node> {
        self.text.as_ref()
    }

    pub fn media_box(&self) -> Option<&D::Node> {
        self.media_box.as_ref()
    }

    pub fn media_img(&self) -> Option<&D::Node> {
        self.media_img.as_ref()
    }

    pub fn media_video(&self) -> Option<&D::Node> {
        self.media_video.as_ref()
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }
}

impl<D: Dom + std::fmt::Debug> std::fmt::Debug for Follower<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Follower")
            .field("el", &self.el)
            .field("pos", &self.pos)
            .field("vel", &self.vel)
            .field("visible", &self.visible)
            .field("skewing", &self.skewing)
            .field("stick", &self.stick)
            .field("timers", &self.timers)
            .field("events", &self.events)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Rect;
    use crate::dom::virtual_dom::{ManualClock, NodeId, VirtualDom};

    fn follower(options: FollowerOptions) -> (Follower<VirtualDom>, ManualClock) {
        let clock = ManualClock::new();
        let dom = VirtualDom::with_clock(clock.clone());
        (Follower::new(dom, options).unwrap(), clock)
    }

    fn classes(follower: &Follower<VirtualDom>) -> String {
        follower
            .el()
            .map(|el| follower.dom().class_name(el))
            .unwrap_or_default()
    }

    #[test]
    fn test_creates_subtree_hidden() {
        let (follower, _) = follower(FollowerOptions::default());
        let dom = follower.dom();
        let el = *follower.el().unwrap();

        assert_eq!(classes(&follower), "mf-cursor -hidden");
        assert_eq!(dom.parent(&el), Some(dom.body_id()));
        let inner = dom.children(el)[0];
        assert_eq!(dom.class_name(&inner), "mf-cursor-inner");
        let parts: Vec<String> = dom
            .children(inner)
            .iter()
            .map(|node| dom.class_name(node))
            .collect();
        assert_eq!(parts, vec!["mf-cursor-media", "mf-cursor-text"]);
        assert_eq!(follower.position(), Point::new(-1280.0, -720.0));
        assert_eq!(dom.will_change(el), Some("transform"));
    }

    #[test]
    fn test_bindings_follow_options() {
        let (plain, _) = follower(FollowerOptions::default());
        assert_eq!(plain.bound_events(), PointerEventType::ALL.to_vec());

        let (minimal, _) = follower(FollowerOptions {
            visible: false,
            hide_on_leave: false,
            active_state: None,
            data_attr: None,
            state_detection: None,
            ..Default::default()
        });
        assert_eq!(minimal.bound_events(), vec![PointerEventType::MouseMove]);
    }

    #[test]
    fn test_first_move_shows_once() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        let shows = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = shows.clone();
        follower.on(EventKind::Show, move |_| counter.set(counter.get() + 1));

        for x in [10.0, 20.0, 30.0] {
            follower.handle_event(PointerEvent::MouseMove {
                position: Point::new(x, 5.0),
            });
        }
        assert_eq!(shows.get(), 1);
        // Hidden cursors jump straight to the pointer
        assert_eq!(follower.position(), Point::new(30.0, 5.0));

        clock.advance(16.0);
        follower.tick();
        assert!(follower.is_visible());
        assert_eq!(classes(&follower), "mf-cursor");
    }

    #[test]
    fn test_visible_move_eases() {
        let (mut follower, clock) = follower(FollowerOptions {
            initial_pos: Some([0.0, 0.0]),
            ..Default::default()
        });
        follower.show();
        follower.tick();
        assert!(follower.is_visible());

        follower.handle_event(PointerEvent::MouseMove {
            position: Point::new(100.0, 0.0),
        });
        clock.advance(100.0);
        follower.tick();
        let midway = follower.position();
        assert!(midway.x > 0.0 && midway.x < 100.0);
        assert_eq!(follower.velocity(), Point::new(100.0 - midway.x, 0.0));

        clock.advance(1000.0);
        follower.tick();
        assert_eq!(follower.position(), Point::new(100.0, 0.0));
        assert!(!follower.is_moving());
    }

    #[test]
    fn test_hide_is_debounced() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        follower.show();
        follower.tick();

        follower.hide();
        assert_eq!(classes(&follower), "mf-cursor -hidden");
        clock.advance(100.0);
        follower.show();
        clock.advance(400.0);
        follower.tick();
        assert!(follower.is_visible());
        assert_eq!(classes(&follower), "mf-cursor");
    }

    #[test]
    fn test_toggle_waits_for_show_timeout() {
        let (mut follower, clock) = follower(FollowerOptions {
            show_timeout: 100.0,
            ..Default::default()
        });
        follower.toggle(None);
        clock.advance(50.0);
        follower.tick();
        assert!(!follower.is_visible());
        clock.advance(60.0);
        follower.tick();
        assert!(follower.is_visible());

        follower.toggle(None);
        assert_eq!(classes(&follower), "mf-cursor -hidden");
        clock.advance(300.0);
        follower.tick();
        assert!(!follower.is_visible());

        follower.toggle(Some(false));
        assert!(!follower.is_visible());
        follower.toggle(Some(true));
        clock.advance(100.0);
        follower.tick();
        assert!(follower.is_visible());
        assert_eq!(classes(&follower), "mf-cursor");
    }

    /// Without overwrite a new move runs alongside the previous one, which
    /// is updated first, so the latest move decides where the cursor lands
    #[test]
    fn test_stacked_moves_settle_on_latest() {
        let (mut follower, clock) = follower(FollowerOptions {
            overwrite: false,
            initial_pos: Some([0.0, 0.0]),
            ..Default::default()
        });
        follower.show();
        follower.tick();

        follower.handle_event(PointerEvent::MouseMove {
            position: Point::new(100.0, 0.0),
        });
        clock.advance(100.0);
        follower.tick();
        follower.handle_event(PointerEvent::MouseMove {
            position: Point::new(0.0, 100.0),
        });
        clock.advance(100.0);
        follower.tick();
        assert!(follower.is_moving());

        clock.advance(1000.0);
        follower.tick();
        assert_eq!(follower.position(), Point::new(0.0, 100.0));
        assert!(follower.velocity().is_zero());
        assert!(!follower.is_moving());
    }

    #[test]
    fn test_bare_media_state() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        follower.set_media(None);
        let media_box = *follower.media_box().unwrap();
        assert!(follower.dom().children(media_box).is_empty());

        clock.advance(20.0);
        follower.tick();
        assert_eq!(follower.mode(), Mode::Media);
        clock.advance(500.0);
        follower.tick();
        assert_eq!(follower.skewing(), follower.options().skewing_media);
    }

    #[test]
    fn test_set_and_remove_skewing() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        follower.set_skewing(3.0);
        clock.advance(500.0);
        follower.tick();
        assert_eq!(follower.skewing(), 3.0);

        follower.remove_skewing();
        clock.advance(250.0);
        follower.tick();
        let halfway = follower.skewing();
        assert!(halfway > 0.0 && halfway < 3.0);
        clock.advance(250.0);
        follower.tick();
        assert_eq!(follower.skewing(), 0.0);
    }

    /// Empty attribute stems and active states count as disabled
    #[test]
    fn test_empty_options_bind_nothing() {
        let (follower, _) = follower(FollowerOptions {
            visible: false,
            hide_on_leave: false,
            active_state: Some(String::new()),
            data_attr: Some(String::new()),
            state_detection: None,
            ..Default::default()
        });
        assert_eq!(follower.bound_events(), vec![PointerEventType::MouseMove]);
    }

    #[test]
    fn test_toggle_state() {
        let (mut follower, _) = follower(FollowerOptions::default());
        follower.toggle_state("-inverse -large", None);
        assert!(follower.has_state("-inverse -large"));
        follower.toggle_state("-inverse -large", None);
        assert!(!follower.has_state("-inverse"));
        follower.toggle_state("-inverse", Some(false));
        assert!(!follower.has_state("-inverse"));
        assert!(!follower.has_state(""));
    }

    #[test]
    fn test_visible_on_state() {
        let (mut follower, clock) = follower(FollowerOptions {
            visible: false,
            visible_on_state: true,
            ..Default::default()
        });
        follower.add_state("-pointer");
        clock.advance(1.0);
        follower.tick();
        assert!(follower.is_visible());

        follower.remove_state("-pointer");
        assert_eq!(classes(&follower), "mf-cursor -hidden");
    }

    #[test]
    fn test_modes() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        assert_eq!(follower.mode(), Mode::Plain);

        follower.set_text("Hello");
        assert_eq!(follower.mode(), Mode::Text);
        let text = *follower.text().unwrap();
        assert_eq!(follower.dom().inner_html(text), "Hello");

        follower.set_icon("arrow", "fill: red");
        assert_eq!(follower.mode(), Mode::Icon);

        follower.set_img("/a.png");
        assert_eq!(follower.mode(), Mode::Icon);
        clock.advance(constants::MEDIA_STATE_DELAY_MS);
        follower.tick();
        assert_eq!(follower.mode(), Mode::Media);

        follower.remove_img();
        follower.remove_icon();
        follower.remove_text();
        assert_eq!(follower.mode(), Mode::Plain);
    }

    #[test]
    fn test_icon_markup() {
        let (mut follower, _) = follower(FollowerOptions {
            icon_svg_src: "/sprites.svg".to_string(),
            ..Default::default()
        });
        follower.set_icon("arrow", "color: red");
        let text = *follower.text().unwrap();
        assert_eq!(
            follower.dom().inner_html(text),
            "<svg class='mf-svgsprite -arrow' style='color: red'><use xlink:href='/sprites.svg#arrow'></use></svg>"
        );
    }

    #[test]
    fn test_skewing_tween() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        follower.set_text("Hi");
        clock.advance(250.0);
        follower.tick();
        let halfway = follower.skewing();
        assert!(halfway > 1.0 && halfway < 2.0);

        clock.advance(250.0);
        follower.tick();
        assert_eq!(follower.skewing(), 2.0);

        follower.remove_text();
        clock.advance(500.0);
        follower.tick();
        assert_eq!(follower.skewing(), 0.0);
    }

    #[test]
    fn test_skewed_render() {
        let (mut follower, clock) = follower(FollowerOptions {
            skewing: 1.0,
            initial_pos: Some([0.0, 0.0]),
            ..Default::default()
        });
        follower.show();
        follower.tick();
        follower.handle_event(PointerEvent::MouseMove {
            position: Point::new(0.0, 100.0),
        });
        clock.advance(50.0);
        follower.tick();

        let el = *follower.el().unwrap();
        let transform = follower.dom().transform(el).unwrap();
        assert!((transform.rotation - 90.0).abs() < 1e-9);
        assert!(transform.scale_x > 1.0);
        assert!((transform.scale_x + transform.scale_y - 2.0).abs() < 1e-9);
        let inner = *follower.inner().unwrap();
        let inner_rotation = follower.dom().transform(inner).unwrap().rotation;
        assert!((inner_rotation + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_idle_render_releases_hint() {
        let (mut follower, clock) = follower(FollowerOptions::default());
        clock.advance(16.0);
        follower.tick();
        let el = *follower.el().unwrap();
        assert_eq!(follower.dom().will_change(el), Some("auto"));
    }

    #[test]
    fn test_stick_selector() {
        let (mut follower, _) = follower(FollowerOptions::default());
        let body = follower.dom().body_id();
        let dom = follower.dom_mut();
        let button = dom.element_in(body, "button");
        dom.set_id(button, "go");
        dom.set_rect(button, Rect::new(100.0, 100.0, 50.0, 20.0));

        follower.set_stick_selector("#missing");
        assert_eq!(follower.stick(), None);
        follower.set_stick_selector("#go");
        assert_eq!(follower.stick(), Some(Point::new(125.0, 110.0)));
        follower.remove_stick();
        assert_eq!(follower.stick(), None);
    }

    #[test]
    fn test_adopts_existing_markup() {
        let mut dom = VirtualDom::new();
        let body = dom.body_id();
        let el = dom.element_in(body, "div");
        dom.set_id(el, "cursor");
        let inner = dom.element_in(el, "div");
        dom.set_class_name(&inner, "mf-cursor-inner");
        let text = dom.element_in(inner, "div");
        dom.set_class_name(&text, "mf-cursor-text");

        let mut follower = Follower::new(
            dom,
            FollowerOptions {
                el: Some("#cursor".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(follower.el(), Some(&el));
        assert_eq!(follower.text(), Some(&text));
        assert_eq!(follower.media_box(), None::<&NodeId>);
        assert_eq!(follower.dom().created_count("div"), 3);

        follower.set_text("Adopted");
        assert_eq!(follower.dom().inner_html(text), "Adopted");
    }

    #[test]
    fn test_class_selector() {
        assert_eq!(class_selector("mf-cursor"), ".mf-cursor");
        assert_eq!(class_selector("a  b"), ".a.b");
    }
}
