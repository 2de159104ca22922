//! JavaScript bindings
//!
//! `new MouseFollower(options)` builds a follower on the page, forwards the
//! container's pointer events to it and keeps a `requestAnimationFrame` loop
//! ticking the registered [`Ticker`](crate::Ticker) while any follower is alive.

use std::cell::{Cell, RefCell};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, MouseEvent};

use crate::animation::ticker;
use crate::core::config::FollowerOptions;
use crate::core::geo::Point;
use crate::core::handle::MouseFollower;
use crate::dom::web::WebDom;
use crate::input::events::{PointerEvent, PointerEventType};
use crate::input::handler::{EventKind, FollowerEvent, ListenerId};
use crate::FollowerError;

type PointerListener = Closure<dyn FnMut(MouseEvent)>;

thread_local! {
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static LOOP_RUNNING: Cell<bool> = const { Cell::new(false) };
}

/// Install the panic hook and route `log` to the browser console
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::debug!("mouse_follower initialized");
}

fn to_js(err: FollowerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn request_frame() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    FRAME_CALLBACK.with(|slot| {
        let mut slot = slot.borrow_mut();
        let callback = slot.get_or_insert_with(|| Closure::<dyn FnMut(f64)>::new(on_frame));
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        Ok(())
    })
}

fn on_frame(time: f64) {
    let ticker = ticker::ticker();
    ticker.tick(time);
    if ticker.is_empty() {
        // Idle until the next follower restarts the loop
        LOOP_RUNNING.with(|running| running.set(false));
        return;
    }
    if let Err(err) = request_frame() {
        log::warn!("requestAnimationFrame failed: {:?}", err);
        LOOP_RUNNING.with(|running| running.set(false));
    }
}

fn ensure_frame_loop() -> Result<(), JsValue> {
    if LOOP_RUNNING.with(Cell::get) {
        return Ok(());
    }
    request_frame()?;
    LOOP_RUNNING.with(|running| running.set(true));
    Ok(())
}

/// Translate a DOM mouse event into the follower's pointer event
fn pointer_event(event_type: PointerEventType, event: &MouseEvent) -> Option<PointerEvent<Element>> {
    let target = || event.target().and_then(|target| target.dyn_into::<Element>().ok());
    let related_target = || {
        event
            .related_target()
            .and_then(|target| target.dyn_into::<Element>().ok())
    };

    Some(match event_type {
        PointerEventType::MouseMove => PointerEvent::MouseMove {
            position: Point::new(event.client_x() as f64, event.client_y() as f64),
        },
        PointerEventType::MouseEnter => PointerEvent::MouseEnter,
        PointerEventType::MouseLeave => PointerEvent::MouseLeave,
        PointerEventType::MouseDown => PointerEvent::MouseDown,
        PointerEventType::MouseUp => PointerEvent::MouseUp,
        PointerEventType::MouseOver => PointerEvent::MouseOver {
            target: target()?,
            related_target: related_target(),
        },
        PointerEventType::MouseOut => PointerEvent::MouseOut {
            target: target()?,
            related_target: related_target(),
        },
    })
}

#[wasm_bindgen(js_name = MouseFollower)]
pub struct WasmMouseFollower {
    handle: MouseFollower<WebDom>,
    container: Option<Element>,
    pointer_listeners: RefCell<Vec<(PointerEventType, PointerListener)>>,
    js_listeners: RefCell<Vec<(EventKind, js_sys::Function, ListenerId)>>,
}

#[wasm_bindgen(js_class = MouseFollower)]
impl WasmMouseFollower {
    /// Create a cursor from a (partial) options object
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WasmMouseFollower, JsValue> {
        let options: FollowerOptions = if options.is_undefined() || options.is_null() {
            FollowerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let dom = WebDom::new().map_err(to_js)?;
        let handle = MouseFollower::new(dom, options).map_err(to_js)?;
        let container = handle.follower().container().cloned();

        let follower = WasmMouseFollower {
            handle,
            container,
            pointer_listeners: RefCell::new(Vec::new()),
            js_listeners: RefCell::new(Vec::new()),
        };
        follower.bind()?;
        ensure_frame_loop()?;
        Ok(follower)
    }

    pub fn show(&self) {
        self.handle.update(|follower| follower.show());
    }

    pub fn hide(&self) {
        self.handle.update(|follower| follower.hide());
    }

    pub fn toggle(&self, force: Option<bool>) {
        self.handle.update(|follower| follower.toggle(force));
    }

    #[wasm_bindgen(js_name = addState)]
    pub fn add_state(&self, state: &str) {
        self.handle.update(|follower| follower.add_state(state));
    }

    #[wasm_bindgen(js_name = removeState)]
    pub fn remove_state(&self, state: &str) {
        self.handle.update(|follower| follower.remove_state(state));
    }

    #[wasm_bindgen(js_name = toggleState)]
    pub fn toggle_state(&self, state: &str, force: Option<bool>) {
        self.handle.update(|follower| follower.toggle_state(state, force));
    }

    #[wasm_bindgen(js_name = setSkewing)]
    pub fn set_skewing(&self, value: f64) {
        self.handle.update(|follower| follower.set_skewing(value));
    }

    #[wasm_bindgen(js_name = removeSkewing)]
    pub fn remove_skewing(&self) {
        self.handle.update(|follower| follower.remove_skewing());
    }

    /// Stick to an element, given either as a selector or as the element itself
    #[wasm_bindgen(js_name = setStick)]
    pub fn set_stick(&self, target: JsValue) {
        if let Some(selector) = target.as_string() {
            self.handle
                .update(|follower| follower.set_stick_selector(&selector));
        } else if let Ok(element) = target.dyn_into::<Element>() {
            self.handle.update(|follower| follower.set_stick(&element));
        }
    }

    #[wasm_bindgen(js_name = removeStick)]
    pub fn remove_stick(&self) {
        self.handle.update(|follower| follower.remove_stick());
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: &str) {
        self.handle.update(|follower| follower.set_text(text));
    }

    #[wasm_bindgen(js_name = removeText)]
    pub fn remove_text(&self) {
        self.handle.update(|follower| follower.remove_text());
    }

    #[wasm_bindgen(js_name = setIcon)]
    pub fn set_icon(&self, name: &str, style: Option<String>) {
        self.handle
            .update(|follower| follower.set_icon(name, style.as_deref().unwrap_or("")));
    }

    #[wasm_bindgen(js_name = removeIcon)]
    pub fn remove_icon(&self) {
        self.handle.update(|follower| follower.remove_icon());
    }

    #[wasm_bindgen(js_name = setMedia)]
    pub fn set_media(&self, element: Option<Element>) {
        self.handle.update(|follower| follower.set_media(element.as_ref()));
    }

    #[wasm_bindgen(js_name = removeMedia)]
    pub fn remove_media(&self) {
        self.handle.update(|follower| follower.remove_media());
    }

    #[wasm_bindgen(js_name = setImg)]
    pub fn set_img(&self, url: &str) {
        self.handle.update(|follower| follower.set_img(url));
    }

    #[wasm_bindgen(js_name = removeImg)]
    pub fn remove_img(&self) {
        self.handle.update(|follower| follower.remove_img());
    }

    #[wasm_bindgen(js_name = setVideo)]
    pub fn set_video(&self, url: &str) {
        self.handle.update(|follower| follower.set_video(url));
    }

    #[wasm_bindgen(js_name = removeVideo)]
    pub fn remove_video(&self) {
        self.handle.update(|follower| follower.remove_video());
    }

    /// Current mode: `plain`, `text`, `icon` or `media`
    pub fn mode(&self) -> String {
        format!("{:?}", self.handle.follower().mode()).to_lowercase()
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.handle.follower().is_visible()
    }

    /// Subscribe `callback` to a lifecycle event. State events pass the state string.
    ///
    /// Listeners run after the call that raised the event has finished, so
    /// they may call back into the cursor.
    pub fn on(&self, event: &str, callback: js_sys::Function) -> Result<(), JsValue> {
        let kind: EventKind = event.parse().map_err(|err: String| JsValue::from_str(&err))?;
        let js_callback = callback.clone();
        let listener = move |event: &FollowerEvent| {
            let result = match event.state() {
                Some(state) => js_callback.call1(&JsValue::NULL, &JsValue::from_str(state)),
                None => js_callback.call0(&JsValue::NULL),
            };
            if let Err(err) = result {
                log::warn!("{} listener threw: {:?}", event.kind().as_str(), err);
            }
        };
        let id = self.handle.update(|follower| follower.on(kind, listener));
        self.js_listeners.borrow_mut().push((kind, callback, id));
        Ok(())
    }

    /// Remove `callback`, or every listener of `event` without one
    pub fn off(&self, event: &str, callback: Option<js_sys::Function>) -> Result<(), JsValue> {
        let kind: EventKind = event.parse().map_err(|err: String| JsValue::from_str(&err))?;
        let mut js_listeners = self.js_listeners.borrow_mut();
        let mut follower = self.handle.follower_mut();
        match callback {
            Some(callback) => js_listeners.retain(|(existing_kind, existing, id)| {
                let matched = *existing_kind == kind && *existing == callback;
                if matched {
                    follower.off(kind, Some(*id));
                }
                !matched
            }),
            None => {
                follower.off(kind, None);
                js_listeners.retain(|(existing_kind, _, _)| *existing_kind != kind);
            }
        }
        Ok(())
    }

    /// Remove listeners and the cursor element. The frame loop winds down on its own.
    pub fn destroy(&self) {
        self.unbind();
        self.handle.destroy();
        self.js_listeners.borrow_mut().clear();
    }
}

impl WasmMouseFollower {
    fn bind(&self) -> Result<(), JsValue> {
        let Some(container) = &self.container else {
            return Ok(());
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(true);

        for event_type in self.handle.follower().bound_events() {
            let follower = std::rc::Rc::downgrade(&self.handle.shared());
            let listener = PointerListener::new(move |event: MouseEvent| {
                let Some(follower) = follower.upgrade() else {
                    return;
                };
                let Some(event) = pointer_event(event_type, &event) else {
                    return;
                };
                MouseFollower::<WebDom>::run(&follower, |follower| {
                    follower.handle_event(event)
                });
            });
            container.add_event_listener_with_callback_and_add_event_listener_options(
                event_type.as_str(),
                listener.as_ref().unchecked_ref(),
                &options,
            )?;
            self.pointer_listeners
                .borrow_mut()
                .push((event_type, listener));
        }
        Ok(())
    }

    fn unbind(&self) {
        let Some(container) = &self.container else {
            return;
        };
        for (event_type, listener) in self.pointer_listeners.borrow_mut().drain(..) {
            if let Err(err) = container.remove_event_listener_with_callback(
                event_type.as_str(),
                listener.as_ref().unchecked_ref(),
            ) {
                log::warn!("could not unbind {}: {:?}", event_type.as_str(), err);
            }
        }
    }
}

impl Drop for WasmMouseFollower {
    fn drop(&mut self) {
        // Listeners must not outlive their closures
        self.unbind();
    }
}
