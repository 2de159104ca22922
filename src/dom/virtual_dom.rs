//! In-memory document used for headless runs and tests.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Markup given to
//! `set_inner_html` is stored verbatim rather than parsed, which is all the
//! cursor needs to verify its text and icon output.

use std::cell::Cell;
use std::rc::Rc;

use fxhash::FxHashMap as HashMap;

use crate::core::geo::{Point, Rect};
use crate::dom::selector::{Selector, SelectorSubject};
use crate::dom::{Dom, MediaKind, Transform};
use crate::Result;

/// Identity of a node in a [`VirtualDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A scripted millisecond clock, shared between a document and its driver
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, time: f64) {
        self.0.set(time);
    }

    pub fn advance(&self, millis: f64) -> f64 {
        let time = self.0.get() + millis;
        self.0.set(time);
        time
    }
}

/// Playback state of an `<img>`/`<video>` node
#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    pub kind: MediaKind,
    pub src: Option<String>,
    pub muted: bool,
    pub looping: bool,
    pub autoplay: bool,
    pub playing: bool,
    pub loads: u32,
    pub ready_state: u16,
}

impl MediaState {
    fn new(kind: MediaKind) -> Self {
        let video = kind == MediaKind::Video;
        Self {
            kind,
            src: None,
            muted: video,
            looping: video,
            autoplay: video,
            playing: false,
            loads: 0,
            ready_state: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VirtualNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub inner_html: String,
    pub rect: Option<Rect>,
    pub transform: Option<Transform>,
    pub will_change: Option<String>,
    pub media: Option<MediaState>,
}

impl SelectorSubject for VirtualNode {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Map a dataset key to its attribute: `cursorText` to `data-cursor-text`
pub fn dataset_attribute(key: &str) -> String {
    let mut attribute = String::from("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            attribute.push('-');
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}

/// Arena-backed document with a `<body>` root
#[derive(Debug)]
pub struct VirtualDom {
    nodes: Vec<VirtualNode>,
    body: NodeId,
    clock: ManualClock,
    viewport: Point,
    created: HashMap<String, usize>,
}

impl VirtualDom {
    pub fn new() -> Self {
        Self::with_clock(ManualClock::new())
    }

    pub fn with_clock(clock: ManualClock) -> Self {
        let body = VirtualNode {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            clock,
            viewport: Point::new(1280.0, 720.0),
            created: HashMap::default(),
        }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Point::new(width, height);
        self
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> Option<&VirtualNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut VirtualNode> {
        self.nodes.get_mut(id.0)
    }

    /// Create an element and append it to `parent` in one step
    pub fn element_in(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.new_element(tag);
        self.append_child(&parent, &node);
        node
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(node) = self.node_mut(node) {
            node.id = Some(id.to_string());
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(node) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(node) {
            node.rect = Some(rect);
        }
    }

    pub fn set_ready_state(&mut self, node: NodeId, ready_state: u16) {
        if let Some(media) = self.node_mut(node).and_then(|node| node.media.as_mut()) {
            media.ready_state = ready_state;
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.node(node)
            .map(|node| node.classes.clone())
            .unwrap_or_default()
    }

    pub fn inner_html(&self, node: NodeId) -> &str {
        self.node(node)
            .map(|node| node.inner_html.as_str())
            .unwrap_or("")
    }

    pub fn transform(&self, node: NodeId) -> Option<Transform> {
        self.node(node).and_then(|node| node.transform)
    }

    pub fn will_change(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|node| node.will_change.as_deref())
    }

    pub fn media(&self, node: NodeId) -> Option<&MediaState> {
        self.node(node).and_then(|node| node.media.as_ref())
    }

    /// Whether the node is attached under `<body>`
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(&self.body, &node)
    }

    /// How many elements with this tag were ever created
    pub fn created_count(&self, tag: &str) -> usize {
        self.created.get(tag).copied().unwrap_or(0)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|existing| *existing != child);
        }
        if let Some(child) = self.node_mut(child) {
            child.parent = None;
        }
    }

    fn new_element(&mut self, tag: &str) -> NodeId {
        self.alloc(VirtualNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })
    }

    fn alloc(&mut self, node: VirtualNode) -> NodeId {
        *self.created.entry(node.tag.clone()).or_insert(0) += 1;
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

impl Default for VirtualDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for VirtualDom {
    type Node = NodeId;

    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn viewport_size(&self) -> Point {
        self.viewport
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_within(&self.body, selector)
    }

    fn query_selector_within(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector);
        let mut stack = vec![*root];
        // Depth-first in document order, like the browser
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if id != *root && selector.matches(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        Ok(self.new_element(tag))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.node(*parent).is_none() || self.node(*child).is_none() || parent == child {
            return;
        }
        self.detach(*child);
        if let Some(node) = self.node_mut(*parent) {
            node.children.push(*child);
        }
        if let Some(node) = self.node_mut(*child) {
            node.parent = Some(*parent);
        }
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.parent(child) == Some(*parent) {
            self.detach(*child);
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node).and_then(|node| node.parent)
    }

    fn contains(&self, node: &NodeId, other: &NodeId) -> bool {
        let mut current = Some(*other);
        while let Some(id) = current {
            if id == *node {
                return true;
            }
            current = self.parent(&id);
        }
        false
    }

    fn matches(&self, node: &NodeId, selector: &str) -> bool {
        self.node(*node)
            .map(|node| Selector::parse(selector).matches(node))
            .unwrap_or(false)
    }

    fn class_name(&self, node: &NodeId) -> String {
        self.node(*node)
            .map(|node| node.classes.join(" "))
            .unwrap_or_default()
    }

    fn set_class_name(&mut self, node: &NodeId, class_name: &str) {
        if let Some(node) = self.node_mut(*node) {
            node.classes = class_name
                .split_whitespace()
                .map(str::to_string)
                .collect();
        }
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(node) = self.node_mut(*node) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(node) = self.node_mut(*node) {
            node.classes.retain(|existing| existing != class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.node(*node)
            .map(|node| node.has_class(class))
            .unwrap_or(false)
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        for child in self.children(*node).to_vec() {
            self.detach(child);
        }
        if let Some(node) = self.node_mut(*node) {
            node.inner_html = html.to_string();
        }
    }

    fn data_value(&self, node: &NodeId, key: &str) -> Option<String> {
        self.node(*node)
            .and_then(|node| node.attributes.get(&dataset_attribute(key)).cloned())
    }

    fn bounding_rect(&self, node: &NodeId) -> Option<Rect> {
        self.node(*node).map(|node| node.rect.unwrap_or_default())
    }

    fn set_transform(&mut self, node: &NodeId, transform: &Transform) {
        if let Some(node) = self.node_mut(*node) {
            node.transform = Some(*transform);
        }
    }

    fn set_will_change(&mut self, node: &NodeId, value: &str) {
        if let Some(node) = self.node_mut(*node) {
            node.will_change = Some(value.to_string());
        }
    }

    fn create_media(&mut self, kind: MediaKind) -> Result<NodeId> {
        let tag = match kind {
            MediaKind::Image => "img",
            MediaKind::Video => "video",
        };
        Ok(self.alloc(VirtualNode {
            tag: tag.to_string(),
            media: Some(MediaState::new(kind)),
            ..Default::default()
        }))
    }

    fn media_src(&self, node: &NodeId) -> Option<String> {
        self.media(*node).and_then(|media| media.src.clone())
    }

    fn set_media_src(&mut self, node: &NodeId, url: &str) {
        if let Some(media) = self.node_mut(*node).and_then(|node| node.media.as_mut()) {
            media.src = Some(url.to_string());
        }
    }

    fn load_media(&mut self, node: &NodeId) {
        if let Some(media) = self.node_mut(*node).and_then(|node| node.media.as_mut()) {
            media.loads += 1;
            media.ready_state = 0;
        }
    }

    fn play_media(&mut self, node: &NodeId) {
        if let Some(media) = self.node_mut(*node).and_then(|node| node.media.as_mut()) {
            media.playing = true;
        }
    }

    fn pause_media(&mut self, node: &NodeId) {
        if let Some(media) = self.node_mut(*node).and_then(|node| node.media.as_mut()) {
            media.playing = false;
        }
    }

    fn media_ready_state(&self, node: &NodeId) -> u16 {
        self.media(*node).map(|media| media.ready_state).unwrap_or(0)
    }
}
