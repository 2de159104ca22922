//! Browser DOM backend over `web-sys`

use instant::Instant;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlMediaElement, Window};

use crate::core::geo::{Point, Rect};
use crate::dom::{Dom, MediaKind, Transform};
use crate::{FollowerError, Result};

fn host_error(context: &str, err: wasm_bindgen::JsValue) -> FollowerError {
    FollowerError::Host(format!("{}: {:?}", context, err))
}

/// The page's document, with a clock starting at construction
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    origin: Instant,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| FollowerError::Host("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| FollowerError::Host("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            origin: Instant::now(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn style_property(&self, node: &Element, name: &str, value: &str) {
        if let Some(node) = node.dyn_ref::<HtmlElement>() {
            if let Err(err) = node.style().set_property(name, value) {
                log::warn!("could not set {}: {:?}", name, err);
            }
        }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn viewport_size(&self) -> Point {
        let dimension = |value: std::result::Result<wasm_bindgen::JsValue, _>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
        };
        Point::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_selector_within(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn create_element(&mut self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|err| host_error("createElement", err))
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        if let Err(err) = parent.append_child(child) {
            log::warn!("appendChild failed: {:?}", err);
        }
    }

    fn remove_child(&mut self, parent: &Element, child: &Element) {
        if child.parent_element().as_ref() != Some(parent) {
            return;
        }
        if let Err(err) = parent.remove_child(child) {
            log::warn!("removeChild failed: {:?}", err);
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, node: &Element, other: &Element) -> bool {
        let other: &web_sys::Node = other;
        node.contains(Some(other))
    }

    fn matches(&self, node: &Element, selector: &str) -> bool {
        node.matches(selector).unwrap_or(false)
    }

    fn class_name(&self, node: &Element) -> String {
        node.class_name()
    }

    fn set_class_name(&mut self, node: &Element, class_name: &str) {
        node.set_class_name(class_name);
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            log::warn!("invalid class '{}': {:?}", class, err);
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            log::warn!("invalid class '{}': {:?}", class, err);
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn data_value(&self, node: &Element, key: &str) -> Option<String> {
        node.dyn_ref::<HtmlElement>()
            .and_then(|node| node.dataset().get(key))
    }

    fn bounding_rect(&self, node: &Element) -> Option<Rect> {
        let rect = node.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn set_transform(&mut self, node: &Element, transform: &Transform) {
        self.style_property(node, "transform", &transform.to_css());
    }

    fn set_will_change(&mut self, node: &Element, value: &str) {
        self.style_property(node, "will-change", value);
    }

    fn create_media(&mut self, kind: MediaKind) -> Result<Element> {
        match kind {
            MediaKind::Image => HtmlImageElement::new()
                .map(Element::from)
                .map_err(|err| host_error("new Image", err)),
            MediaKind::Video => {
                let video = self
                    .document
                    .create_element("video")
                    .map_err(|err| host_error("createElement", err))?;
                if let Some(media) = video.dyn_ref::<HtmlMediaElement>() {
                    media.set_muted(true);
                    media.set_loop(true);
                    media.set_autoplay(true);
                }
                Ok(video)
            }
        }
    }

    fn media_src(&self, node: &Element) -> Option<String> {
        let src = if let Some(img) = node.dyn_ref::<HtmlImageElement>() {
            img.src()
        } else {
            node.dyn_ref::<HtmlMediaElement>()?.src()
        };
        (!src.is_empty()).then_some(src)
    }

    fn set_media_src(&mut self, node: &Element, url: &str) {
        if let Some(img) = node.dyn_ref::<HtmlImageElement>() {
            img.set_src(url);
        } else if let Some(media) = node.dyn_ref::<HtmlMediaElement>() {
            media.set_src(url);
        }
    }

    fn load_media(&mut self, node: &Element) {
        if let Some(media) = node.dyn_ref::<HtmlMediaElement>() {
            media.load();
        }
    }

    fn play_media(&mut self, node: &Element) {
        if let Some(media) = node.dyn_ref::<HtmlMediaElement>() {
            // Autoplay policies may reject; the returned promise is not awaited
            if let Err(err) = media.play() {
                log::debug!("play() failed: {:?}", err);
            }
        }
    }

    fn pause_media(&mut self, node: &Element) {
        if let Some(media) = node.dyn_ref::<HtmlMediaElement>() {
            if let Err(err) = media.pause() {
                log::debug!("pause() failed: {:?}", err);
            }
        }
    }

    fn media_ready_state(&self, node: &Element) -> u16 {
        node.dyn_ref::<HtmlMediaElement>()
            .map(HtmlMediaElement::ready_state)
            .unwrap_or(0)
    }
}
