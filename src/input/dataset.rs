//! Declarative cursor control through `data-*` attributes
//!
//! With the default stem `cursor`, markup such as
//! `<a data-cursor-text="Open" data-cursor-stick>` drives the follower on hover
//! without touching its API.

use serde::{Deserialize, Serialize};

use crate::dom::Dom;

/// Cursor parameters read from one element's dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorParams {
    /// `data-{attr}`: state classes to add
    pub state: Option<String>,
    /// `data-{attr}-show`: show while hovered
    pub show: Option<String>,
    /// `data-{attr}-text`: text mode content
    pub text: Option<String>,
    /// `data-{attr}-icon`: icon mode sprite name
    pub icon: Option<String>,
    /// `data-{attr}-img`: image mode URL
    pub img: Option<String>,
    /// `data-{attr}-video`: video mode URL
    pub video: Option<String>,
    /// `data-{attr}-stick`: stick target selector, empty for the element itself
    pub stick: Option<String>,
}

impl CursorParams {
    /// Read the parameters of `node` under the dataset stem `attr`
    pub fn from_node<D: Dom>(dom: &D, node: &D::Node, attr: &str) -> Self {
        let read = |suffix: &str| dom.data_value(node, &format!("{}{}", attr, suffix));
        Self {
            state: read(""),
            show: read("Show"),
            text: read("Text"),
            icon: read("Icon"),
            img: read("Img"),
            video: read("Video"),
            stick: read("Stick"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::virtual_dom::VirtualDom;

    #[test]
    fn test_reads_prefixed_attributes() {
        let mut dom = VirtualDom::new();
        let body = dom.body_id();
        let link = dom.element_in(body, "a");
        dom.set_attribute(link, "data-cursor", "-inverse");
        dom.set_attribute(link, "data-cursor-text", "Open");
        dom.set_attribute(link, "data-cursor-stick", "");

        let params = CursorParams::from_node(&dom, &link, "cursor");
        assert_eq!(params.state.as_deref(), Some("-inverse"));
        assert_eq!(params.text.as_deref(), Some("Open"));
        assert_eq!(params.stick.as_deref(), Some(""));
        assert!(params.icon.is_none());
        assert!(params.show.is_none());
    }

    #[test]
    fn test_custom_stem() {
        let mut dom = VirtualDom::new();
        let body = dom.body_id();
        let card = dom.element_in(body, "div");
        dom.set_attribute(card, "data-pointer-img", "/cover.jpg");

        assert!(CursorParams::from_node(&dom, &card, "cursor").is_empty());
        assert_eq!(
            CursorParams::from_node(&dom, &card, "pointer").img.as_deref(),
            Some("/cover.jpg")
        );
    }
}
