//! Host document abstraction
//!
//! The follower never touches a browser API directly. Everything it needs from
//! the page (creating nodes, class lists, geometry, media playback, the clock)
//! goes through [`Dom`], implemented by [`VirtualDom`](virtual_dom::VirtualDom)
//! for headless use and by `WebDom` when the `wasm` feature is enabled.

pub mod selector;
pub mod virtual_dom;
#[cfg(feature = "wasm")]
pub mod web;

use serde::{Deserialize, Serialize};

use crate::core::geo::{Point, Rect};
use crate::Result;

/// The kind of media element the cursor can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

/// Transform written to the root element every rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    /// Degrees
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub fn translate(position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0px) rotate({}deg) scale({}, {})",
            self.x, self.y, self.rotation, self.scale_x, self.scale_y
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Operations the follower performs on its host document.
///
/// Node handles are cheap clones that compare by identity. Every operation on a
/// node that no longer exists is a silent no-op.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// Monotonic clock in milliseconds
    fn now(&self) -> f64;

    /// Viewport size in CSS pixels
    fn viewport_size(&self) -> Point;

    /// Default container
    fn body(&self) -> Option<Self::Node>;

    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// First descendant of `root` matching `selector`
    fn query_selector_within(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `other` is `node` itself or one of its descendants
    fn contains(&self, node: &Self::Node, other: &Self::Node) -> bool;

    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    fn class_name(&self, node: &Self::Node) -> String;

    fn set_class_name(&mut self, node: &Self::Node, class_name: &str);

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Replace the node's children with parsed markup
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Dataset lookup by camelCase key, e.g. `cursorText` for `data-cursor-text`
    fn data_value(&self, node: &Self::Node, key: &str) -> Option<String>;

    fn bounding_rect(&self, node: &Self::Node) -> Option<Rect>;

    fn set_transform(&mut self, node: &Self::Node, transform: &Transform);

    fn set_will_change(&mut self, node: &Self::Node, value: &str);

    /// Create a detached `<img>` or `<video>`; videos start muted, looping and autoplaying
    fn create_media(&mut self, kind: MediaKind) -> Result<Self::Node>;

    fn media_src(&self, node: &Self::Node) -> Option<String>;

    fn set_media_src(&mut self, node: &Self::Node, url: &str);

    fn load_media(&mut self, node: &Self::Node);

    fn play_media(&mut self, node: &Self::Node);

    fn pause_media(&mut self, node: &Self::Node);

    /// `HTMLMediaElement.readyState`
    fn media_ready_state(&self, node: &Self::Node) -> u16;

    fn add_classes(&mut self, node: &Self::Node, classes: &str) {
        for class in classes.split_whitespace() {
            self.add_class(node, class);
        }
    }

    fn remove_classes(&mut self, node: &Self::Node, classes: &str) {
        for class in classes.split_whitespace() {
            self.remove_class(node, class);
        }
    }

    /// Remove every child of `node`
    fn clear_children(&mut self, node: &Self::Node) {
        self.set_inner_html(node, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_css() {
        let transform = Transform {
            x: 10.0,
            y: -4.5,
            rotation: 45.0,
            scale_x: 1.1,
            scale_y: 0.9,
        };
        assert_eq!(
            transform.to_css(),
            "translate3d(10px, -4.5px, 0px) rotate(45deg) scale(1.1, 0.9)"
        );
        assert_eq!(
            Transform::translate(Point::new(1.0, 2.0)).position(),
            Point::new(1.0, 2.0)
        );
    }
}
