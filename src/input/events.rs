use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Pointer events the follower listens to on its container
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent<N> {
    /// Pointer moved, in client coordinates
    MouseMove { position: Point },
    /// Pointer entered the container
    MouseEnter,
    /// Pointer left the container
    MouseLeave,
    /// A button was pressed
    MouseDown,
    /// A button was released
    MouseUp,
    /// Pointer moved onto `target`, coming from `related_target`
    MouseOver {
        target: N,
        related_target: Option<N>,
    },
    /// Pointer moved off `target`, heading to `related_target`
    MouseOut {
        target: N,
        related_target: Option<N>,
    },
}

/// DOM event types, one per listener the follower may bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventType {
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseDown,
    MouseUp,
    MouseOver,
    MouseOut,
}

impl PointerEventType {
    pub const ALL: [PointerEventType; 7] = [
        PointerEventType::MouseMove,
        PointerEventType::MouseEnter,
        PointerEventType::MouseLeave,
        PointerEventType::MouseDown,
        PointerEventType::MouseUp,
        PointerEventType::MouseOver,
        PointerEventType::MouseOut,
    ];

    /// DOM event name
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerEventType::MouseMove => "mousemove",
            PointerEventType::MouseEnter => "mouseenter",
            PointerEventType::MouseLeave => "mouseleave",
            PointerEventType::MouseDown => "mousedown",
            PointerEventType::MouseUp => "mouseup",
            PointerEventType::MouseOver => "mouseover",
            PointerEventType::MouseOut => "mouseout",
        }
    }
}

impl<N> PointerEvent<N> {
    pub fn event_type(&self) -> PointerEventType {
        match self {
            PointerEvent::MouseMove { .. } => PointerEventType::MouseMove,
            PointerEvent::MouseEnter => PointerEventType::MouseEnter,
            PointerEvent::MouseLeave => PointerEventType::MouseLeave,
            PointerEvent::MouseDown => PointerEventType::MouseDown,
            PointerEvent::MouseUp => PointerEventType::MouseUp,
            PointerEvent::MouseOver { .. } => PointerEventType::MouseOver,
            PointerEvent::MouseOut { .. } => PointerEventType::MouseOut,
        }
    }

    /// Gets the pointer position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::MouseMove { position } => Some(*position),
            _ => None,
        }
    }
}
