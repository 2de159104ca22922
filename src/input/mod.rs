pub mod dataset;
pub mod events;
pub mod handler;

// Re-export the essential types
pub use dataset::CursorParams;
pub use events::{PointerEvent, PointerEventType};
pub use handler::{EventCallback, EventKind, EventManager, FollowerEvent, ListenerId, SharedEvents};
