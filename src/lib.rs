//! # Mouse Follower
//!
//! A custom cursor for web pages: an element that trails the pointer with eased
//! motion, skews with velocity, sticks to anchors and morphs into text, icon,
//! image or video modes.
//!
//! The controller is host-agnostic. It talks to the page through the [`Dom`]
//! trait, so the same logic runs against the in-memory [`VirtualDom`] (tests,
//! headless runs) and, with the `wasm` feature, against the browser DOM.

pub mod animation;
pub mod core;
pub mod dom;
pub mod input;
pub mod prelude;
#[cfg(feature = "wasm")]
pub mod wasm;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::FollowerOptions,
    follower::{Follower, Mode},
    geo::{Point, Rect},
    handle::MouseFollower,
};

pub use crate::dom::{virtual_dom::VirtualDom, Dom, Transform};

pub use crate::input::{
    dataset::CursorParams,
    events::PointerEvent,
    handler::{EventKind, EventManager, FollowerEvent, ListenerId},
};

pub use crate::animation::{
    interpolation::EasingFunction,
    ticker::{register_ticker, Ticker, TickerId},
    tweening::Tween,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, FollowerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum FollowerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Follower has been destroyed")]
    Destroyed,
}

/// Error type alias for convenience
pub type Error = FollowerError;
