//! Prelude module for common mouse_follower types and traits
//!
//! `use mouse_follower::prelude::*;` brings in the controller, its options,
//! the host abstraction and the animation primitives.

pub use crate::core::{
    config::FollowerOptions,
    constants,
    follower::{Follower, Mode},
    geo::{Point, Rect},
    handle::MouseFollower,
    timers::{TimerAction, TimerSlot},
};

pub use crate::dom::{
    virtual_dom::{ManualClock, NodeId, VirtualDom},
    Dom, MediaKind, Transform,
};

pub use crate::input::{
    dataset::CursorParams,
    events::{PointerEvent, PointerEventType},
    handler::{EventKind, EventManager, FollowerEvent, ListenerId},
};

pub use crate::animation::{
    interpolation::EasingFunction,
    ticker::{register_ticker, Ticker, TickerId},
    tweening::Tween,
};

#[cfg(feature = "wasm")]
pub use crate::{dom::web::WebDom, wasm::WasmMouseFollower};

pub use crate::{Error as FollowerError, Result};

pub use std::{cell::RefCell, rc::Rc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
