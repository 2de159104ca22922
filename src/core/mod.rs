pub mod config;
pub mod constants;
pub mod follower;
pub mod geo;
pub mod handle;
pub mod timers;

pub use config::FollowerOptions;
pub use follower::{Follower, Mode};
pub use geo::{Point, Rect};
pub use handle::MouseFollower;
pub use timers::{TimerAction, TimerSlot, Timers};
