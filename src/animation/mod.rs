pub mod interpolation;
pub mod ticker;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use interpolation::{EasingFunction, Interpolatable, Interpolation, UnknownEase};
pub use ticker::{register_ticker, ticker, Ticker, TickerId};
pub use tweening::Tween;
