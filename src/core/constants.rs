//! Default class names, state names and timings for the cursor.
//! Keeping them in a single place makes it easier to tweak the stylesheet contract.

/// Root element class name.
pub const CLASS_NAME: &str = "mf-cursor";

/// Inner element class name.
pub const INNER_CLASS_NAME: &str = "mf-cursor-inner";

/// Text element class name.
pub const TEXT_CLASS_NAME: &str = "mf-cursor-text";

/// Media element class name.
pub const MEDIA_CLASS_NAME: &str = "mf-cursor-media";

/// Media box (holds the `<img>`/`<video>`) class name.
pub const MEDIA_BOX_CLASS_NAME: &str = "mf-cursor-media-box";

/// SVG sprite class name.
pub const ICON_SVG_CLASS_NAME: &str = "mf-svgsprite";

/// Prefix prepended to the icon name to form its class.
pub const ICON_SVG_NAME_PREFIX: &str = "-";

/// Data attribute stem, `data-cursor-*`.
pub const DATA_ATTR: &str = "cursor";

pub const HIDDEN_STATE: &str = "-hidden";
pub const TEXT_STATE: &str = "-text";
pub const ICON_STATE: &str = "-icon";
pub const ACTIVE_STATE: &str = "-active";
pub const MEDIA_STATE: &str = "-media";
pub const POINTER_STATE: &str = "-pointer";

/// Selector that puts the cursor in the pointer state.
pub const POINTER_SELECTOR: &str = "a,button";

/// Selector hidden over when detection rules are explicitly disabled.
pub const HIDDEN_SELECTOR: &str = "iframe";

/// Movement duration in seconds.
pub const SPEED: f64 = 0.55;

/// Default movement ease, GSAP naming.
pub const EASE: &str = "expo.out";

pub const SKEWING_MODE_FACTOR: f64 = 2.0;
pub const SKEWING_DELTA: f64 = 0.001;
pub const SKEWING_DELTA_MAX: f64 = 0.15;
pub const STICK_DELTA: f64 = 0.15;

/// Timings in milliseconds.
pub const SHOW_TIMEOUT_MS: f64 = 0.0;
pub const HIDE_TIMEOUT_MS: f64 = 300.0;
pub const HIDE_MEDIA_TIMEOUT_MS: f64 = 300.0;

/// Delay before the media state is applied, so the freshly inserted media
/// element is in the DOM before its CSS transition starts.
pub const MEDIA_STATE_DELAY_MS: f64 = 20.0;

/// Duration of a skew factor transition.
pub const SKEWING_TWEEN_MS: f64 = 500.0;

/// `HTMLMediaElement.HAVE_CURRENT_DATA`; a video above this can be paused safely.
pub const MEDIA_HAVE_CURRENT_DATA: u16 = 2;
