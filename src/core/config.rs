//! Configuration for the follower
//!
//! Options form one flat map, merged over the defaults at construction. Field
//! names serialize in camelCase so that an options object written for the
//! browser (`{"hideTimeout": 200, "stateDetection": {...}}`) loads as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::interpolation::EasingFunction;
use crate::core::constants;
use crate::Result;

/// Flat option set for a [`Follower`](crate::Follower).
///
/// Anything missing from a deserialized object takes its default, so partial
/// objects behave like a merge over [`FollowerOptions::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FollowerOptions {
    /// Selector of an existing cursor element. `None` creates one.
    pub el: Option<String>,
    /// Selector of the container. `None` uses the document body.
    pub container: Option<String>,
    pub class_name: String,
    pub inner_class_name: String,
    pub text_class_name: String,
    pub media_class_name: String,
    pub media_box_class_name: String,
    pub icon_svg_class_name: String,
    pub icon_svg_name_prefix: String,
    pub icon_svg_src: String,
    /// Data attribute stem for declarative control. `None` disables it.
    pub data_attr: Option<String>,
    pub hidden_state: String,
    pub text_state: String,
    pub icon_state: String,
    /// State applied while a button is held. `None` disables press tracking.
    pub active_state: Option<String>,
    pub media_state: String,
    /// State name to selector rules applied on hover.
    pub state_detection: Option<BTreeMap<String, String>>,
    /// Whether the cursor shows itself when the pointer enters the container.
    pub visible: bool,
    /// Show when a state is added, hide when the last state is removed.
    pub visible_on_state: bool,
    /// Movement duration in seconds.
    pub speed: f64,
    /// Movement ease, GSAP naming (`expo.out`, `power3.inOut`, `none`...).
    pub ease: String,
    /// Replace the running movement tween on every pointer move.
    pub overwrite: bool,
    pub skewing: f64,
    pub skewing_text: f64,
    pub skewing_icon: f64,
    pub skewing_media: f64,
    pub skewing_delta: f64,
    pub skewing_delta_max: f64,
    pub stick_delta: f64,
    /// Milliseconds before showing.
    pub show_timeout: f64,
    pub hide_on_leave: bool,
    /// Milliseconds before the cursor counts as hidden. Match the CSS hide transition.
    pub hide_timeout: f64,
    /// Milliseconds before the media box is emptied after leaving media mode.
    pub hide_media_timeout: f64,
    /// Starting position. `None` parks the cursor off-screen at the negative viewport size.
    pub initial_pos: Option<[f64; 2]>,
}

impl Default for FollowerOptions {
    fn default() -> Self {
        let mut state_detection = BTreeMap::new();
        state_detection.insert(
            constants::POINTER_STATE.to_string(),
            constants::POINTER_SELECTOR.to_string(),
        );

        Self {
            el: None,
            container: None,
            class_name: constants::CLASS_NAME.to_string(),
            inner_class_name: constants::INNER_CLASS_NAME.to_string(),
            text_class_name: constants::TEXT_CLASS_NAME.to_string(),
            media_class_name: constants::MEDIA_CLASS_NAME.to_string(),
            media_box_class_name: constants::MEDIA_BOX_CLASS_NAME.to_string(),
            icon_svg_class_name: constants::ICON_SVG_CLASS_NAME.to_string(),
            icon_svg_name_prefix: constants::ICON_SVG_NAME_PREFIX.to_string(),
            icon_svg_src: String::new(),
            data_attr: Some(constants::DATA_ATTR.to_string()),
            hidden_state: constants::HIDDEN_STATE.to_string(),
            text_state: constants::TEXT_STATE.to_string(),
            icon_state: constants::ICON_STATE.to_string(),
            active_state: Some(constants::ACTIVE_STATE.to_string()),
            media_state: constants::MEDIA_STATE.to_string(),
            state_detection: Some(state_detection),
            visible: true,
            visible_on_state: false,
            speed: constants::SPEED,
            ease: constants::EASE.to_string(),
            overwrite: true,
            skewing: 0.0,
            skewing_text: constants::SKEWING_MODE_FACTOR,
            skewing_icon: constants::SKEWING_MODE_FACTOR,
            skewing_media: constants::SKEWING_MODE_FACTOR,
            skewing_delta: constants::SKEWING_DELTA,
            skewing_delta_max: constants::SKEWING_DELTA_MAX,
            stick_delta: constants::STICK_DELTA,
            show_timeout: constants::SHOW_TIMEOUT_MS,
            hide_on_leave: true,
            hide_timeout: constants::HIDE_TIMEOUT_MS,
            hide_media_timeout: constants::HIDE_MEDIA_TIMEOUT_MS,
            initial_pos: None,
        }
    }
}

impl FollowerOptions {
    /// Parse a JSON options object, merged over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?.resolved())
    }

    /// Merge a JSON value over the defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value::<Self>(value)?.resolved())
    }

    /// Fill in the derived defaults.
    ///
    /// An empty `dataAttr` or `activeState` disables the feature. A visible cursor
    /// with detection explicitly disabled still hides over iframes, where it would
    /// stop receiving pointer events.
    pub fn resolved(mut self) -> Self {
        self.data_attr = self.data_attr.filter(|stem| !stem.is_empty());
        self.active_state = self.active_state.filter(|state| !state.is_empty());
        if self.visible && self.state_detection.is_none() {
            let mut rules = BTreeMap::new();
            rules.insert(
                self.hidden_state.clone(),
                constants::HIDDEN_SELECTOR.to_string(),
            );
            self.state_detection = Some(rules);
        }
        self
    }

    /// Movement easing, falling back to `expo.out` for unknown names.
    pub fn easing(&self) -> EasingFunction {
        self.ease.parse().unwrap_or_else(|_| {
            log::warn!(
                "unknown ease '{}', falling back to {}",
                self.ease,
                constants::EASE
            );
            EasingFunction::EaseOutExpo
        })
    }

    /// Movement duration in milliseconds.
    pub fn speed_ms(&self) -> f64 {
        self.speed * 1000.0
    }

    /// Whether hover detection (rules or data attributes) needs `mouseover`/`mouseout`.
    pub fn tracks_hover(&self) -> bool {
        self.state_detection.is_some()
            || self
                .data_attr
                .as_deref()
                .is_some_and(|stem| !stem.is_empty())
    }

    /// Detection rules in a stable order.
    pub fn detection_rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.state_detection
            .iter()
            .flat_map(|rules| rules.iter())
            .map(|(state, selector)| (state.as_str(), selector.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FollowerOptions::default();
        assert_eq!(options.class_name, "mf-cursor");
        assert_eq!(options.hidden_state, "-hidden");
        assert_eq!(options.active_state.as_deref(), Some("-active"));
        assert_eq!(options.data_attr.as_deref(), Some("cursor"));
        assert_eq!(options.speed, 0.55);
        assert_eq!(options.hide_timeout, 300.0);
        assert_eq!(options.skewing, 0.0);
        assert!(options.visible);
        assert!(options.overwrite);
        assert_eq!(
            options.detection_rules().collect::<Vec<_>>(),
            vec![("-pointer", "a,button")]
        );
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let options =
            FollowerOptions::from_json(r#"{"hideTimeout": 150, "skewing": 1.5}"#).unwrap();
        assert_eq!(options.hide_timeout, 150.0);
        assert_eq!(options.skewing, 1.5);
        assert_eq!(options.class_name, "mf-cursor");
        assert_eq!(options.speed_ms(), 550.0);
    }

    #[test]
    fn test_null_detection_hides_over_iframes() {
        let options = FollowerOptions::from_json(r#"{"stateDetection": null}"#).unwrap();
        assert_eq!(
            options.detection_rules().collect::<Vec<_>>(),
            vec![("-hidden", "iframe")]
        );

        let hidden =
            FollowerOptions::from_json(r#"{"stateDetection": null, "visible": false}"#).unwrap();
        assert_eq!(hidden.detection_rules().count(), 0);
    }

    #[test]
    fn test_null_disables_optional_features() {
        let options =
            FollowerOptions::from_json(r#"{"activeState": null, "dataAttr": null}"#).unwrap();
        assert!(options.active_state.is_none());
        assert!(options.data_attr.is_none());
        assert!(options.tracks_hover());
    }

    #[test]
    fn test_empty_strings_disable_optional_features() {
        let raw = FollowerOptions {
            visible: false,
            state_detection: None,
            data_attr: Some(String::new()),
            ..Default::default()
        };
        assert!(!raw.tracks_hover());

        let options = FollowerOptions::from_json(
            r#"{"activeState": "", "dataAttr": "", "stateDetection": null, "visible": false}"#,
        )
        .unwrap();
        assert!(options.active_state.is_none());
        assert!(options.data_attr.is_none());
        assert!(!options.tracks_hover());
    }

    #[test]
    fn test_unknown_ease_falls_back() {
        let options = FollowerOptions {
            ease: "wobbly.sideways".to_string(),
            ..Default::default()
        };
        assert_eq!(options.easing(), EasingFunction::EaseOutExpo);

        let options = FollowerOptions {
            ease: "power2.inOut".to_string(),
            ..Default::default()
        };
        assert_eq!(options.easing(), EasingFunction::EaseInOutCubic);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(FollowerOptions::from_json("{not json").is_err());
    }
}
