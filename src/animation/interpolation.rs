use crate::core::geo::Point;
use std::f64::consts::PI;
use std::str::FromStr;

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Various easing functions for animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseInQuart => t.powi(4),
            EasingFunction::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EasingFunction::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            EasingFunction::EaseInQuint => t.powi(5),
            EasingFunction::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EasingFunction::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            EasingFunction::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingFunction::EaseOutSine => (t * PI / 2.0).sin(),
            EasingFunction::EaseInOutSine => -(((PI * t).cos() - 1.0) / 2.0),
            EasingFunction::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    (2.0_f64).powf(10.0 * (t - 1.0))
                }
            }
            EasingFunction::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (2.0_f64).powf(-10.0 * t)
                }
            }
            EasingFunction::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    (2.0_f64).powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - (2.0_f64).powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            EasingFunction::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            EasingFunction::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            EasingFunction::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            EasingFunction::EaseInBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                c3 * t * t * t - c1 * t * t
            }
            EasingFunction::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            EasingFunction::EaseInOutBack => {
                let c1 = 1.70158;
                let c2 = c1 * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            EasingFunction::EaseInBounce => 1.0 - EasingFunction::EaseOutBounce.apply(1.0 - t),
            EasingFunction::EaseOutBounce => {
                let n1 = 7.5625;
                let d1 = 2.75;

                if t < 1.0 / d1 {
                    n1 * t * t
                } else if t < 2.0 / d1 {
                    let t = t - 1.5 / d1;
                    n1 * t * t + 0.75
                } else if t < 2.5 / d1 {
                    let t = t - 2.25 / d1;
                    n1 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / d1;
                    n1 * t * t + 0.984375
                }
            }
            EasingFunction::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - EasingFunction::EaseOutBounce.apply(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + EasingFunction::EaseOutBounce.apply(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

/// Returned when an ease name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ease: {0}")]
pub struct UnknownEase(pub String);

impl FromStr for EasingFunction {
    type Err = UnknownEase;

    /// Parse GSAP ease names: `none`, `linear`, or `family.direction` where the
    /// direction is `in`, `out` (the default when omitted) or `inOut`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownEase(name.to_string());
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("linear") {
            return Ok(EasingFunction::Linear);
        }

        let (family, direction) = match trimmed.split_once('.') {
            Some((family, direction)) => (family, direction),
            None => (trimmed, "out"),
        };

        // power0 is GSAP's alias for linear
        let family = match family {
            "power0" => return Ok(EasingFunction::Linear),
            "power1" | "quad" => "quad",
            "power2" | "cubic" => "cubic",
            "power3" | "quart" => "quart",
            "power4" | "quint" | "strong" => "quint",
            other => other,
        };

        use EasingFunction::*;
        let easing = match (family, direction) {
            ("quad", "in") => EaseInQuad,
            ("quad", "out") => EaseOutQuad,
            ("quad", "inOut") => EaseInOutQuad,
            ("cubic", "in") => EaseInCubic,
            ("cubic", "out") => EaseOutCubic,
            ("cubic", "inOut") => EaseInOutCubic,
            ("quart", "in") => EaseInQuart,
            ("quart", "out") => EaseOutQuart,
            ("quart", "inOut") => EaseInOutQuart,
            ("quint", "in") => EaseInQuint,
            ("quint", "out") => EaseOutQuint,
            ("quint", "inOut") => EaseInOutQuint,
            ("sine", "in") => EaseInSine,
            ("sine", "out") => EaseOutSine,
            ("sine", "inOut") => EaseInOutSine,
            ("expo", "in") => EaseInExpo,
            ("expo", "out") => EaseOutExpo,
            ("expo", "inOut") => EaseInOutExpo,
            ("circ", "in") => EaseInCirc,
            ("circ", "out") => EaseOutCirc,
            ("circ", "inOut") => EaseInOutCirc,
            ("back", "in") => EaseInBack,
            ("back", "out") => EaseOutBack,
            ("back", "inOut") => EaseInOutBack,
            ("bounce", "in") => EaseInBounce,
            ("bounce", "out") => EaseOutBounce,
            ("bounce", "inOut") => EaseInOutBounce,
            _ => return Err(unknown()),
        };
        Ok(easing)
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }
}

// Implement Interpolatable for basic types
impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        assert_eq!(Interpolation::linear(0.0, 10.0, 0.5), 5.0);
        assert_eq!(Interpolation::linear(0.0, 10.0, 0.0), 0.0);
        assert_eq!(Interpolation::linear(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_easing_functions() {
        assert_eq!(EasingFunction::Linear.apply(0.5), 0.5);
        assert!(EasingFunction::EaseInQuad.apply(0.5) < 0.5);
        assert!(EasingFunction::EaseOutQuad.apply(0.5) > 0.5);
        assert!(EasingFunction::EaseOutExpo.apply(0.5) > 0.9);
    }

    #[test]
    fn test_easing_endpoints() {
        let all = [
            EasingFunction::Linear,
            EasingFunction::EaseInOutQuint,
            EasingFunction::EaseOutExpo,
            EasingFunction::EaseInOutCirc,
            EasingFunction::EaseOutBounce,
            EasingFunction::EaseInOutBounce,
        ];
        for easing in all {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_parse_gsap_names() {
        assert_eq!("expo.out".parse::<EasingFunction>(), Ok(EasingFunction::EaseOutExpo));
        assert_eq!("power1.in".parse::<EasingFunction>(), Ok(EasingFunction::EaseInQuad));
        assert_eq!("power3.inOut".parse::<EasingFunction>(), Ok(EasingFunction::EaseInOutQuart));
        assert_eq!("strong.in".parse::<EasingFunction>(), Ok(EasingFunction::EaseInQuint));
        assert_eq!("back".parse::<EasingFunction>(), Ok(EasingFunction::EaseOutBack));
        assert_eq!("none".parse::<EasingFunction>(), Ok(EasingFunction::Linear));
        assert_eq!("power0.inOut".parse::<EasingFunction>(), Ok(EasingFunction::Linear));
        assert!("elastic.sideways".parse::<EasingFunction>().is_err());
    }

    #[test]
    fn test_point_interpolation() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, -10.0);
        assert_eq!(start.lerp(&end, 0.5), Point::new(5.0, -5.0));
    }
}
