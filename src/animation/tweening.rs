use crate::animation::interpolation::{EasingFunction, Interpolatable};

/// A tween animation between two values.
///
/// Time is supplied by the caller in milliseconds (a frame timestamp, or
/// `performance.now()` in the browser), so the same tween plays identically
/// under a real clock and a scripted one.
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolatable + Clone> {
    /// Starting value
    pub from: T,
    /// Ending value
    pub to: T,
    /// Animation duration in milliseconds
    pub duration_ms: f64,
    /// Easing function to use
    pub easing: EasingFunction,
    /// When the animation started
    start_time: Option<f64>,
}

impl<T: Interpolatable + Clone> Tween<T> {
    /// Create a new tween
    pub fn new(from: T, to: T, duration_ms: f64) -> Self {
        Self::with_easing(from, to, duration_ms, EasingFunction::EaseInOutQuad)
    }

    /// Create a new tween with custom easing
    pub fn with_easing(from: T, to: T, duration_ms: f64, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            easing,
            start_time: None,
        }
    }

    /// Start the animation at `now`
    pub fn start(&mut self, now: f64) {
        self.start_time = Some(now);
    }

    /// Create and start in one go
    pub fn started(mut self, now: f64) -> Self {
        self.start(now);
        self
    }

    /// Stop the animation
    pub fn stop(&mut self) {
        self.start_time = None;
    }

    /// Check if the animation is running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    /// Check if the animation has reached its end at `now`
    pub fn is_finished(&self, now: f64) -> bool {
        self.start_time.is_some() && self.progress(now) >= 1.0
    }

    /// Get the progress at `now` (0.0 to 1.0)
    pub fn progress(&self, now: f64) -> f64 {
        match self.start_time {
            Some(_) if self.duration_ms <= 0.0 => 1.0,
            Some(start) => ((now - start) / self.duration_ms).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// Get the value at `now`
    pub fn value_at(&self, now: f64) -> T {
        let eased_progress = self.easing.apply(self.progress(now));
        self.from.lerp(&self.to, eased_progress)
    }

    /// Update the tween and return the current value.
    ///
    /// Returns `None` once the tween is stopped; the update that reaches the end
    /// yields the exact target and stops the tween.
    pub fn update(&mut self, now: f64) -> Option<T> {
        self.start_time?;

        if self.is_finished(now) {
            self.stop();
            Some(self.to.clone())
        } else {
            Some(self.value_at(now))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    #[test]
    fn test_tween_creation() {
        let tween = Tween::new(0.0, 10.0, 1000.0);
        assert_eq!(tween.from, 0.0);
        assert_eq!(tween.to, 10.0);
        assert!(!tween.is_running());
        assert_eq!(tween.progress(500.0), 0.0);
    }

    #[test]
    fn test_tween_progress() {
        let mut tween = Tween::with_easing(0.0, 10.0, 100.0, EasingFunction::Linear);
        tween.start(1000.0);

        assert_eq!(tween.progress(1050.0), 0.5);
        assert_eq!(tween.update(1050.0), Some(5.0));
        assert!(tween.is_running());

        assert_eq!(tween.update(1100.0), Some(10.0));
        assert!(!tween.is_running());
        assert_eq!(tween.update(1116.0), None);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut tween = Tween::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0), 0.0).started(0.0);
        assert_eq!(tween.update(0.0), Some(Point::new(4.0, 2.0)));
        assert!(!tween.is_running());
    }
}
