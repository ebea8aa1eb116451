//! Time-based interpolation for animated chart attributes.
//!
//! Every animated attribute (tick position, mark centre, label x) is a
//! [`Tween`]. Time is passed in explicitly as the offset since the chart was
//! created, so sampling is a pure function of `now`.

use std::time::Duration;

/// Easing curve applied to transition progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Duration and curve shared by every transition of one redraw pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            duration: Duration::from_millis(1000),
            easing: Easing::CubicInOut,
        }
    }
}

/// One animated scalar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Duration,
    timing: Timing,
}

impl Tween {
    /// A value that is already at rest
    pub fn fixed(value: f64) -> Self {
        Tween {
            from: value,
            to: value,
            start: Duration::ZERO,
            timing: Timing {
                duration: Duration::ZERO,
                easing: Easing::Linear,
            },
        }
    }

    pub fn new(from: f64, to: f64, start: Duration, timing: Timing) -> Self {
        Tween {
            from,
            to,
            start,
            timing,
        }
    }

    pub fn sample(&self, now: Duration) -> f64 {
        if now < self.start {
            return self.from;
        }
        let elapsed = now - self.start;
        if elapsed >= self.timing.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.timing.duration.as_secs_f64();
        let e = self.timing.easing.apply(t);
        self.from * (1.0 - e) + self.to * e
    }

    /// Start a new transition toward `to` from wherever the value is at `now`.
    ///
    /// An in-flight transition is interrupted, not queued behind.
    pub fn retarget(&mut self, to: f64, now: Duration, timing: Timing) {
        self.from = self.sample(now);
        self.to = to;
        self.start = now;
        self.timing = timing;
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.start + self.timing.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert_relative_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        assert!(Easing::CubicInOut.apply(0.25) < 0.25);
        assert!(Easing::CubicInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn tween_reaches_target() {
        let tween = Tween::new(0.0, 100.0, ms(0), Timing::default());
        assert_eq!(tween.sample(ms(0)), 0.0);
        assert_relative_eq!(tween.sample(ms(500)), 50.0);
        assert_eq!(tween.sample(ms(1000)), 100.0);
        assert_eq!(tween.sample(ms(5000)), 100.0);
        assert!(!tween.is_finished(ms(999)));
        assert!(tween.is_finished(ms(1000)));
    }

    #[test]
    fn fixed_tween_never_moves() {
        let tween = Tween::fixed(42.0);
        assert_eq!(tween.sample(ms(0)), 42.0);
        assert_eq!(tween.sample(ms(250)), 42.0);
        assert!(tween.is_finished(ms(0)));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut tween = Tween::new(0.0, 100.0, ms(0), Timing::default());
        tween.retarget(0.0, ms(500), Timing::default());

        // picks up at the midpoint instead of snapping
        assert_relative_eq!(tween.sample(ms(500)), 50.0);
        assert_relative_eq!(tween.sample(ms(1000)), 25.0);
        assert_eq!(tween.sample(ms(1500)), 0.0);
        assert_eq!(tween.target(), 0.0);
    }

    #[test]
    fn zero_duration_lands_on_target_immediately() {
        let timing = Timing {
            duration: Duration::ZERO,
            easing: Easing::CubicInOut,
        };
        let mut tween = Tween::new(5.0, 5.0, ms(0), timing);
        tween.retarget(80.0, ms(1000), timing);
        assert_eq!(tween.sample(ms(999)), 5.0);
        assert_eq!(tween.sample(ms(1000)), 80.0);
        assert!(tween.is_finished(ms(1000)));
    }

    #[test]
    fn linear_timing() {
        let timing = Timing {
            duration: ms(200),
            easing: Easing::Linear,
        };
        let tween = Tween::new(10.0, 20.0, ms(100), timing);
        assert_eq!(tween.sample(ms(50)), 10.0);
        assert_relative_eq!(tween.sample(ms(150)), 12.5);
    }
}
