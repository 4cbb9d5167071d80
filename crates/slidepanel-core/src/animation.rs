#![forbid(unsafe_code)]

//! Deterministic model of the slide animation.
//!
//! Browsers play the slide themselves; hosts that own their clock (headless
//! documents, tests) tick a [`SlideAnimation`] instead and report completion
//! when [`Animation::is_complete`] flips.
//!
//! # Invariants
//!
//! 1. `value()` is `elapsed / duration`, clamped to `[0.0, 1.0]`.
//! 2. `is_complete()` is true once `elapsed >= duration`.
//! 3. A zero duration is clamped to 1ns to avoid division by zero.

use std::time::Duration;

use crate::direction::SlideKeyframes;

/// A tickable animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    fn is_complete(&self) -> bool;

    /// Normalized progress in `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);

    /// Time ticked past the end.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Linear horizontal slide between two keyframes.
#[derive(Debug, Clone, Copy)]
pub struct SlideAnimation {
    keyframes: SlideKeyframes,
    elapsed: Duration,
    duration: Duration,
}

impl SlideAnimation {
    #[must_use]
    pub fn new(keyframes: SlideKeyframes, duration: Duration) -> Self {
        Self {
            keyframes,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    #[must_use]
    pub const fn keyframes(&self) -> SlideKeyframes {
        self.keyframes
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Current horizontal offset in percent of the element width.
    #[must_use]
    pub fn offset_percent(&self) -> f32 {
        self.keyframes.offset_at(self.value())
    }
}

impl Animation for SlideAnimation {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::{SLIDE_FROM_LEFT, SLIDE_FROM_RIGHT};

    const MS90: Duration = Duration::from_millis(90);
    const MS180: Duration = Duration::from_millis(180);

    #[test]
    fn from_right_moves_toward_zero() {
        let mut anim = SlideAnimation::new(SLIDE_FROM_RIGHT.keyframes(100), MS180);
        assert_eq!(anim.offset_percent(), 100.0);
        anim.tick(MS90);
        assert!((anim.offset_percent() - 50.0).abs() < 0.01);
        assert!(!anim.is_complete());
        anim.tick(MS90);
        assert!(anim.is_complete());
        assert_eq!(anim.offset_percent(), 0.0);
    }

    #[test]
    fn from_left_starts_negative() {
        let anim = SlideAnimation::new(SLIDE_FROM_LEFT.keyframes(100), MS180);
        assert_eq!(anim.offset_percent(), -100.0);
    }

    #[test]
    fn overshoot_and_reset() {
        let mut anim = SlideAnimation::new(SLIDE_FROM_LEFT.keyframes(100), MS180);
        anim.tick(Duration::from_millis(200));
        assert_eq!(anim.overshoot(), Duration::from_millis(20));
        assert_eq!(anim.value(), 1.0);
        anim.reset();
        assert_eq!(anim.elapsed(), Duration::ZERO);
        assert!(!anim.is_complete());
    }

    #[test]
    fn zero_duration_clamped() {
        let mut anim = SlideAnimation::new(SLIDE_FROM_RIGHT.keyframes(100), Duration::ZERO);
        assert_eq!(anim.duration(), Duration::from_nanos(1));
        anim.tick(Duration::from_nanos(1));
        assert!(anim.is_complete());
    }
}
