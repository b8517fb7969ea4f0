//! Single-property tween
//!
//! The interpolation primitive a sequence is built from. A tween knows its
//! endpoints and its window on the sequence clock; it does not keep time
//! itself.

use cadence_core::{PropertyValue, TargetId};

use crate::easing::Ease;

/// One property of one target moving from `from` to `to`
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: TargetId,
    pub from: PropertyValue,
    pub to: PropertyValue,
    /// Seconds before motion starts
    pub delay: f32,
    /// Seconds of motion
    pub duration: f32,
}

impl Tween {
    pub fn new(target: TargetId, from: PropertyValue, to: PropertyValue) -> Self {
        Self {
            target,
            from,
            to,
            delay: 0.0,
            duration: 0.0,
        }
    }

    /// Builder: set the duration (negatives clamp to zero)
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = sanitize(seconds);
        self
    }

    /// Builder: set the delay (negatives clamp to zero)
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = sanitize(seconds);
        self
    }

    /// Time at which this tween reaches `to`
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Eased progress at `time` on the sequence clock, or `None` before the delay
    pub fn progress(&self, time: f32, ease: &Ease) -> Option<f32> {
        let local = time - self.delay;
        if local < 0.0 {
            return None;
        }
        if self.duration <= 0.0 || local >= self.duration {
            return Some(1.0);
        }
        Some(ease.eval(local / self.duration))
    }

    /// Interpolated value at `time`, or `None` before the delay
    pub fn sample(&self, time: f32, ease: &Ease) -> Option<PropertyValue> {
        self.progress(time, ease)
            .map(|t| self.from.lerp(&self.to, t))
    }
}

fn sanitize(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn fade() -> Tween {
        Tween::new(TargetId(1), PropertyValue::Alpha(0.0), PropertyValue::Alpha(1.0))
            .duration(2.0)
            .delay(1.0)
    }

    #[test]
    fn test_nothing_before_delay() {
        assert_eq!(fade().sample(0.5, &Ease::default()), None);
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(
            fade().sample(2.0, &Ease::default()),
            Some(PropertyValue::Alpha(0.5))
        );
    }

    #[test]
    fn test_holds_end_value() {
        let ease = Ease::Named(Easing::EaseOutQuad);
        assert_eq!(fade().sample(10.0, &ease), Some(PropertyValue::Alpha(1.0)));
        assert_eq!(fade().end_time(), 3.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let tween = Tween::new(TargetId(1), PropertyValue::Alpha(0.0), PropertyValue::Alpha(1.0));
        assert_eq!(tween.sample(0.0, &Ease::default()), Some(PropertyValue::Alpha(1.0)));
    }

    #[test]
    fn test_negative_timing_clamps() {
        let tween = fade().duration(-3.0).delay(f32::NAN);
        assert_eq!(tween.duration, 0.0);
        assert_eq!(tween.delay, 0.0);
    }
}
