//! Easing functions for animations

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Named easing function
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseOutBack,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            Easing::EaseOutSine => (t * std::f32::consts::FRAC_PI_2).sin(),
            Easing::EaseInOutSine => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseOutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally so long or slow tweens don't jitter from f32
/// rounding.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    // Solve for parameter `p` where bezier_x(p) == x with Newton-Raphson,
    // dropping to binary search if the slope goes flat.
    let mut p = x; // initial guess
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break; // too flat to step on
        }
        p -= err / slope;
    }

    // Binary search fallback (always converges)
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// Cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

// ============================================================================
// Sampled curves
// ============================================================================

/// One sample of an easing curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Easing given as sampled (time, value) pairs
///
/// Evaluated piecewise-linearly. Times outside the key range hold the edge
/// values, and the output is always clamped to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct EasingCurve {
    keys: Vec<CurveKey>,
}

impl EasingCurve {
    /// Build a curve from keys in any order
    pub fn new(mut keys: Vec<CurveKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(AnimationError::InvalidCurve("curve has no keys".into()));
        }
        if let Some(bad) = keys
            .iter()
            .find(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(AnimationError::InvalidCurve(format!(
                "non-finite key ({}, {})",
                bad.time, bad.value
            )));
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys })
    }

    /// Sample `f` at `samples + 1` evenly spaced points over `[0, 1]`
    pub fn sampled(samples: usize, f: impl Fn(f32) -> f32) -> Self {
        let samples = samples.max(1);
        let keys = (0..=samples)
            .map(|i| {
                let t = i as f32 / samples as f32;
                CurveKey::new(t, f(t))
            })
            .collect();
        Self { keys }
    }

    /// Smooth ease-in-out from (0, 0) to (1, 1)
    pub fn ease_in_out() -> Self {
        Self::sampled(16, |t| t * t * (3.0 - 2.0 * t))
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Evaluate at normalized time `t`
    pub fn evaluate(&self, t: f32) -> f32 {
        let raw = self.evaluate_raw(t);
        if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn evaluate_raw(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; bounded by the edge checks above
        let next = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[next - 1];
        let b = self.keys[next];

        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.time) / span)
    }
}

impl Default for EasingCurve {
    fn default() -> Self {
        Self::ease_in_out()
    }
}

impl TryFrom<Vec<CurveKey>> for EasingCurve {
    type Error = AnimationError;

    fn try_from(keys: Vec<CurveKey>) -> Result<Self> {
        Self::new(keys)
    }
}

impl From<EasingCurve> for Vec<CurveKey> {
    fn from(curve: EasingCurve) -> Self {
        curve.keys
    }
}

// ============================================================================
// Resolved easing
// ============================================================================

/// The easing a sequence actually runs with
///
/// A curve, when present, takes precedence over the named function.
#[derive(Clone, Debug, PartialEq)]
pub enum Ease {
    Named(Easing),
    Curve(EasingCurve),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Named(Easing::Linear)
    }
}

impl Ease {
    pub fn resolve(easing: Easing, curve: Option<&EasingCurve>) -> Self {
        match curve {
            Some(curve) => Ease::Curve(curve.clone()),
            None => Ease::Named(easing),
        }
    }

    /// Eased progress for `t`, never NaN
    pub fn eval(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let eased = match self {
            Ease::Named(easing) => easing.apply(t),
            Ease::Curve(curve) => curve.evaluate(t),
        };
        if eased.is_finite() {
            eased
        } else {
            t
        }
    }
}

impl From<Easing> for Ease {
    fn from(easing: Easing) -> Self {
        Ease::Named(easing)
    }
}

impl From<EasingCurve> for Ease {
    fn from(curve: EasingCurve) -> Self {
        Ease::Curve(curve)
    }
}
