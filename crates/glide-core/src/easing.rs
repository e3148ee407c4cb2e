//! Easing functions for transition timing.
//!
//! Implements the CSS timing-function family: linear, the named ease
//! curves, and custom cubic beziers. An easing function maps linear
//! progress (0.0 to 1.0) to eased progress.

use serde::{Deserialize, Serialize};

/// Easing function applied to a transition's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// CSS `ease`: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`: `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`: `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom cubic bezier with control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the easing function at linear progress `t` (clamped to
    /// 0.0..=1.0).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Create a custom cubic bezier easing.
    ///
    /// # Panics
    /// Panics if `x1` or `x2` are outside 0.0..=1.0.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "bezier x control points must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }
}

/// Sample the one-dimensional cubic bezier `3(1-t)²t·a + 3(1-t)t²·b + t³`.
#[inline]
fn bezier_axis(a: f32, b: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * a + 3.0 * mt * t * t * b + t * t * t
}

/// Evaluate the bezier timing curve at linear progress `x`.
///
/// Newton-Raphson on the x axis finds the curve parameter, then the y axis
/// gives the eased output.
fn bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut t = x;
    for _ in 0..8 {
        let error = bezier_axis(x1, x2, t) - x;
        if error.abs() < 1e-6 {
            break;
        }
        let mt = 1.0 - t;
        let slope = 3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    bezier_axis(y1, y2, t)
}
