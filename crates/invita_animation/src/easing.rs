//! Easing curves
//!
//! Maps linear progress (0.0 to 1.0) onto an eased progress. Names follow
//! both kebab-case (`ease-in-out-cubic`) and the GSAP vocabulary the scene
//! configuration is usually written in (`power2.inOut`, `back.out`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overshoot constant for [`Easing::BackOut`]
const BACK_OVERSHOOT: f32 = 1.70158;

/// Easing function applied to a step's local progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    /// GSAP `power2.in`
    EaseInCubic,
    /// GSAP `power2.out`
    EaseOutCubic,
    /// GSAP `power2.inOut`
    EaseInOutCubic,
    /// Overshoots the target slightly before settling (GSAP `back.out`)
    BackOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped into 0.0..=1.0
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            Easing::EaseOut => (t * std::f32::consts::FRAC_PI_2).sin(),
            Easing::EaseInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
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
            Easing::BackOut => {
                let c3 = BACK_OVERSHOOT + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + BACK_OVERSHOOT * (t - 1.0).powi(2)
            }
        }
    }

    fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::EaseInQuad => "ease-in-quad",
            Easing::EaseOutQuad => "ease-out-quad",
            Easing::EaseInOutQuad => "ease-in-out-quad",
            Easing::EaseInCubic => "ease-in-cubic",
            Easing::EaseOutCubic => "ease-out-cubic",
            Easing::EaseInOutCubic => "ease-in-out-cubic",
            Easing::BackOut => "back-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an easing name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.trim() {
            "linear" | "none" => Easing::Linear,
            "ease-in" | "sine.in" => Easing::EaseIn,
            "ease-out" | "sine.out" => Easing::EaseOut,
            "ease-in-out" | "sine.inOut" => Easing::EaseInOut,
            "ease-in-quad" | "power1.in" => Easing::EaseInQuad,
            "ease-out-quad" | "power1.out" => Easing::EaseOutQuad,
            "ease-in-out-quad" | "power1.inOut" => Easing::EaseInOutQuad,
            "ease-in-cubic" | "power2.in" => Easing::EaseInCubic,
            "ease-out-cubic" | "power2.out" => Easing::EaseOutCubic,
            "ease-in-out-cubic" | "power2.inOut" => Easing::EaseInOutCubic,
            // back.out(1.7) is the overshoot GSAP ships as its default
            "back-out" | "back.out" | "back.out(1.7)" => Easing::BackOut,
            other => return Err(UnknownEasing(other.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = UnknownEasing;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
