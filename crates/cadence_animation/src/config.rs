//! Animator configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How loudly a playback lookup miss is reported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Off,
    Debug,
    #[default]
    Warn,
}

/// Tunables for one animator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Multiplier applied to every tick's delta
    pub time_scale: f32,
    /// Upper bound for one tick's delta after scaling (seconds); `None` is unbounded
    pub max_tick_delta: Option<f32>,
    /// Level used when `play_by_name` or `play_by_index` finds nothing
    pub lookup_miss_level: DiagnosticLevel,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_tick_delta: None,
            lookup_miss_level: DiagnosticLevel::Warn,
        }
    }
}

impl AnimatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Turn a raw host delta into the delta the scheduler sees
    pub fn scale_delta(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        let scaled = dt * self.time_scale.max(0.0);
        match self.max_tick_delta {
            Some(max) if max >= 0.0 => scaled.min(max),
            _ => scaled,
        }
    }
}
