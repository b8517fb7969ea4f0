//! Activation toggles
//!
//! One-shot boolean changes applied when a step starts playing. They are not
//! animated and nothing rolls them back.

use cadence_core::{AnimationHost, TargetId, ToggleKind};
use serde::{Deserialize, Serialize};

/// Set one activation flag on one external object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle {
    pub target: TargetId,
    #[serde(default)]
    pub kind: ToggleKind,
    pub active: bool,
}

impl Toggle {
    /// Show or hide a whole object
    pub fn object(target: TargetId, active: bool) -> Self {
        Self {
            target,
            kind: ToggleKind::Object,
            active,
        }
    }

    /// Enable or disable a component
    pub fn component(target: TargetId, enabled: bool) -> Self {
        Self {
            target,
            kind: ToggleKind::Component,
            active: enabled,
        }
    }
}

/// Apply every toggle in order. Missing targets are skipped.
///
/// Returns how many were applied.
pub fn apply_toggles(toggles: &[Toggle], host: &mut dyn AnimationHost) -> usize {
    let mut applied = 0;
    for toggle in toggles {
        if host.set_active(toggle.target, toggle.kind, toggle.active) {
            applied += 1;
        } else {
            tracing::trace!(node = %toggle.target, kind = ?toggle.kind, "toggle target missing");
        }
    }
    applied
}
