//! On/off bindings
//!
//! Maps a two-state control to two lists of step names. Every flip plays the
//! list for the new state by name.

use cadence_core::AnimationHost;
use serde::{Deserialize, Serialize};

use crate::animator::Animator;
use crate::scheduler::SequenceId;

/// Plays named steps when a two-state control flips
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleBinding {
    /// Steps played when switching on
    #[serde(default)]
    pub on: Vec<String>,
    /// Steps played when switching off
    #[serde(default)]
    pub off: Vec<String>,
    #[serde(default = "default_is_on")]
    is_on: bool,
}

fn default_is_on() -> bool {
    true
}

impl Default for ToggleBinding {
    fn default() -> Self {
        Self {
            on: Vec::new(),
            off: Vec::new(),
            is_on: true,
        }
    }
}

impl ToggleBinding {
    pub fn new(on: Vec<String>, off: Vec<String>) -> Self {
        Self {
            on,
            off,
            is_on: true,
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Flip the state and play the new state's steps.
    ///
    /// Names with no matching step are skipped. Returns the sequences started.
    pub fn flip(&mut self, animator: &mut Animator, host: &mut dyn AnimationHost) -> Vec<SequenceId> {
        self.is_on = !self.is_on;
        let names = if self.is_on { &self.on } else { &self.off };
        tracing::debug!(on = self.is_on, steps = names.len(), "binding flipped");

        names
            .iter()
            .filter_map(|name| animator.play_by_name(name, host))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::AnimationStep;
    use cadence_core::{Property, PropertyValue, Scene, SceneNode, TargetId};

    const KNOB: TargetId = TargetId(1);

    #[test]
    fn test_first_flip_plays_off_list() {
        let mut scene = Scene::new().with_node(KNOB, SceneNode::group());
        let mut animator = Animator::new()
            .step(AnimationStep::new("show").group(KNOB).fade_to(1.0).duration(0.0))
            .step(AnimationStep::new("hide").group(KNOB).fade_to(0.0).duration(0.0));
        let mut binding = ToggleBinding::new(vec!["show".into()], vec!["hide".into(), "nope".into()]);

        let started = binding.flip(&mut animator, &mut scene);
        assert!(!binding.is_on());
        assert_eq!(started.len(), 1);

        animator.tick(0.0, &mut scene);
        assert_eq!(scene.property(KNOB, Property::Alpha), Some(PropertyValue::Alpha(0.0)));

        binding.flip(&mut animator, &mut scene);
        animator.tick(0.0, &mut scene);
        assert!(binding.is_on());
        assert_eq!(scene.property(KNOB, Property::Alpha), Some(PropertyValue::Alpha(1.0)));
    }
}
