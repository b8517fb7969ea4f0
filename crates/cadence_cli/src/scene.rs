//! Scene file handling
//!
//! A scene file is TOML describing the targets a simulation owns, the
//! animator's configuration, its steps and any on/off bindings:
//!
//! ```toml
//! [animator]
//! time_scale = 1.0
//!
//! [[targets]]
//! id = 1
//! name = "panel"
//! alpha = 1.0
//!
//! [[steps]]
//! name = "fade-out"
//! trigger = "OnStart"
//! targets = { group = 1 }
//! alpha = { to = 0.0 }
//! ```

use anyhow::{Context, Result};
use cadence_animation::{AnimationStep, Animator, AnimatorConfig, ToggleBinding};
use cadence_core::{Color, Property, PropertyValue, Scene, SceneNode, TargetId, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Top-level scene file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SceneFile {
    #[serde(default)]
    pub animator: AnimatorConfig,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub steps: Vec<AnimationStep>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

/// One target and the properties it starts with
///
/// A property left out is one the target does not carry.
#[derive(Debug, Deserialize, Serialize)]
pub struct TargetSpec {
    pub id: TargetId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default)]
    pub rotation: Option<Vec3>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub alpha: Option<f32>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// A named on/off binding over step names
#[derive(Debug, Deserialize, Serialize)]
pub struct BindingSpec {
    pub name: String,
    #[serde(default)]
    pub on: Vec<String>,
    #[serde(default)]
    pub off: Vec<String>,
}

impl TargetSpec {
    fn node(&self) -> SceneNode {
        let values = [
            self.position.map(PropertyValue::Position),
            self.scale.map(PropertyValue::Scale),
            self.rotation.map(PropertyValue::Rotation),
            self.color.map(PropertyValue::Color),
            self.alpha.map(PropertyValue::Alpha),
        ];
        let mut node = values
            .into_iter()
            .flatten()
            .fold(SceneNode::new(), SceneNode::with)
            .with_active(self.active);
        node.enabled = self.enabled;
        node
    }

    fn carries(&self, property: Property) -> bool {
        match property {
            Property::Position => self.position.is_some(),
            Property::Scale => self.scale.is_some(),
            Property::Rotation => self.rotation.is_some(),
            Property::Color => self.color.is_some(),
            Property::Alpha => self.alpha.is_some(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl SceneFile {
    /// Load a scene file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No scene file at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid scene file")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scene")
    }

    /// Build the in-memory host holding every target
    pub fn build_scene(&self) -> Scene {
        self.targets
            .iter()
            .fold(Scene::new(), |scene, target| scene.with_node(target.id, target.node()))
    }

    /// Build an animator over a copy of every step
    pub fn build_animator(&self) -> Animator {
        Animator::from_steps(self.steps.iter().cloned(), self.animator.clone())
    }

    pub fn binding(&self, name: &str) -> Option<ToggleBinding> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| ToggleBinding::new(b.on.clone(), b.off.clone()))
    }

    pub fn target_name(&self, id: TargetId) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.name.as_deref())
    }
}

// =============================================================================
// Validation
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One finding from [`SceneFile::check`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

impl SceneFile {
    /// Look for authoring mistakes the engine would silently tolerate.
    ///
    /// Errors are things that can never work (a target defined twice, a
    /// binding naming a step that does not exist). Warnings are things that
    /// will be skipped at play time.
    pub fn check(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        let mut ids = FxHashSet::default();
        for target in &self.targets {
            if !ids.insert(target.id) {
                issues.push(Issue::error(format!("target {} is defined more than once", target.id)));
            }
        }

        let mut names = FxHashSet::default();
        for (index, step) in self.steps.iter().enumerate() {
            let label = format!("step {} ({:?})", index, step.name);

            if !names.insert(step.name.as_str()) {
                issues.push(Issue::warning(format!(
                    "{} shares its name with an earlier step and cannot be played by name",
                    label
                )));
            }

            if step.is_noop() {
                issues.push(Issue::warning(format!("{} animates nothing and toggles nothing", label)));
            }

            for property in Property::ALL {
                let (enabled, _) = step.track(property);
                if !enabled {
                    continue;
                }
                let Some(id) = step.targets.slot(property) else {
                    issues.push(Issue::warning(format!(
                        "{} enables {} but has no target for it",
                        label,
                        property.name()
                    )));
                    continue;
                };
                match self.targets.iter().find(|t| t.id == id) {
                    None => issues.push(Issue::warning(format!(
                        "{} animates {} on unknown target {}",
                        label,
                        property.name(),
                        id
                    ))),
                    Some(target) if !target.carries(property) => issues.push(Issue::warning(format!(
                        "{} animates {} but target {} has none",
                        label,
                        property.name(),
                        id
                    ))),
                    Some(_) => {}
                }
            }

            for toggle in &step.toggles {
                if !ids.contains(&toggle.target) {
                    issues.push(Issue::warning(format!(
                        "{} toggles unknown target {}",
                        label, toggle.target
                    )));
                }
            }
        }

        for binding in &self.bindings {
            for name in binding.on.iter().chain(&binding.off) {
                if !names.contains(name.as_str()) {
                    issues.push(Issue::error(format!(
                        "binding {:?} names missing step {:?}",
                        binding.name, name
                    )));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_animation::TriggerMode;
    use cadence_core::AnimationHost;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[animator]
time_scale = 2.0

[[targets]]
id = 1
name = "panel"
alpha = 1.0

[[targets]]
id = 2
position = { x = 0.0, y = 0.0, z = 0.0 }
scale = { x = 1.0, y = 1.0, z = 1.0 }
active = false

[[steps]]
name = "fade-out"
trigger = "OnStart"
targets = { group = 1 }
alpha = { to = 0.0 }
duration = 0.5

[[steps]]
name = "slide"
targets = { transform = 2 }
position = { to = { x = 10.0 } }
toggles = [{ target = 2, active = true }]

[[bindings]]
name = "menu"
on = ["slide"]
off = ["fade-out"]
"#;

    #[test]
    fn test_parse_sample() {
        let file = SceneFile::from_toml_str(SAMPLE).unwrap();

        assert_eq!(file.animator.time_scale, 2.0);
        assert_eq!(file.targets.len(), 2);
        assert_eq!(file.steps.len(), 2);
        assert_eq!(file.steps[0].trigger, TriggerMode::OnStart);
        assert_eq!(file.target_name(TargetId(1)), Some("panel"));
        assert_eq!(file.target_name(TargetId(2)), None);
        assert!(file.check().is_empty());
    }

    #[test]
    fn test_build_scene_carries_only_listed_properties() {
        let file = SceneFile::from_toml_str(SAMPLE).unwrap();
        let scene = file.build_scene();

        assert_eq!(scene.property(TargetId(1), Property::Alpha), Some(PropertyValue::Alpha(1.0)));
        assert_eq!(scene.property(TargetId(1), Property::Position), None);
        assert!(!scene.node(TargetId(2)).unwrap().active);
    }

    #[test]
    fn test_build_animator_keeps_order() {
        let file = SceneFile::from_toml_str(SAMPLE).unwrap();
        let animator = file.build_animator();

        assert_eq!(animator.len(), 2);
        assert_eq!(animator.find_by_name("slide"), animator.id_at(1));
        assert_eq!(animator.config().time_scale, 2.0);
    }

    #[test]
    fn test_binding_lookup() {
        let file = SceneFile::from_toml_str(SAMPLE).unwrap();
        let binding = file.binding("menu").unwrap();

        assert_eq!(binding.on, vec!["slide".to_string()]);
        assert!(file.binding("nope").is_none());
    }

    #[test]
    fn test_check_reports_problems() {
        let file = SceneFile::from_toml_str(
            r#"
[[targets]]
id = 1
alpha = 1.0

[[targets]]
id = 1

[[steps]]
name = "a"
targets = { group = 1, transform = 9 }
alpha = { to = 0.0 }
scale = { to = { x = 2.0, y = 2.0, z = 2.0 } }

[[steps]]
name = "a"

[[steps]]
name = "c"
targets = { transform = 1 }
position = { to = { x = 5.0 } }
color = { to = { r = 1.0, g = 0.0, b = 0.0 } }
toggles = [{ target = 42, active = true }]

[[bindings]]
name = "b"
on = ["missing"]
"#,
        )
        .unwrap();

        let issues = file.check();
        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        assert_eq!(errors, 2);
        assert!(issues.iter().any(|i| i.message.contains("unknown target #9")));
        assert!(issues.iter().any(|i| i.message.contains("animates nothing")));
        assert!(issues.iter().any(|i| i.message.contains("shares its name")));

        let step_c: Vec<&str> = issues
            .iter()
            .filter(|i| i.message.starts_with("step 2 "))
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            step_c,
            vec![
                "step 2 (\"c\") animates position but target #1 has none",
                "step 2 (\"c\") enables color but has no target for it",
                "step 2 (\"c\") toggles unknown target #42",
            ]
        );
        assert!(issues
            .iter()
            .filter(|i| i.message.starts_with("step 2 "))
            .all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_bad_curve_is_parse_error() {
        let err = SceneFile::from_toml_str(
            r#"
[[steps]]
name = "x"
curve = []
"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid scene file"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let file = SceneFile::from_toml_str(SAMPLE).unwrap();
        let again = SceneFile::from_toml_str(&file.to_toml().unwrap()).unwrap();
        assert_eq!(again.steps[1].position, file.steps[1].position);
    }
}
