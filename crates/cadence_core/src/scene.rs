//! In-memory host
//!
//! A flat map of nodes that answers the [`AnimationHost`] calls without any
//! real visual surface behind it. Used for headless simulation and tests.

use rustc_hash::FxHashMap;

use crate::target::{AnimationHost, TargetId, ToggleKind};
use crate::value::{Color, Property, PropertyValue, Vec3};

/// One externally owned object
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    properties: FxHashMap<Property, PropertyValue>,
    /// Object visibility
    pub active: bool,
    /// Component enablement
    pub enabled: bool,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode {
    /// A node with no properties, active and enabled
    pub fn new() -> Self {
        Self {
            properties: FxHashMap::default(),
            active: true,
            enabled: true,
        }
    }

    /// A node carrying position, scale and rotation at identity
    pub fn transform() -> Self {
        Self::new()
            .with(PropertyValue::Position(Vec3::ZERO))
            .with(PropertyValue::Scale(Vec3::ONE))
            .with(PropertyValue::Rotation(Vec3::ZERO))
    }

    /// A node carrying a white color
    pub fn graphic() -> Self {
        Self::new().with(PropertyValue::Color(Color::WHITE))
    }

    /// A node carrying full alpha
    pub fn group() -> Self {
        Self::new().with(PropertyValue::Alpha(1.0))
    }

    /// Builder: set or add a property
    pub fn with(mut self, value: PropertyValue) -> Self {
        self.properties.insert(value.property(), value);
        self
    }

    /// Builder: set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn get(&self, property: Property) -> Option<PropertyValue> {
        self.properties.get(&property).copied()
    }

    pub fn has(&self, property: Property) -> bool {
        self.properties.contains_key(&property)
    }

    /// Properties in a stable order
    pub fn properties(&self) -> impl Iterator<Item = PropertyValue> + '_ {
        Property::ALL
            .into_iter()
            .filter_map(|p| self.properties.get(&p).copied())
    }
}

/// Something the scene observed the engine do
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    Set(TargetId, PropertyValue),
    Active(TargetId, ToggleKind, bool),
}

/// In-memory [`AnimationHost`]
///
/// Every successful mutation is appended to a history while recording is on
/// (the default). The scene never trims it: a host that ticks for a long
/// time should drain it with [`clear_history`](Self::clear_history) or turn
/// recording off with [`without_history`](Self::without_history).
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: FxHashMap<TargetId, SceneNode>,
    history: Vec<SceneEvent>,
    recording: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: FxHashMap::default(),
            history: Vec::new(),
            recording: true,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: stop recording mutations
    pub fn without_history(mut self) -> Self {
        self.set_recording(false);
        self
    }

    /// Turn history recording on or off. Turning it off drops what was kept.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
        if !recording {
            self.history = Vec::new();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Builder: add a node
    pub fn with_node(mut self, id: TargetId, node: SceneNode) -> Self {
        self.insert(id, node);
        self
    }

    pub fn insert(&mut self, id: TargetId, node: SceneNode) -> Option<SceneNode> {
        self.nodes.insert(id, node)
    }

    /// Remove a node, simulating an external object being destroyed
    pub fn remove(&mut self, id: TargetId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn node(&self, id: TargetId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: TargetId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Node ids in ascending order
    pub fn ids(&self) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutations recorded since the last [`clear_history`](Self::clear_history)
    pub fn history(&self) -> &[SceneEvent] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of writes to one property of one target
    pub fn write_count(&self, id: TargetId, property: Property) -> usize {
        self.history
            .iter()
            .filter(|e| matches!(e, SceneEvent::Set(t, v) if *t == id && v.property() == property))
            .count()
    }
}

impl Scene {
    fn record(&mut self, event: SceneEvent) {
        if self.recording {
            self.history.push(event);
        }
    }
}

impl AnimationHost for Scene {
    fn property(&self, target: TargetId, property: Property) -> Option<PropertyValue> {
        self.nodes.get(&target)?.get(property)
    }

    fn set_property(&mut self, target: TargetId, value: PropertyValue) -> bool {
        let Some(node) = self.nodes.get_mut(&target) else {
            return false;
        };
        node.properties.insert(value.property(), value);
        self.record(SceneEvent::Set(target, value));
        true
    }

    fn set_active(&mut self, target: TargetId, kind: ToggleKind, active: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&target) else {
            return false;
        };
        match kind {
            ToggleKind::Object => node.active = active,
            ToggleKind::Component => node.enabled = active,
        }
        self.record(SceneEvent::Active(target, kind, active));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: TargetId = TargetId(1);

    #[test]
    fn test_missing_target_reads_none() {
        let scene = Scene::new();
        assert_eq!(scene.property(PANEL, Property::Alpha), None);
    }

    #[test]
    fn test_missing_property_reads_none() {
        let scene = Scene::new().with_node(PANEL, SceneNode::group());
        assert_eq!(scene.property(PANEL, Property::Position), None);
        assert_eq!(scene.property(PANEL, Property::Alpha), Some(PropertyValue::Alpha(1.0)));
    }

    #[test]
    fn test_set_records_history() {
        let mut scene = Scene::new().with_node(PANEL, SceneNode::group());

        assert!(scene.set_property(PANEL, PropertyValue::Alpha(0.5)));
        assert!(!scene.set_property(TargetId(99), PropertyValue::Alpha(0.5)));

        assert_eq!(scene.history().len(), 1);
        assert_eq!(scene.write_count(PANEL, Property::Alpha), 1);
    }

    #[test]
    fn test_history_can_be_turned_off() {
        let mut scene = Scene::new().with_node(PANEL, SceneNode::group());
        scene.set_property(PANEL, PropertyValue::Alpha(0.5));
        assert!(scene.is_recording());

        scene.set_recording(false);
        assert!(scene.history().is_empty());
        for i in 0..1000 {
            scene.set_property(PANEL, PropertyValue::Alpha(i as f32 / 1000.0));
            scene.set_active(PANEL, ToggleKind::Object, i % 2 == 0);
        }
        assert!(scene.history().is_empty());
        assert_eq!(scene.property(PANEL, Property::Alpha), Some(PropertyValue::Alpha(0.999)));

        let quiet = Scene::new().without_history();
        assert!(!quiet.is_recording());
    }

    #[test]
    fn test_toggle_flavors() {
        let mut scene = Scene::new().with_node(PANEL, SceneNode::new());

        scene.set_active(PANEL, ToggleKind::Object, false);
        scene.set_active(PANEL, ToggleKind::Component, false);

        let node = scene.node(PANEL).unwrap();
        assert!(!node.active);
        assert!(!node.enabled);
    }

    #[test]
    fn test_removed_node_is_missing() {
        let mut scene = Scene::new().with_node(PANEL, SceneNode::transform());
        scene.remove(PANEL);
        assert!(!scene.set_active(PANEL, ToggleKind::Object, true));
        assert!(scene.is_empty());
    }
}
