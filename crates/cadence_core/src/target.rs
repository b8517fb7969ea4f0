//! Target references and the host boundary
//!
//! Targets are opaque. The engine never holds on to the objects themselves;
//! it asks the host to read or write through a [`TargetId`] every time, so a
//! target that has gone away simply reads back as `None`.

use serde::{Deserialize, Serialize};

use crate::value::{Property, PropertyValue};

/// Opaque reference to an external object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Flavor of an activation toggle
///
/// Both reduce to setting one boolean capability flag on an external
/// resource; the host decides what the flag means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleKind {
    /// Whole-object visibility
    #[default]
    Object,
    /// Component-level enablement
    Component,
}

/// Outbound interface the engine drives
///
/// Implemented by whatever owns the visual surfaces.
pub trait AnimationHost {
    /// Current value of `property` on `target`, or `None` if either is missing
    fn property(&self, target: TargetId, property: Property) -> Option<PropertyValue>;

    /// Write a value. Returns `false` if the target is missing.
    fn set_property(&mut self, target: TargetId, value: PropertyValue) -> bool;

    /// Flip an activation flag. Returns `false` if the target is missing.
    fn set_active(&mut self, target: TargetId, kind: ToggleKind, active: bool) -> bool;
}

impl<H: AnimationHost + ?Sized> AnimationHost for &mut H {
    fn property(&self, target: TargetId, property: Property) -> Option<PropertyValue> {
        (**self).property(target, property)
    }

    fn set_property(&mut self, target: TargetId, value: PropertyValue) -> bool {
        (**self).set_property(target, value)
    }

    fn set_active(&mut self, target: TargetId, kind: ToggleKind, active: bool) -> bool {
        (**self).set_active(target, kind, active)
    }
}
