//! Cadence Core
//!
//! Foundation types shared by the Cadence animation engine and its hosts:
//!
//! - **Values**: `Vec3`, `Color` and the five animatable properties
//! - **Targets**: opaque `TargetId` references and the `AnimationHost` boundary
//! - **Scene**: an in-memory host for headless runs and tests
//! - **Events**: lifecycle events fired by the hosting loop
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{AnimationHost, Property, PropertyValue, Scene, SceneNode, TargetId};
//!
//! let panel = TargetId(1);
//! let mut scene = Scene::new().with_node(panel, SceneNode::group());
//!
//! scene.set_property(panel, PropertyValue::Alpha(0.25));
//! assert_eq!(scene.property(panel, Property::Alpha), Some(PropertyValue::Alpha(0.25)));
//! ```

pub mod events;
pub mod scene;
pub mod target;
pub mod value;

pub use events::LifecycleEvent;
pub use scene::{Scene, SceneEvent, SceneNode};
pub use target::{AnimationHost, TargetId, ToggleKind};
pub use value::{Color, Property, PropertyValue, Vec3};
