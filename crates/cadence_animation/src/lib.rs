//! Cadence Animation Engine
//!
//! Declarative animation steps composed into joined, cancellable sequences.
//!
//! # Features
//!
//! - **Steps**: named, data-described animations over position, scale,
//!   rotation, color and alpha, with activation toggles
//! - **Joined sequences**: concurrent tweens behind one completion barrier
//! - **Looping**: restart, yoyo and incremental, finite or infinite
//! - **Trigger dispatch**: on-start, on-loop and on-call steps, replay by
//!   name or index, reset to original values
//!
//! # Example
//!
//! ```rust
//! use cadence_animation::{AnimationStep, Animator, TriggerMode};
//! use cadence_core::{AnimationHost, Property, PropertyValue, Scene, SceneNode, TargetId};
//!
//! let panel = TargetId(1);
//! let mut scene = Scene::new().with_node(panel, SceneNode::group());
//!
//! let mut animator = Animator::new().step(
//!     AnimationStep::new("fade-out")
//!         .group(panel)
//!         .fade_to(0.0)
//!         .duration(0.5)
//!         .trigger(TriggerMode::OnStart),
//! );
//!
//! animator.start(&mut scene);
//! animator.tick(0.5, &mut scene);
//! assert_eq!(scene.property(panel, Property::Alpha), Some(PropertyValue::Alpha(0.0)));
//! ```

pub mod animator;
pub mod binding;
pub mod config;
pub mod easing;
pub mod error;
pub mod scheduler;
pub mod sequence;
pub mod step;
pub mod toggle;
pub mod tween;

pub use animator::{Animator, StepId, StepState};
pub use binding::ToggleBinding;
pub use config::{AnimatorConfig, DiagnosticLevel};
pub use easing::{CurveKey, Ease, Easing, EasingCurve};
pub use error::{AnimationError, Result};
pub use scheduler::{AnimationScheduler, SequenceId};
pub use sequence::{CompletionSink, LoopType, Repeat, Sequence, SequenceBuilder, SequenceStatus};
pub use step::{AnimationStep, PropertyTrack, StepTargets, TriggerMode};
pub use toggle::{apply_toggles, Toggle};
pub use tween::Tween;
