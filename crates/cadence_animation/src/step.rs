//! Animation steps
//!
//! A step is one named, independently playable animation: up to five
//! property tracks sharing one timing block, plus activation toggles and
//! completion sinks. Steps are plain data and can be authored in TOML or
//! JSON; sinks and runtime state are never serialized.

use std::fmt;
use std::sync::Arc;

use cadence_core::{AnimationHost, Color, Property, PropertyValue, TargetId, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::easing::{Ease, Easing, EasingCurve};
use crate::scheduler::{AnimationScheduler, SequenceId};
use crate::sequence::{CompletionSink, LoopType, Repeat, Sequence};
use crate::toggle::{apply_toggles, Toggle};
use crate::tween::Tween;

/// When a step fires on its own
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Play once when the animator starts
    OnStart,
    /// Play looped when the animator starts
    OnLoop,
    /// Only play when asked
    #[default]
    OnCall,
}

/// Target references of a step
///
/// `transform` carries position, scale and rotation; `graphic` carries
/// color; `group` carries alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTargets {
    pub transform: Option<TargetId>,
    pub graphic: Option<TargetId>,
    pub group: Option<TargetId>,
}

impl StepTargets {
    /// The target that carries `property`, if set
    pub fn slot(&self, property: Property) -> Option<TargetId> {
        match property {
            Property::Position | Property::Scale | Property::Rotation => self.transform,
            Property::Color => self.graphic,
            Property::Alpha => self.group,
        }
    }
}

/// One property's switch and end value
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyTrack<T> {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub to: T,
}

fn default_enabled() -> bool {
    true
}

impl<T> PropertyTrack<T> {
    /// A disabled track with a default end value
    pub const fn disabled(to: T) -> Self {
        Self { enabled: false, to }
    }

    pub const fn to(to: T) -> Self {
        Self { enabled: true, to }
    }
}

/// Value of one property captured before anything played
pub type OriginalValue = (TargetId, PropertyValue);

/// A declarative, named animation
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationStep {
    pub name: String,
    pub trigger: TriggerMode,
    pub targets: StepTargets,

    pub position: PropertyTrack<Vec3>,
    pub scale: PropertyTrack<Vec3>,
    pub rotation: PropertyTrack<Vec3>,
    pub color: PropertyTrack<Color>,
    pub alpha: PropertyTrack<f32>,

    /// Seconds of motion
    pub duration: f32,
    /// Seconds before motion, shared by every track
    pub delay: f32,

    #[serde(rename = "loop")]
    pub looping: bool,
    /// Zero or negative loops forever
    pub loop_count: i32,
    pub loop_type: LoopType,

    pub easing: Easing,
    /// Overrides `easing` when present
    pub curve: Option<EasingCurve>,

    pub toggles: Vec<Toggle>,

    #[serde(skip)]
    on_complete: Vec<CompletionSink>,
    #[serde(skip)]
    live: Option<SequenceId>,
    #[serde(skip)]
    originals: Option<SmallVec<[OriginalValue; 5]>>,
}

impl Default for AnimationStep {
    fn default() -> Self {
        Self {
            name: "New Animation".to_string(),
            trigger: TriggerMode::OnCall,
            targets: StepTargets::default(),
            position: PropertyTrack::disabled(Vec3::ZERO),
            scale: PropertyTrack::disabled(Vec3::ONE),
            rotation: PropertyTrack::disabled(Vec3::ZERO),
            color: PropertyTrack::disabled(Color::WHITE),
            alpha: PropertyTrack::disabled(1.0),
            duration: 1.0,
            delay: 0.0,
            looping: false,
            loop_count: 0,
            loop_type: LoopType::Restart,
            easing: Easing::EaseOutQuad,
            curve: None,
            toggles: Vec::new(),
            on_complete: Vec::new(),
            live: None,
            originals: None,
        }
    }
}

impl Clone for AnimationStep {
    /// Clones the definition and the cache. The copy is not playing.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            trigger: self.trigger,
            targets: self.targets,
            position: self.position,
            scale: self.scale,
            rotation: self.rotation,
            color: self.color,
            alpha: self.alpha,
            duration: self.duration,
            delay: self.delay,
            looping: self.looping,
            loop_count: self.loop_count,
            loop_type: self.loop_type,
            easing: self.easing,
            curve: self.curve.clone(),
            toggles: self.toggles.clone(),
            on_complete: self.on_complete.clone(),
            live: None,
            originals: self.originals.clone(),
        }
    }
}

impl fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationStep")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("targets", &self.targets)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("looping", &self.looping)
            .field("loop_count", &self.loop_count)
            .field("loop_type", &self.loop_type)
            .field("easing", &self.easing)
            .field("curve", &self.curve)
            .field("toggles", &self.toggles)
            .field("on_complete", &self.on_complete.len())
            .field("live", &self.live)
            .finish()
    }
}

impl AnimationStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn trigger(mut self, trigger: TriggerMode) -> Self {
        self.trigger = trigger;
        self
    }

    /// Target carrying position, scale and rotation
    pub fn transform(mut self, target: TargetId) -> Self {
        self.targets.transform = Some(target);
        self
    }

    /// Target carrying color
    pub fn graphic(mut self, target: TargetId) -> Self {
        self.targets.graphic = Some(target);
        self
    }

    /// Target carrying alpha
    pub fn group(mut self, target: TargetId) -> Self {
        self.targets.group = Some(target);
        self
    }

    pub fn move_to(mut self, position: Vec3) -> Self {
        self.position = PropertyTrack::to(position);
        self
    }

    pub fn scale_to(mut self, scale: Vec3) -> Self {
        self.scale = PropertyTrack::to(scale);
        self
    }

    /// Euler degrees, no wrapping
    pub fn rotate_to(mut self, rotation: Vec3) -> Self {
        self.rotation = PropertyTrack::to(rotation);
        self
    }

    pub fn color_to(mut self, color: Color) -> Self {
        self.color = PropertyTrack::to(color);
        self
    }

    pub fn fade_to(mut self, alpha: f32) -> Self {
        self.alpha = PropertyTrack::to(alpha);
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    /// Loop `count` times (zero or negative: forever)
    pub fn looped(mut self, count: i32, loop_type: LoopType) -> Self {
        self.looping = true;
        self.loop_count = count;
        self.loop_type = loop_type;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn curve(mut self, curve: EasingCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn toggle(mut self, toggle: Toggle) -> Self {
        self.toggles.push(toggle);
        self
    }

    pub fn on_complete<F: Fn() + Send + Sync + 'static>(mut self, sink: F) -> Self {
        self.on_complete.push(Arc::new(sink));
        self
    }

    /// Register a completion sink on an existing step
    pub fn add_on_complete(&mut self, sink: CompletionSink) {
        self.on_complete.push(sink);
    }

    pub fn clear_on_complete(&mut self) {
        self.on_complete.clear();
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// End value of `property` and whether its track is enabled
    pub fn track(&self, property: Property) -> (bool, PropertyValue) {
        match property {
            Property::Position => (self.position.enabled, PropertyValue::Position(self.position.to)),
            Property::Scale => (self.scale.enabled, PropertyValue::Scale(self.scale.to)),
            Property::Rotation => (self.rotation.enabled, PropertyValue::Rotation(self.rotation.to)),
            Property::Color => (self.color.enabled, PropertyValue::Color(self.color.to)),
            Property::Alpha => (self.alpha.enabled, PropertyValue::Alpha(self.alpha.to)),
        }
    }

    /// Enabled properties that also have a target slot set
    pub fn animated_properties(&self) -> impl Iterator<Item = (TargetId, PropertyValue)> + '_ {
        Property::ALL.into_iter().filter_map(|property| {
            let (enabled, to) = self.track(property);
            let target = self.targets.slot(property)?;
            enabled.then_some((target, to))
        })
    }

    /// Whether playing this step could do anything at all
    pub fn is_noop(&self) -> bool {
        self.toggles.is_empty() && self.animated_properties().next().is_none()
    }

    /// Id of the sequence this step last started
    pub fn live_sequence(&self) -> Option<SequenceId> {
        self.live
    }

    pub fn is_playing(&self, scheduler: &AnimationScheduler) -> bool {
        self.live.is_some_and(|id| scheduler.is_live(id))
    }

    pub fn ease(&self) -> Ease {
        Ease::resolve(self.easing, self.curve.as_ref())
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Play this step.
    ///
    /// Kills whatever this step still had running, applies toggles, then
    /// starts one joined sequence over every enabled property whose target
    /// is present. `loop_override` forces looping regardless of `looping`.
    /// Returns `None` when nothing was left to animate.
    pub fn play(
        &mut self,
        scheduler: &mut AnimationScheduler,
        host: &mut dyn AnimationHost,
        loop_override: bool,
    ) -> Option<SequenceId> {
        self.kill(scheduler);

        let applied = apply_toggles(&self.toggles, host);
        if applied > 0 {
            tracing::trace!(step = %self.name, applied, "toggles applied");
        }

        let Some(sequence) = self.build_sequence(host, loop_override) else {
            tracing::debug!(step = %self.name, "nothing to animate");
            return None;
        };

        tracing::debug!(
            step = %self.name,
            tweens = sequence.len(),
            infinite = sequence.is_infinite(),
            "step playing"
        );
        let id = scheduler.insert(sequence);
        self.live = Some(id);
        Some(id)
    }

    /// Cancel the running sequence without calling sinks
    pub fn kill(&mut self, scheduler: &mut AnimationScheduler) -> bool {
        match self.live.take() {
            Some(id) => scheduler.kill(id),
            None => false,
        }
    }

    fn build_sequence(&self, host: &mut dyn AnimationHost, loop_override: bool) -> Option<Sequence> {
        let mut builder = Sequence::builder().label(self.name.clone()).ease(self.ease());

        for (target, to) in self.animated_properties() {
            let Some(from) = host.property(target, to.property()) else {
                tracing::debug!(
                    step = %self.name,
                    node = %target,
                    property = to.property().name(),
                    "target missing, skipping property"
                );
                continue;
            };
            builder = builder.join(
                Tween::new(target, from, to)
                    .duration(self.duration)
                    .delay(self.delay),
            );
        }

        if builder.is_empty() {
            return None;
        }

        let repeat = if self.looping || loop_override {
            Repeat::from_loop_count(self.loop_count)
        } else {
            Repeat::Count(1)
        };
        builder = builder.repeat(repeat).loop_type(self.loop_type);

        // An infinite loop never completes, so it keeps no sinks around
        if repeat != Repeat::Infinite {
            for sink in &self.on_complete {
                builder = builder.on_complete(sink.clone());
            }
        }

        builder.build()
    }

    // =========================================================================
    // Original values
    // =========================================================================

    /// Capture the current value of every property every present target
    /// carries.
    ///
    /// The cache is written once. Later calls leave it alone and return
    /// `false`; use [`invalidate_cache`](Self::invalidate_cache) to rebase.
    pub fn cache_initial_values(&mut self, host: &dyn AnimationHost) -> bool {
        if self.originals.is_some() {
            tracing::debug!(step = %self.name, "initial values already cached");
            return false;
        }

        let originals = Property::ALL
            .into_iter()
            .filter_map(|property| {
                let target = self.targets.slot(property)?;
                host.property(target, property).map(|value| (target, value))
            })
            .collect();
        self.originals = Some(originals);
        true
    }

    pub fn invalidate_cache(&mut self) {
        self.originals = None;
    }

    pub fn originals(&self) -> Option<&[OriginalValue]> {
        self.originals.as_deref()
    }

    /// Write back every cached value, enabled or not.
    ///
    /// Toggles and any running sequence are left alone. Returns how many
    /// values were written.
    pub fn reset_to_original(&self, host: &mut dyn AnimationHost) -> usize {
        let Some(originals) = &self.originals else {
            return 0;
        };
        originals
            .iter()
            .filter(|(target, value)| host.set_property(*target, *value))
            .count()
    }
}
