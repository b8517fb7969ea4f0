//! Step registry and trigger dispatch
//!
//! An [`Animator`] owns an ordered list of steps and the scheduler their
//! sequences run on. Each animator is independent; there is no process-wide
//! registry.

use std::fmt;

use cadence_core::{AnimationHost, LifecycleEvent};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::config::{AnimatorConfig, DiagnosticLevel};
use crate::scheduler::{AnimationScheduler, SequenceId};
use crate::step::{AnimationStep, TriggerMode};

new_key_type! {
    /// Stable identity of a step inside one animator
    pub struct StepId;
}

/// Playback state of one step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Playing,
}

/// Ordered collection of steps plus the sequences they are running
pub struct Animator {
    steps: SlotMap<StepId, AnimationStep>,
    /// Registration order
    order: Vec<StepId>,
    scheduler: AnimationScheduler,
    config: AnimatorConfig,
    started: bool,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("steps", &self.order.len())
            .field("live", &self.scheduler.len())
            .field("started", &self.started)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self::with_config(AnimatorConfig::default())
    }

    pub fn with_config(config: AnimatorConfig) -> Self {
        Self {
            steps: SlotMap::with_key(),
            order: Vec::new(),
            scheduler: AnimationScheduler::new(),
            config,
            started: false,
        }
    }

    /// Builder: append a step
    pub fn step(mut self, step: AnimationStep) -> Self {
        self.push_step(step);
        self
    }

    /// Build from steps in order
    pub fn from_steps(steps: impl IntoIterator<Item = AnimationStep>, config: AnimatorConfig) -> Self {
        let mut animator = Self::with_config(config);
        for step in steps {
            animator.push_step(step);
        }
        animator
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnimatorConfig) {
        self.config = config;
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn push_step(&mut self, step: AnimationStep) -> StepId {
        let id = self.steps.insert(step);
        self.order.push(id);
        id
    }

    /// Insert at `index`, clamped to the end
    pub fn insert_step(&mut self, index: usize, step: AnimationStep) -> StepId {
        let id = self.steps.insert(step);
        self.order.insert(index.min(self.order.len()), id);
        id
    }

    /// Remove the step at `index`, cancelling whatever it had running
    pub fn remove_step(&mut self, index: usize) -> Option<AnimationStep> {
        if index >= self.order.len() {
            return None;
        }
        let id = self.order.remove(index);
        let mut step = self.steps.remove(id)?;
        step.kill(&mut self.scheduler);
        Some(step)
    }

    pub fn remove_last(&mut self) -> Option<AnimationStep> {
        let last = self.order.len().checked_sub(1)?;
        self.remove_step(last)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: StepId) -> Option<&AnimationStep> {
        self.steps.get(id)
    }

    pub fn get_mut(&mut self, id: StepId) -> Option<&mut AnimationStep> {
        self.steps.get_mut(id)
    }

    /// Id of the step at `index`
    pub fn id_at(&self, index: usize) -> Option<StepId> {
        self.order.get(index).copied()
    }

    pub fn index_of(&self, id: StepId) -> Option<usize> {
        self.order.iter().position(|&s| s == id)
    }

    /// First step named `name`, in registration order
    pub fn find_by_name(&self, name: &str) -> Option<StepId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.steps.get(id).is_some_and(|s| s.name == name))
    }

    /// Steps in registration order
    pub fn steps(&self) -> impl Iterator<Item = (StepId, &AnimationStep)> {
        self.order
            .iter()
            .filter_map(|&id| self.steps.get(id).map(|step| (id, step)))
    }

    pub fn state(&self, id: StepId) -> Option<StepState> {
        let step = self.steps.get(id)?;
        Some(if step.is_playing(&self.scheduler) {
            StepState::Playing
        } else {
            StepState::Idle
        })
    }

    /// Number of live sequences across all steps
    pub fn live_count(&self) -> usize {
        self.scheduler.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fire the start lifecycle.
    ///
    /// Caches every step's initial values, then plays `OnStart` steps once
    /// and `OnLoop` steps looped, in registration order. Only the first
    /// call does anything.
    pub fn start(&mut self, host: &mut dyn AnimationHost) {
        if self.started {
            tracing::warn!("animator already started, ignoring");
            return;
        }
        self.started = true;

        for index in 0..self.order.len() {
            let id = self.order[index];
            let Some(step) = self.steps.get_mut(id) else {
                continue;
            };
            step.cache_initial_values(&*host);
            match step.trigger {
                TriggerMode::OnStart => {
                    step.play(&mut self.scheduler, host, false);
                }
                TriggerMode::OnLoop => {
                    step.play(&mut self.scheduler, host, true);
                }
                TriggerMode::OnCall => {}
            }
        }

        tracing::debug!(
            steps = self.order.len(),
            live = self.scheduler.len(),
            "animator started"
        );
    }

    /// Advance every live sequence.
    ///
    /// `dt` is scaled and clamped per the config. Returns the sequences that
    /// completed; their sinks have already run.
    pub fn tick(&mut self, dt: f32, host: &mut dyn AnimationHost) -> SmallVec<[SequenceId; 4]> {
        let dt = self.config.scale_delta(dt);
        self.scheduler.tick(dt, host)
    }

    /// Route a lifecycle event from the hosting loop
    pub fn dispatch(
        &mut self,
        event: LifecycleEvent,
        host: &mut dyn AnimationHost,
    ) -> SmallVec<[SequenceId; 4]> {
        tracing::trace!(event = event.name(), "lifecycle event");
        match event {
            LifecycleEvent::Start => {
                self.start(host);
                SmallVec::new()
            }
            LifecycleEvent::Tick(dt) => self.tick(dt, host),
            LifecycleEvent::Teardown => {
                self.stop_all();
                SmallVec::new()
            }
        }
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn play(&mut self, id: StepId, host: &mut dyn AnimationHost) -> Option<SequenceId> {
        self.play_with(id, host, false)
    }

    /// Play forcing the loop settings on
    pub fn play_looped(&mut self, id: StepId, host: &mut dyn AnimationHost) -> Option<SequenceId> {
        self.play_with(id, host, true)
    }

    fn play_with(
        &mut self,
        id: StepId,
        host: &mut dyn AnimationHost,
        loop_override: bool,
    ) -> Option<SequenceId> {
        let step = self.steps.get_mut(id)?;
        step.play(&mut self.scheduler, host, loop_override)
    }

    /// Play the first step named `name`. A miss does nothing.
    pub fn play_by_name(&mut self, name: &str, host: &mut dyn AnimationHost) -> Option<SequenceId> {
        match self.find_by_name(name) {
            Some(id) => self.play(id, host),
            None => {
                self.report_miss(format_args!("no step named {:?}", name));
                None
            }
        }
    }

    /// Play the step at `index`. Out of range does nothing.
    pub fn play_by_index(&mut self, index: usize, host: &mut dyn AnimationHost) -> Option<SequenceId> {
        match self.id_at(index) {
            Some(id) => self.play(id, host),
            None => {
                self.report_miss(format_args!(
                    "step index {} out of range ({} steps)",
                    index,
                    self.order.len()
                ));
                None
            }
        }
    }

    /// Cancel one step's sequence without calling its sinks
    pub fn kill(&mut self, id: StepId) -> bool {
        match self.steps.get_mut(id) {
            Some(step) => step.kill(&mut self.scheduler),
            None => false,
        }
    }

    /// Cancel every live sequence. Returns how many there were.
    pub fn stop_all(&mut self) -> usize {
        let killed = self.scheduler.kill_all();
        if killed > 0 {
            tracing::debug!(killed, "stopped all sequences");
        }
        killed
    }

    /// Restore every step's cached values in registration order.
    ///
    /// When steps share a property the later step's value wins. Returns the
    /// number of values written.
    pub fn reset_all(&mut self, host: &mut dyn AnimationHost) -> usize {
        self.order
            .iter()
            .filter_map(|&id| self.steps.get(id))
            .map(|step| step.reset_to_original(host))
            .sum()
    }

    fn report_miss(&self, message: fmt::Arguments<'_>) {
        match self.config.lookup_miss_level {
            DiagnosticLevel::Off => {}
            DiagnosticLevel::Debug => tracing::debug!("playback lookup missed: {}", message),
            DiagnosticLevel::Warn => tracing::warn!("playback lookup missed: {}", message),
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop_all();
    }
}
