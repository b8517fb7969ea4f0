//! Joined sequences
//!
//! A sequence runs several tweens concurrently on one clock. Each tween
//! waits out its own delay from the moment the sequence starts; the
//! sequence completes once the longest of them has finished. Looping applies
//! to the whole group.

use std::fmt;
use std::sync::Arc;

use cadence_core::AnimationHost;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::easing::Ease;
use crate::tween::Tween;

/// Notification invoked once when a sequence finishes naturally
pub type CompletionSink = Arc<dyn Fn() + Send + Sync>;

/// What happens at the end of each loop iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopType {
    /// Jump back to the start values
    #[default]
    Restart,
    /// Play every other iteration backwards
    Yoyo,
    /// Each iteration continues from where the previous one ended
    Incremental,
}

/// How many times the joined group plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(1)
    }
}

impl Repeat {
    /// Zero or negative counts mean forever
    pub fn from_loop_count(count: i32) -> Self {
        if count <= 0 {
            Repeat::Infinite
        } else {
            Repeat::Count(count as u32)
        }
    }
}

/// Result of advancing a sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStatus {
    Running,
    Completed,
}

#[derive(Clone, Debug)]
struct Joined {
    tween: Tween,
    /// Set once the tween has written at least one frame
    started: bool,
}

/// Builder for a [`Sequence`]
#[derive(Default)]
pub struct SequenceBuilder {
    tweens: SmallVec<[Joined; 5]>,
    ease: Ease,
    repeat: Repeat,
    loop_type: LoopType,
    on_complete: SmallVec<[CompletionSink; 2]>,
    label: Option<String>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `tween` concurrently with everything joined so far
    pub fn join(mut self, tween: Tween) -> Self {
        self.tweens.push(Joined {
            tween,
            started: false,
        });
        self
    }

    pub fn ease(mut self, ease: impl Into<Ease>) -> Self {
        self.ease = ease.into();
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn loop_type(mut self, loop_type: LoopType) -> Self {
        self.loop_type = loop_type;
        self
    }

    pub fn on_complete(mut self, sink: CompletionSink) -> Self {
        self.on_complete.push(sink);
        self
    }

    /// Name used in log output
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Number of tweens joined so far
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Finish the sequence. An empty join builds nothing.
    pub fn build(self) -> Option<Sequence> {
        if self.tweens.is_empty() {
            return None;
        }

        let cycle = self
            .tweens
            .iter()
            .map(|j| j.tween.end_time())
            .fold(0.0_f32, f32::max);

        Some(Sequence {
            tweens: self.tweens,
            ease: self.ease,
            repeat: self.repeat,
            loop_type: self.loop_type,
            on_complete: self.on_complete,
            label: self.label,
            cycle,
            elapsed: 0.0,
            iteration: 0,
        })
    }
}

/// A live group of joined tweens
///
/// Dropping a sequence cancels every joined tween at once and its completion
/// sinks are never called.
pub struct Sequence {
    tweens: SmallVec<[Joined; 5]>,
    ease: Ease,
    repeat: Repeat,
    loop_type: LoopType,
    on_complete: SmallVec<[CompletionSink; 2]>,
    label: Option<String>,
    /// Length of one iteration: max(delay + duration) over the join
    cycle: f32,
    elapsed: f32,
    iteration: u32,
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("label", &self.label)
            .field("tweens", &self.tweens.len())
            .field("repeat", &self.repeat)
            .field("loop_type", &self.loop_type)
            .field("cycle", &self.cycle)
            .field("elapsed", &self.elapsed)
            .field("sinks", &self.on_complete.len())
            .finish()
    }
}

impl Sequence {
    pub fn builder() -> SequenceBuilder {
        SequenceBuilder::new()
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("<unnamed>")
    }

    /// Length of one iteration in seconds
    pub fn cycle_duration(&self) -> f32 {
        self.cycle
    }

    /// Total length, or `None` for infinite loops
    pub fn total_duration(&self) -> Option<f32> {
        match self.repeat {
            Repeat::Count(n) => Some(self.cycle * n.max(1) as f32),
            Repeat::Infinite => None,
        }
    }

    /// Seconds into the current iteration
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current loop iteration (0-based); also the number of finished cycles
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat == Repeat::Infinite
    }

    /// Number of joined tweens
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advance the clock by `dt` seconds and write the new frame
    pub fn advance(&mut self, dt: f32, host: &mut dyn AnimationHost) -> SequenceStatus {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        if self.cycle <= 0.0 {
            return match self.repeat {
                Repeat::Count(n) => {
                    self.render(0.0, n.max(1) - 1, host);
                    SequenceStatus::Completed
                }
                Repeat::Infinite => {
                    self.render(0.0, 0, host);
                    SequenceStatus::Running
                }
            };
        }

        // The clock stays inside one cycle; finished cycles go to `iteration`
        let mut iteration = self.iteration;
        if self.elapsed >= self.cycle {
            let cycle = f64::from(self.cycle);
            let wraps = (f64::from(self.elapsed) / cycle).floor();
            let rest = (f64::from(self.elapsed) - wraps * cycle) as f32;
            // Saturating float-to-int cast
            iteration = iteration.saturating_add(wraps as u32);
            self.elapsed = if rest < self.cycle { rest.max(0.0) } else { 0.0 };
        }

        if let Repeat::Count(n) = self.repeat {
            let n = n.max(1);
            if iteration >= n {
                self.elapsed = self.cycle;
                self.render(self.cycle, n - 1, host);
                return SequenceStatus::Completed;
            }
        }
        self.render(self.elapsed, iteration, host);
        SequenceStatus::Running
    }

    /// Call every completion sink. Only the natural completion path gets here.
    pub(crate) fn finish(self) {
        tracing::debug!(
            sequence = self.label(),
            sinks = self.on_complete.len(),
            "sequence completed"
        );
        for sink in &self.on_complete {
            sink();
        }
    }

    fn render(&mut self, time: f32, iteration: u32, host: &mut dyn AnimationHost) {
        self.iteration = iteration;
        let reversed = self.loop_type == LoopType::Yoyo && iteration % 2 == 1;
        let time = if reversed { self.cycle - time } else { time };

        for joined in self.tweens.iter_mut() {
            let tween = &joined.tween;
            let value = match tween.sample(time, &self.ease) {
                Some(value) => {
                    joined.started = true;
                    value
                }
                // Inside a later iteration's delay: hold the start value
                None if joined.started => tween.from,
                None => continue,
            };

            let value = if self.loop_type == LoopType::Incremental && iteration > 0 {
                value.offset(&tween.from, &tween.to, iteration as f32)
            } else {
                value
            };

            if !host.set_property(tween.target, value) {
                tracing::trace!(
                    sequence = self.label.as_deref().unwrap_or("<unnamed>"),
                    node = %tween.target,
                    property = value.property().name(),
                    "target went away mid-sequence"
                );
            }
        }
    }
}
