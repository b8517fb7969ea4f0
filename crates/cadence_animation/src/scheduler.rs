//! Animation scheduler
//!
//! Owns every live sequence and advances them each frame.

use cadence_core::AnimationHost;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::sequence::{Sequence, SequenceStatus};

new_key_type! {
    /// Handle to a live sequence. Stale handles are harmless.
    pub struct SequenceId;
}

/// The scheduler that ticks all live sequences
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    sequences: SlotMap<SequenceId, Sequence>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            sequences: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, sequence: Sequence) -> SequenceId {
        self.sequences.insert(sequence)
    }

    pub fn get(&self, id: SequenceId) -> Option<&Sequence> {
        self.sequences.get(id)
    }

    /// Cancel a sequence without calling its sinks.
    ///
    /// Returns `false` if it had already finished or been killed.
    pub fn kill(&mut self, id: SequenceId) -> bool {
        match self.sequences.remove(id) {
            Some(sequence) => {
                tracing::debug!(sequence = sequence.label(), "sequence killed");
                true
            }
            None => false,
        }
    }

    /// Cancel everything. Returns how many sequences were live.
    pub fn kill_all(&mut self) -> usize {
        let count = self.sequences.len();
        self.sequences.clear();
        count
    }

    pub fn is_live(&self, id: SequenceId) -> bool {
        self.sequences.contains_key(id)
    }

    /// Advance every live sequence by `dt` seconds.
    ///
    /// Finished sequences are removed and their sinks called before this
    /// returns. Returns the ids that completed this tick.
    pub fn tick(&mut self, dt: f32, host: &mut dyn AnimationHost) -> SmallVec<[SequenceId; 4]> {
        let mut completed = SmallVec::new();

        for (id, sequence) in self.sequences.iter_mut() {
            if sequence.advance(dt, host) == SequenceStatus::Completed {
                completed.push(id);
            }
        }

        // Remove all of them first so a sink that inspects the scheduler
        // state sees the finished sequences gone
        let finished: SmallVec<[Sequence; 4]> = completed
            .iter()
            .filter_map(|id| self.sequences.remove(*id))
            .collect();
        for sequence in finished {
            sequence.finish();
        }

        completed
    }

    /// Check if any sequences are still live
    pub fn has_active_animations(&self) -> bool {
        !self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, &Sequence)> {
        self.sequences.iter()
    }

    /// Get the number of live sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
