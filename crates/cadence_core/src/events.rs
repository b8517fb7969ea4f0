//! Lifecycle events
//!
//! The hosting loop owns time. It tells an animator when it starts, how much
//! time passed each frame, and when it is going away.

/// A lifecycle event fired by the hosting loop
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// Fired once when the owner comes up
    Start,
    /// One frame elapsed, in seconds
    Tick(f32),
    /// The owner is being torn down
    Teardown,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Start => "start",
            LifecycleEvent::Tick(_) => "tick",
            LifecycleEvent::Teardown => "teardown",
        }
    }
}
