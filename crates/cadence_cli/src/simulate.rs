//! Fixed-clock simulation of a scene file
//!
//! Builds the scene and the animator, fires the start lifecycle, plays any
//! requested steps and bindings, then ticks at a fixed delta, recording
//! every host write per frame.

use anyhow::{Context, Result};
use cadence_animation::{Animator, ToggleBinding};
use cadence_core::{
    LifecycleEvent, Property, PropertyValue, Scene, SceneEvent, TargetId, ToggleKind,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::io::Write;

use crate::scene::SceneFile;

/// Frames simulated when no duration is given and something loops forever
pub const MAX_IDLE_FRAMES: usize = 100_000;

#[derive(Clone, Debug)]
pub struct SimulateOptions {
    /// Seconds per frame
    pub dt: f32,
    /// Total seconds to simulate; `None` runs until nothing is live
    pub duration: Option<f32>,
    /// Steps to play by name after start, in order
    pub play: Vec<String>,
    /// Bindings to flip after start, in order
    pub flip: Vec<String>,
    /// Restore cached originals once the clock stops
    pub reset: bool,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            duration: None,
            play: Vec::new(),
            flip: Vec::new(),
            reset: false,
        }
    }
}

/// One recorded host call
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    Set {
        target: TargetId,
        value: PropertyValue,
    },
    Active {
        target: TargetId,
        toggle: ToggleKind,
        active: bool,
    },
}

impl From<SceneEvent> for TraceEvent {
    fn from(event: SceneEvent) -> Self {
        match event {
            SceneEvent::Set(target, value) => TraceEvent::Set { target, value },
            SceneEvent::Active(target, toggle, active) => TraceEvent::Active {
                target,
                toggle,
                active,
            },
        }
    }
}

/// Everything one frame wrote
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub index: usize,
    /// Clock after this frame's tick
    pub time: f32,
    pub events: Vec<TraceEvent>,
    /// Sequences that completed this frame
    pub completed: usize,
    /// Sequences still live after this frame
    pub live: usize,
}

/// Final state of one target
#[derive(Clone, Debug, Serialize)]
pub struct TargetState {
    pub target: TargetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub active: bool,
    pub enabled: bool,
    pub values: Vec<PropertyValue>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    /// Writes made before the first tick (start, plays, flips)
    pub setup: Vec<TraceEvent>,
    pub frames: Vec<Frame>,
    /// Writes made by the final reset, if requested
    pub reset: Vec<TraceEvent>,
    pub completed: usize,
    pub targets: Vec<TargetState>,
}

/// Run one simulation
pub fn run(file: &SceneFile, options: &SimulateOptions) -> Result<Report> {
    if !options.dt.is_finite() || options.dt <= 0.0 {
        anyhow::bail!("frame delta must be positive, got {}", options.dt);
    }
    if let Some(duration) = options.duration.filter(|d| !d.is_finite()) {
        anyhow::bail!("duration must be finite, got {}", duration);
    }

    let mut scene = file.build_scene();
    let mut animator = file.build_animator();

    animator.dispatch(LifecycleEvent::Start, &mut scene);
    for name in &options.play {
        if animator.play_by_name(name, &mut scene).is_none() {
            tracing::info!(step = %name, "requested step started nothing");
        }
    }
    let mut bindings: FxHashMap<&str, ToggleBinding> = FxHashMap::default();
    for name in &options.flip {
        let binding = match bindings.entry(name.as_str()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(
                file.binding(name)
                    .with_context(|| format!("No binding named {:?}", name))?,
            ),
        };
        binding.flip(&mut animator, &mut scene);
    }
    let setup = drain(&mut scene);

    let frames = run_clock(&mut animator, &mut scene, options);
    let completed = frames.iter().map(|f| f.completed).sum();

    let reset = if options.reset {
        animator.dispatch(LifecycleEvent::Teardown, &mut scene);
        let written = animator.reset_all(&mut scene);
        tracing::debug!(written, "restored original values");
        drain(&mut scene)
    } else {
        Vec::new()
    };

    Ok(Report {
        setup,
        frames,
        reset,
        completed,
        targets: snapshot(file, &scene),
    })
}

fn run_clock(animator: &mut Animator, scene: &mut Scene, options: &SimulateOptions) -> Vec<Frame> {
    let frame_budget = match options.duration {
        Some(duration) => (duration.max(0.0) / options.dt).ceil() as usize,
        None => MAX_IDLE_FRAMES,
    };

    let mut frames = Vec::new();
    let mut time = 0.0;
    for index in 0..frame_budget {
        if options.duration.is_none() && !animator.scheduler().has_active_animations() {
            break;
        }
        time += options.dt;
        let completed = animator.dispatch(LifecycleEvent::Tick(options.dt), scene).len();
        frames.push(Frame {
            index,
            time,
            events: drain(scene),
            completed,
            live: animator.live_count(),
        });
    }

    if options.duration.is_none() && frames.len() == MAX_IDLE_FRAMES {
        tracing::warn!(
            frames = MAX_IDLE_FRAMES,
            live = animator.live_count(),
            "stopped with sequences still live; pass --duration for looping scenes"
        );
    }
    frames
}

fn drain(scene: &mut Scene) -> Vec<TraceEvent> {
    let events = scene.history().iter().copied().map(TraceEvent::from).collect();
    scene.clear_history();
    events
}

fn snapshot(file: &SceneFile, scene: &Scene) -> Vec<TargetState> {
    let mut ids = scene.ids();
    ids.sort();
    ids.into_iter()
        .filter_map(|id| {
            let node = scene.node(id)?;
            Some(TargetState {
                target: id,
                name: file.target_name(id).map(str::to_string),
                active: node.active,
                enabled: node.enabled,
                values: Property::ALL.into_iter().filter_map(|p| node.get(p)).collect(),
            })
        })
        .collect()
}

// =============================================================================
// Output
// =============================================================================

/// Write the report as JSON lines: one per frame with events, then a summary
pub fn write_json(report: &Report, out: &mut impl Write) -> Result<()> {
    #[derive(Serialize)]
    struct Summary<'a> {
        setup: &'a [TraceEvent],
        reset: &'a [TraceEvent],
        frames: usize,
        completed: usize,
        targets: &'a [TargetState],
    }

    for frame in report.frames.iter().filter(|f| !f.events.is_empty() || f.completed > 0) {
        serde_json::to_writer(&mut *out, frame)?;
        writeln!(out)?;
    }
    serde_json::to_writer(
        &mut *out,
        &Summary {
            setup: &report.setup,
            reset: &report.reset,
            frames: report.frames.len(),
            completed: report.completed,
            targets: &report.targets,
        },
    )?;
    writeln!(out)?;
    Ok(())
}

/// Write a short human-readable account of the run
pub fn write_text(report: &Report, out: &mut impl Write) -> Result<()> {
    if !report.setup.is_empty() {
        writeln!(out, "setup: {} write(s)", report.setup.len())?;
    }
    for frame in report.frames.iter().filter(|f| f.completed > 0) {
        writeln!(
            out,
            "t={:.3}s frame {}: {} sequence(s) completed, {} live",
            frame.time, frame.index, frame.completed, frame.live
        )?;
    }
    writeln!(
        out,
        "{} frame(s), {} completion(s)",
        report.frames.len(),
        report.completed
    )?;
    if !report.reset.is_empty() {
        writeln!(out, "reset: {} write(s)", report.reset.len())?;
    }
    for target in &report.targets {
        let label = target.name.as_deref().unwrap_or("");
        writeln!(
            out,
            "{} {} active={} enabled={}",
            target.target, label, target.active, target.enabled
        )?;
        for value in &target.values {
            writeln!(out, "  {:?}", value)?;
        }
    }
    Ok(())
}
