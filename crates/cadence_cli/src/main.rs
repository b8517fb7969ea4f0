//! Cadence CLI - headless runner for animation scene files
//!
//! Provides:
//! - `simulate`: run a scene on a fixed clock and print every write
//! - `check`: report authoring mistakes the engine would silently skip

mod scene;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::scene::{SceneFile, Severity};
use crate::simulate::SimulateOptions;

/// Headless runner for cadence animation scenes
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Simulate and validate cadence animation scenes")]
#[command(version)]
struct Cli {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scene file on a fixed clock
    Simulate {
        /// Scene file (TOML)
        scene: PathBuf,

        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Seconds to simulate (default: until nothing is playing)
        #[arg(long)]
        duration: Option<f32>,

        /// Play a step by name after start (repeatable)
        #[arg(long = "play", value_name = "STEP")]
        play: Vec<String>,

        /// Flip a binding after start (repeatable)
        #[arg(long = "flip", value_name = "BINDING")]
        flip: Vec<String>,

        /// Restore original values when the clock stops
        #[arg(long)]
        reset: bool,

        /// Emit JSON lines instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// Validate a scene file
    Check {
        /// Scene file (TOML)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            scene,
            dt,
            duration,
            play,
            flip,
            reset,
            json,
        } => {
            let file = SceneFile::load(&scene)?;
            tracing::info!(
                scene = %scene.display(),
                steps = file.steps.len(),
                targets = file.targets.len(),
                "simulating"
            );

            let options = SimulateOptions {
                dt,
                duration,
                play,
                flip,
                reset,
            };
            let report = simulate::run(&file, &options)?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                simulate::write_json(&report, &mut out)?;
            } else {
                simulate::write_text(&report, &mut out)?;
            }
            out.flush()?;
        }
        Commands::Check { scene } => {
            let file = SceneFile::load(&scene)?;
            let issues = file.check();
            for issue in &issues {
                println!("{}", issue);
            }

            let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
            if errors > 0 {
                anyhow::bail!("{} error(s) in {}", errors, scene.display());
            }
            tracing::info!(
                scene = %scene.display(),
                warnings = issues.len(),
                "scene ok"
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
