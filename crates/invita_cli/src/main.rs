//! Invita CLI
//!
//! Simulate, inspect and configure the envelope invitation scene.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use invita_scene::{SceneConfig, Size, ViewportScale};

mod script;
mod simulate;

use script::Gesture;
use simulate::Simulation;

#[derive(Parser)]
#[command(name = "invita")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Envelope invitation scene tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a gesture script against a headless scene
    Simulate {
        /// Steps: advance, intro, wait:MS, scroll:P, offset:PX
        steps: Vec<String>,

        /// Configuration file (defaults to ./invita.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Viewport width
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Viewport height
        #[arg(long, default_value = "800")]
        height: f32,

        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
    },

    /// Show the viewport scale and envelope and card sizes for a viewport
    Scale {
        #[arg(long)]
        width: f32,

        #[arg(long)]
        height: f32,

        /// Configuration file (defaults to ./invita.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the configuration as TOML
    Config {
        /// Configuration file to check and print instead of the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            steps,
            config,
            width,
            height,
            fps,
        } => cmd_simulate(&steps, config.as_deref(), width, height, fps),

        Commands::Scale {
            width,
            height,
            config,
        } => cmd_scale(width, height, config.as_deref()),

        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => {
            let cwd = std::env::current_dir()?;
            SceneConfig::load_from_dir(&cwd)
                .with_context(|| format!("Failed to load configuration from {}", cwd.display()))
        }
    }
}

fn cmd_simulate(
    steps: &[String],
    config: Option<&Path>,
    width: f32,
    height: f32,
    fps: u32,
) -> Result<()> {
    if fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let script = if steps.is_empty() {
        script::default_script()
    } else {
        script::parse_script(steps)?
    };
    let config = load_config(config)?;

    let mut sim = Simulation::new(config, width, height, fps);
    let scale = sim.controller().viewport_scale();
    let (w, h) = sim.controller().envelope_size();
    let (card_w, card_h) = sim.controller().card_size();
    info!(
        "Simulating {} steps at {} fps, viewport {}x{} (scale {:.3}, envelope {}x{}, card {}x{})",
        script.len(),
        fps,
        width,
        height,
        scale.value(),
        w,
        h,
        card_w,
        card_h
    );

    for gesture in &script {
        let acted = sim.step(*gesture);
        if !matches!(gesture, Gesture::Wait(_)) {
            let controller = sim.controller();
            if acted {
                info!("{:>8.1}ms  {} -> {:?}", sim.clock_ms(), gesture, controller.phase());
            } else {
                info!("{:>8.1}ms  {} ignored in {}", sim.clock_ms(), gesture, controller.state());
            }
        }
    }

    if sim.controller().is_transitioning() {
        warn!("Script ended mid-transition; add a wait step to let it finish");
    }

    info!(
        "Final state: {} after {:.1}ms ({} commits, {} timelines)",
        sim.controller().state(),
        sim.clock_ms(),
        sim.commits().len(),
        sim.controller().timelines_started()
    );
    sim.report();

    Ok(())
}

fn cmd_scale(width: f32, height: f32, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let envelope = &config.envelope;
    let base = Size::new(envelope.width, envelope.height);
    let scale = ViewportScale::compute(Size::new(width, height), base, envelope.margin);
    let (w, h) = scale.scaled_size(base);
    let (card_w, card_h) = scale.scaled_size(config.card.size());

    println!("Viewport: {}x{}", width, height);
    println!("Base:     {}x{} (margin {})", base.width, base.height, envelope.margin);
    println!("Scale:    {:.4}", scale.value());
    println!("Envelope: {}x{}", w, h);
    println!("Card:     {}x{}", card_w, card_h);

    Ok(())
}

fn cmd_config(config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => load_config(Some(path))?,
        None => SceneConfig::default(),
    };
    let toml = config.to_toml().context("Failed to serialize configuration")?;
    print!("{}", toml);
    Ok(())
}
