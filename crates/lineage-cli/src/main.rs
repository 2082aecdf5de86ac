//! lineage - diagnostic walker for the dual parent relations of a node
//!
//! The binary is a thin host: it builds (or loads) a scene graph, picks the
//! target node, runs the inspection and prints the report to stdout.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lineage_core::{report, Inspector};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(
    author,
    version,
    about = "Reports the dual parent relations of every ancestor of a node"
)]
struct Cli {
    /// Scene description file (JSON); the built-in demo scene when omitted
    scene: Option<PathBuf>,

    /// Label of the node to inspect instead of the scene's declared target
    #[arg(short, long)]
    target: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let (scene, declared_target) = match &cli.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => Scene::demo(),
    };

    let root = match &cli.target {
        Some(label) => scene
            .find(label)
            .with_context(|| format!("no node labelled '{}' in the scene", label))?,
        None => declared_target,
    };

    let inspection = Inspector::new(&scene, &scene).inspect(root)?;
    print!("{}", report::render(&inspection, &scene));

    Ok(())
}
