use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(name = "vertexpos")]
#[command(about = "Position new Voronoi vertices from JSON scenes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Split one edge of a scene and print (or write) the new vertex
    Position {
        #[arg(long)]
        scene: PathBuf,
        /// Write the placement here, with a provenance sidecar next to it
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Position { scene, out } => position(&scene, out.as_deref()),
        Action::Report => report(),
    }
}

fn position(scene_path: &Path, out: Option<&Path>) -> Result<()> {
    tracing::info!(scene = %scene_path.display(), "position");
    let scene = Scene::load(scene_path)?;
    let placement = scene.solve()?;
    let body = serde_json::to_vec_pretty(&placement)?;
    match out {
        None => println!("{}", String::from_utf8_lossy(&body)),
        Some(out) => {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(out, &body).with_context(|| format!("writing {}", out.display()))?;
            let cfg = serde_json::to_value(scene.cfg)?;
            let sidecar = provenance::write_sidecar(out, scene_path, cfg)?;
            tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "written");
        }
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "vertexpos": vertexpos::VERSION,
        "cfg": vertexpos::PositionerCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
