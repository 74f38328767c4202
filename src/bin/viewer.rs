use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coffee_smoke::model::DEFAULT_OBJECT_NAME;
use coffee_smoke::{SmokeParams, Viewer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coffee-smoke", about = "Coffee cup with a noise-driven smoke plume")]
struct Cli {
    /// Noise image (red channel used). Procedural noise if omitted.
    #[arg(long)]
    noise: Option<PathBuf>,

    /// Baked glTF/GLB model drawn under the smoke
    #[arg(long)]
    model: Option<PathBuf>,

    /// Object that must exist in the model
    #[arg(long, default_value = DEFAULT_OBJECT_NAME)]
    object: String,

    /// JSON file overriding smoke parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("coffee-smoke v{} starting", env!("CARGO_PKG_VERSION"));

    let params = match &cli.params {
        Some(path) => SmokeParams::from_json_file(path)
            .with_context(|| format!("loading smoke parameters from {}", path.display()))?,
        None => SmokeParams::default(),
    };

    let mut viewer = Viewer::new()
        .with_params(params)
        .with_object_name(cli.object)
        .with_window_size(cli.width, cli.height);
    if let Some(noise) = cli.noise {
        viewer = viewer.with_noise_texture(noise);
    }
    if let Some(model) = cli.model {
        viewer = viewer.with_model(model);
    }

    viewer.run()?;
    Ok(())
}
