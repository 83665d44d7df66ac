use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use liveness_core::challenge::{random_task_index, MaxTaskNumber};
use liveness_core::{project, View};
use liveness_pipeline::{negotiate_view, spawn_dispatcher, CaptureDevice};
use tracing_subscriber::EnvFilter;

mod camera;
mod config;
mod render;
mod replay;

use camera::SyntheticCamera;
use config::Config;
use render::{Format, Renderer};
use replay::ReplayPlugin;

/// Render liveness detection overlays from replayed plugin output.
#[derive(Parser, Debug)]
#[command(name = "liveness-overlay", version)]
struct Cli {
    /// JSON-lines file of detection results, one per frame (`null` = no face).
    #[arg(long)]
    replay: PathBuf,

    /// Output format for overlay updates.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stop capture after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Number of liveness challenge tasks to pick from (1-5).
    #[arg(long, default_value_t = 5)]
    challenge_tasks: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::info!(
        viewport_width = config.viewport_width,
        viewport_height = config.viewport_height,
        camera = %config.camera_device,
        "liveness-overlay starting"
    );

    let max_tasks = MaxTaskNumber::new(cli.challenge_tasks)?;
    let task = random_task_index(max_tasks, &mut rand::thread_rng());
    tracing::info!(task = task.get(), of = max_tasks.get(), "challenge task picked");

    let plugin = ReplayPlugin::open(&cli.replay)?;
    tracing::info!(entries = plugin.len(), path = %cli.replay.display(), "replay plugin loaded");

    let mut renderer = Renderer::new(cli.format, std::io::stdout());
    let mut camera = SyntheticCamera::new(
        config.camera_permission,
        config.device_available(),
        cli.frames,
    );

    if let View::Unavailable(reason) = negotiate_view(&mut camera) {
        tracing::warn!(%reason, "camera unavailable");
        renderer.placeholder(&reason.to_string())?;
        return Ok(());
    }

    let (sink, dispatcher) = spawn_dispatcher(plugin)?;
    camera
        .start(config.capture, sink)
        .context("failed to start camera")?;

    let viewport = config.viewport();
    let mut latest = dispatcher.latest();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = latest.changed() => {
                // None once the dispatcher has drained and exited.
                let Some(detection) = update else { break };
                let overlay = project(detection.as_deref(), viewport);
                renderer.render(&overlay)?;
            }
            _ = &mut shutdown => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    camera.stop();
    let stats = tokio::task::spawn_blocking(move || dispatcher.join()).await??;
    tracing::info!(
        processed = stats.processed,
        detections = stats.detections,
        plugin_errors = stats.plugin_errors,
        dropped = stats.dropped,
        rendered = renderer.updates(),
        "liveness-overlay shutting down"
    );

    Ok(())
}
