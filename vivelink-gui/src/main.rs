// src/main.rs
mod plugin;
mod scene;

use anyhow::Context;
use bevy::prelude::*;
use bevy::app::PluginGroupBuilder;
use bevy::log::LogPlugin;
use bevy::window::WindowResolution;
use clap::Parser;
use tracing::{error, info};

use vivelink_common::{logging, Shutdown, DEFAULT_PORT};
use vivelink_receiver::config::listen_addr;
use vivelink_receiver::consumer::frame_slot;
use vivelink_receiver::{Consumer, ReceiverLoop, TrailVisualizer, VisualizerConfig};

use plugin::VisualizerPlugin;

#[derive(Parser, Debug, Clone)]
#[command(name = "vivelink-gui")]
#[command(author, version, about = "3D trail view of VR controllers streamed over UDP")]
struct Args {
    /// Local address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// UDP port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Positions kept per hand
    #[arg(long, default_value_t = VisualizerConfig::DEFAULT_TRAIL_LENGTH)]
    trail_length: usize,

    /// Half-width in meters of the fixed view box and the ground grid
    #[arg(long, default_value_t = VisualizerConfig::DEFAULT_AXIS_LIMIT)]
    axis_limit: f64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let listen = listen_addr(&args.bind, args.port).context("invalid listen address")?;
    let vis_config = VisualizerConfig::new(args.trail_length, args.axis_limit)
        .context("invalid visualizer settings")?;

    // Receiving runs on its own runtime thread; the window only ever reads
    // the newest frame from the slot.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let (slot, reader) = frame_slot();
    let receiver = {
        let _guard = runtime.enter();
        ReceiverLoop::bind(listen, Consumer::Visualize(slot))
            .with_context(|| format!("failed to bind {}", listen))?
    };

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let receive_thread = std::thread::Builder::new()
        .name("vivelink-receive".into())
        .spawn(move || runtime.block_on(receiver.run(shutdown_rx)))
        .context("failed to spawn receive thread")?;

    info!("vivelink-gui listening on {}. Keys: A auto-scale, D debug", listen);

    let exit = App::new()
        .add_plugins(window_plugins())
        .add_plugins(VisualizerPlugin::new(TrailVisualizer::new(vis_config), reader))
        .run();

    shutdown.trigger();
    match receive_thread.join() {
        Ok(stats) => info!("Received {} frames. Goodbye!", stats.dispatched),
        Err(_) => error!("Receive thread panicked"),
    }

    if let AppExit::Error(code) = exit {
        anyhow::bail!("window closed with error code {}", code);
    }
    Ok(())
}

/// Bevy's default plugins with our window. Bevy's own log subscriber is left
/// out because `logging::init` has already installed one.
fn window_plugins() -> PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: "Vive Controllers".into(),
                resolution: WindowResolution::new(1200.0, 900.0),
                ..default()
            }),
            ..default()
        })
        .disable::<LogPlugin>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bevy_logging_is_disabled_not_missing() {
        let plugins = window_plugins();
        assert!(plugins.contains::<LogPlugin>());
        assert!(!plugins.enabled::<LogPlugin>());
        assert!(plugins.enabled::<WindowPlugin>());
    }
}
