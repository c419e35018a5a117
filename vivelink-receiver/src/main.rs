// File: vivelink-receiver/src/main.rs

use anyhow::Context;
use clap::Parser;
use tracing::info;

use vivelink_common::{logging, Shutdown};
use vivelink_receiver::consumer::frame_slot;
use vivelink_receiver::display::TextMode;
use vivelink_receiver::visualizer::run_headless;
use vivelink_receiver::{
    Args, Consumer, LogScene, ReceiverConfig, ReceiverLoop, TextDisplay, TrailVisualizer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let config = ReceiverConfig::try_from(&args).context("invalid receiver configuration")?;
    info!("vivelink-receiver starting. listen={}, mode={:?}", config.listen, config.mode);

    let shutdown = Shutdown::new();

    let stats = match TextMode::from_display_mode(config.mode) {
        Some(mode) => {
            let display = TextDisplay::stdout(mode, config.color);
            let receiver = ReceiverLoop::bind(config.listen, Consumer::Text(display))
                .with_context(|| format!("failed to bind {}", config.listen))?;

            let run = receiver.run(shutdown.subscribe());
            tokio::pin!(run);
            tokio::select! {
                stats = &mut run => stats,
                _ = shutdown.trigger_on_ctrl_c() => run.await,
            }
        }
        None => {
            let (slot, reader) = frame_slot();
            let receiver = ReceiverLoop::bind(config.listen, Consumer::Visualize(slot))
                .with_context(|| format!("failed to bind {}", config.listen))?;

            let visualizer = TrailVisualizer::new(config.visualizer);
            let mut scene = LogScene::new();
            let render = run_headless(visualizer, reader, &mut scene, shutdown.subscribe());
            let receive = receiver.run(shutdown.subscribe());

            let both = async { tokio::join!(receive, render) };
            tokio::pin!(both);
            let (stats, _) = tokio::select! {
                out = &mut both => out,
                _ = shutdown.trigger_on_ctrl_c() => both.await,
            };
            stats
        }
    };

    info!("Received {} frames. Goodbye!", stats.dispatched);
    Ok(())
}
