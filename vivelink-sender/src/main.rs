// File: vivelink-sender/src/main.rs

use anyhow::Context;
use clap::Parser;
use tracing::info;

use vivelink_common::{logging, Shutdown};
use vivelink_sender::provider::SimulatedProvider;
use vivelink_sender::{Args, ProviderKind, SenderConfig, SenderLoop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let config = SenderConfig::try_from(&args).context("invalid sender configuration")?;
    info!(
        "vivelink-sender starting. destination={}, provider={:?}",
        config.destination, args.provider
    );

    let shutdown = Shutdown::new();
    let stats = match args.provider {
        ProviderKind::Sim => {
            let sender = SenderLoop::bind(&config, SimulatedProvider::new())
                .await
                .context("failed to open sender socket")?;
            let run = sender.run(shutdown.subscribe());
            tokio::pin!(run);
            tokio::select! {
                stats = &mut run => stats,
                _ = shutdown.trigger_on_ctrl_c() => run.await,
            }
        }
    };

    info!("Sent {} frames. Goodbye!", stats.sent);
    Ok(())
}
