// File: vivelink-receiver/src/config.rs

use std::net::{IpAddr, SocketAddr};

use clap::{Parser, ValueEnum};
use vivelink_common::{ConfigError, DEFAULT_PORT};

#[derive(Parser, Debug, Clone)]
#[command(name = "vivelink-receiver")]
#[command(author, version, about = "Receive and display VR controller state streamed over UDP")]
pub struct Args {
    /// Local address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// UDP port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// What to do with each received frame
    #[arg(long, value_enum, default_value_t = DisplayMode::Simple)]
    pub mode: DisplayMode,

    /// Positions kept per hand in visualize mode
    #[arg(long, default_value_t = VisualizerConfig::DEFAULT_TRAIL_LENGTH)]
    pub trail_length: usize,

    /// Half-width in meters of the fixed view box and the ground grid
    #[arg(long, default_value_t = VisualizerConfig::DEFAULT_AXIS_LIMIT)]
    pub axis_limit: f64,

    /// Plain text output without ANSI colours
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Consumer selected at startup.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Position and primary buttons
    Simple,
    /// Every field, including rotation and stale poses
    Full,
    /// The wire payload as received
    Raw,
    /// 3D trail visualizer
    Visualize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizerConfig {
    pub trail_length: usize,
    pub axis_limit: f64,
}

impl VisualizerConfig {
    pub const DEFAULT_TRAIL_LENGTH: usize = 50;
    pub const MAX_TRAIL_LENGTH: usize = 10_000;
    pub const DEFAULT_AXIS_LIMIT: f64 = 2.0;

    pub fn new(trail_length: usize, axis_limit: f64) -> Result<Self, ConfigError> {
        if trail_length == 0 || trail_length > Self::MAX_TRAIL_LENGTH {
            return Err(ConfigError::InvalidTrailLength(trail_length));
        }
        if !axis_limit.is_finite() || axis_limit <= 0.0 {
            return Err(ConfigError::InvalidAxisLimit(axis_limit));
        }
        Ok(Self { trail_length, axis_limit })
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            trail_length: Self::DEFAULT_TRAIL_LENGTH,
            axis_limit: Self::DEFAULT_AXIS_LIMIT,
        }
    }
}

/// Validated receiver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverConfig {
    pub listen: SocketAddr,
    pub mode: DisplayMode,
    pub visualizer: VisualizerConfig,
    pub color: bool,
}

/// Parse `bind` and `port` into the address to listen on.
pub fn listen_addr(bind: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let ip: IpAddr = bind
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(bind.to_string()))?;
    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }
    Ok(SocketAddr::new(ip, port))
}

impl TryFrom<&Args> for ReceiverConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        Ok(ReceiverConfig {
            listen: listen_addr(&args.bind, args.port)?,
            mode: args.mode,
            visualizer: VisualizerConfig::new(args.trail_length, args.axis_limit)?,
            color: !args.no_color,
        })
    }
}
