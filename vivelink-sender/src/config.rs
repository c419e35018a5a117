// File: vivelink-sender/src/config.rs

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use vivelink_common::{ConfigError, DEFAULT_PORT};

#[derive(Parser, Debug, Clone)]
#[command(name = "vivelink-sender")]
#[command(author, version, about = "Stream VR controller pose and buttons over UDP")]
pub struct Args {
    /// Destination IP address of the receiver
    #[arg(long)]
    pub ip: String,

    /// Destination UDP port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Poll and send rate in Hz
    #[arg(long, default_value_t = 60)]
    pub rate_hz: u32,

    /// Tracking provider backend
    #[arg(long, value_enum, default_value_t = ProviderKind::Sim)]
    pub provider: ProviderKind,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Synthetic controllers, no hardware needed
    Sim,
}

/// Validated sender settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderConfig {
    pub destination: SocketAddr,
    pub poll_interval: Duration,
}

pub const MAX_RATE_HZ: u32 = 1000;

impl SenderConfig {
    pub fn new(ip: &str, port: u16, rate_hz: u32) -> Result<Self, ConfigError> {
        let ip: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(ip.to_string()))?;
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        if rate_hz == 0 || rate_hz > MAX_RATE_HZ {
            return Err(ConfigError::InvalidRate(rate_hz));
        }
        Ok(Self {
            destination: SocketAddr::new(ip, port),
            poll_interval: Duration::from_secs_f64(1.0 / rate_hz as f64),
        })
    }
}

impl TryFrom<&Args> for SenderConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        SenderConfig::new(&args.ip, args.port, args.rate_hz)
    }
}
