//! vivelink-sender/src/lib.rs
//!
//! Sender side of the link: poll a tracking provider, normalise each hand into
//! a `ControllerSnapshot`, and push one datagram per tick to the receiver.

pub mod clock;
pub mod config;
pub mod normalizer;
pub mod provider;
pub mod sender;

pub use config::{Args, ProviderKind, SenderConfig};
pub use normalizer::Normalizer;
pub use provider::{PollOutcome, ProviderError, ProviderSession, RawSample, TrackingProvider};
pub use sender::{SenderLoop, SenderStats};
