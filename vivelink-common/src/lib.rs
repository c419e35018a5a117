//! vivelink-common/src/lib.rs
//!
//! Shared pieces of the controller link: the snapshot model that crosses the
//! wire, the datagram codec, rotation conversions and the error taxonomy used
//! by both the sender and the receiver.

pub mod codec;
pub mod error;
pub mod logging;
pub mod models;
pub mod rotation;
pub mod shutdown;

pub use shutdown::Shutdown;
pub use error::{CodecError, ConfigError, Error, Result};
pub use models::{
    AnalogState, ButtonState, ControllerSnapshot, FrameSnapshot, Hand, Orientation, RawButtons,
    TrackpadAxes, TrackpadButtons, Vector3,
};

/// Default UDP port used by both ends when none is given.
pub const DEFAULT_PORT: u16 = 5555;
