// File: vivelink-common/src/models/controller.rs

use serde::{Deserialize, Serialize};
use crate::models::pose::{Orientation, Vector3};

/// Touchpad click/touch state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackpadButtons {
    pub pressed: bool,
    pub touched: bool,
}

/// The closed set of digital inputs on a controller.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub system: bool,
    pub menu: bool,
    pub grip: bool,
    pub trigger: bool,
    pub trackpad: TrackpadButtons,
}

/// Touchpad position, each axis in [-1, 1].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct TrackpadAxes {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct AnalogState {
    /// Trigger pull in [0, 1].
    pub trigger: f64,
    pub trackpad: TrackpadAxes,
}

/// Provider bitmasks, kept for diagnostics. Optional on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawButtons {
    pub pressed: u64,
    pub touched: u64,
}

/// Everything known about one controller at one instant.
///
/// When `tracked` is false the remaining fields hold the last values seen
/// while it was tracked, never zeros.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ControllerSnapshot {
    pub tracked: bool,
    pub position: Vector3,
    pub rotation: Orientation,
    pub buttons: ButtonState,
    pub analog: AnalogState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_buttons: Option<RawButtons>,
}

impl ControllerSnapshot {
    /// Same state, marked as not currently tracked.
    pub fn stale(&self) -> Self {
        Self {
            tracked: false,
            ..*self
        }
    }
}
