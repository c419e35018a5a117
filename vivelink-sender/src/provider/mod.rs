//! vivelink-sender/src/provider/mod.rs
//!
//! The seam to the device-tracking runtime. The sender only ever talks to a
//! `TrackingProvider`; what sits behind it (OpenVR, a simulator, a test
//! script) is opaque.

pub mod scripted;
pub mod simulated;

pub use scripted::ScriptedProvider;
pub use simulated::SimulatedProvider;

use thiserror::Error;
use vivelink_common::Hand;

/// Button ids as bit positions in the provider's pressed/touched masks.
/// These follow OpenVR's `EVRButtonId` numbering.
pub mod button_id {
    pub const SYSTEM: u32 = 0;
    pub const APPLICATION_MENU: u32 = 1;
    pub const GRIP: u32 = 2;
    pub const TOUCHPAD: u32 = 32;
    pub const TRIGGER: u32 = 33;
}

#[inline]
pub fn button_mask(id: u32) -> u64 {
    1u64 << id
}

#[derive(Error, Debug)]
pub enum ProviderError {
    /// The tracking runtime is not initialised or has gone away.
    #[error("tracking runtime not ready: {0}")]
    NotReady(String),
}

impl From<ProviderError> for vivelink_common::Error {
    fn from(e: ProviderError) -> Self {
        vivelink_common::Error::Provider(e.to_string())
    }
}

/// How the provider hands over a device rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawRotation {
    /// Row-major 3x3 rotation, e.g. the left block of a 3x4 pose matrix.
    Matrix([[f64; 3]; 3]),
    /// Unit quaternion `(w, x, y, z)`.
    Quaternion([f64; 4]),
}

impl RawRotation {
    /// False for non-finite entries or a zero quaternion, neither of which
    /// describes a rotation.
    pub fn is_usable(&self) -> bool {
        match self {
            RawRotation::Matrix(m) => m.iter().flatten().all(|v| v.is_finite()),
            RawRotation::Quaternion(q) => {
                q.iter().all(|v| v.is_finite()) && q.iter().any(|v| *v != 0.0)
            }
        }
    }
}

/// Controller input registers as the runtime reports them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawInput {
    pub pressed: u64,
    pub touched: u64,
    /// Axis 0 is the trackpad (x, y); the x of axis 1 is the trigger.
    pub axes: Vec<[f64; 2]>,
}

impl RawInput {
    pub fn is_pressed(&self, id: u32) -> bool {
        self.pressed & button_mask(id) != 0
    }

    pub fn is_touched(&self, id: u32) -> bool {
        self.touched & button_mask(id) != 0
    }
}

/// One device reading for one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Pose valid and device connected.
    pub trackable: bool,
    pub position: [f64; 3],
    pub rotation: RawRotation,
    /// `None` when the controller state read failed for this tick.
    pub input: Option<RawInput>,
}

impl RawSample {
    /// A 3x4 device-to-absolute pose matrix, as OpenVR reports it.
    pub fn from_pose_matrix(trackable: bool, m: &[[f64; 4]; 3], input: Option<RawInput>) -> Self {
        Self {
            trackable,
            position: [m[0][3], m[1][3], m[2][3]],
            rotation: RawRotation::Matrix([
                [m[0][0], m[0][1], m[0][2]],
                [m[1][0], m[1][1], m[1][2]],
                [m[2][0], m[2][1], m[2][2]],
            ]),
            input,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Sample(RawSample),
    /// No device bound to this role (never connected).
    Unavailable,
}

/// Source of raw per-hand samples. One owner at a time; the sender polls it
/// from a single task.
pub trait TrackingProvider: Send {
    fn poll(&mut self, hand: Hand) -> Result<PollOutcome, ProviderError>;

    /// Release runtime resources. Called once when the owning session ends.
    fn shutdown(&mut self) {}
}

/// Scoped ownership of a provider: `shutdown` runs when the session is
/// dropped, whichever way the owning loop exits.
pub struct ProviderSession<P: TrackingProvider> {
    provider: P,
}

impl<P: TrackingProvider> ProviderSession<P> {
    pub fn open(provider: P) -> Self {
        tracing::debug!("Tracking provider session opened");
        Self { provider }
    }

    pub fn poll(&mut self, hand: Hand) -> Result<PollOutcome, ProviderError> {
        self.provider.poll(hand)
    }
}

impl<P: TrackingProvider> Drop for ProviderSession<P> {
    fn drop(&mut self) {
        self.provider.shutdown();
        tracing::debug!("Tracking provider session closed");
    }
}
