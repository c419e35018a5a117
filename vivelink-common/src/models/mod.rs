// File: vivelink-common/src/models/mod.rs
pub mod controller;
pub mod frame;
pub mod hand;
pub mod pose;

pub use controller::{
    AnalogState, ButtonState, ControllerSnapshot, RawButtons, TrackpadAxes, TrackpadButtons,
};
pub use frame::FrameSnapshot;
pub use hand::Hand;
pub use pose::{Orientation, Vector3};
