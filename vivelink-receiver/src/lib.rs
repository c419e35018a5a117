//! vivelink-receiver/src/lib.rs
//!
//! Receiving end of the link: a UDP loop that decodes each datagram and hands
//! the frame to one consumer, either a text display or the trail visualizer.

pub mod config;
pub mod consumer;
pub mod display;
pub mod receiver;
pub mod socket;
pub mod visualizer;

pub use config::{Args, DisplayMode, ReceiverConfig, VisualizerConfig};
pub use consumer::{Consumer, FrameSlot, SlotReader};
pub use display::TextDisplay;
pub use receiver::{ReceiverLoop, ReceiverStats};
pub use visualizer::{LogScene, RecordingScene, Scene, TrailVisualizer};
