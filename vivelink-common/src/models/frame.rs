// File: vivelink-common/src/models/frame.rs

use serde::{Deserialize, Serialize};
use crate::models::controller::ControllerSnapshot;
use crate::models::hand::Hand;

/// The unit of transmission: both controllers plus the sender clock reading.
///
/// `timestamp` is seconds on the sender's clock. It never decreases within a
/// session but carries no cross-machine synchronisation guarantee.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct FrameSnapshot {
    pub left: ControllerSnapshot,
    pub right: ControllerSnapshot,
    pub timestamp: f64,
}

impl FrameSnapshot {
    pub fn new(left: ControllerSnapshot, right: ControllerSnapshot, timestamp: f64) -> Self {
        Self { left, right, timestamp }
    }

    pub fn hand(&self, hand: Hand) -> &ControllerSnapshot {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn with_hand(mut self, hand: Hand, snapshot: ControllerSnapshot) -> Self {
        match hand {
            Hand::Left => self.left = snapshot,
            Hand::Right => self.right = snapshot,
        }
        self
    }
}
