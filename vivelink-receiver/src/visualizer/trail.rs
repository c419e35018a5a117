// File: vivelink-receiver/src/visualizer/trail.rs

use std::collections::VecDeque;

use vivelink_common::Vector3;

/// Fixed-capacity position history, oldest first. Pushing past capacity
/// evicts the oldest point.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vector3>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vector3) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent point.
    pub fn last(&self) -> Option<&Vector3> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Vector3> {
        self.points.iter().copied().collect()
    }
}
