//! vivelink-receiver/src/consumer.rs
//!
//! Where decoded frames go. The set is closed and chosen at startup.

use std::io;
use std::net::SocketAddr;

use tokio::sync::watch;

use vivelink_common::FrameSnapshot;

use crate::display::TextDisplay;

pub enum Consumer {
    /// Render synchronously on the receive task.
    Text(TextDisplay),
    /// Publish into a single slot for a renderer running at its own pace.
    Visualize(FrameSlot),
}

impl Consumer {
    pub fn dispatch(&mut self, frame: &FrameSnapshot, payload: &[u8], from: SocketAddr) -> io::Result<()> {
        match self {
            Consumer::Text(display) => display.render(frame, payload, from),
            Consumer::Visualize(slot) => {
                slot.publish(*frame);
                Ok(())
            }
        }
    }
}

/// Write side of the newest-frame-wins hand-off. Publishing never blocks and
/// overwrites whatever the reader has not taken yet.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    tx: watch::Sender<Option<FrameSnapshot>>,
}

/// Read side of the hand-off.
#[derive(Debug, Clone)]
pub struct SlotReader {
    rx: watch::Receiver<Option<FrameSnapshot>>,
}

pub fn frame_slot() -> (FrameSlot, SlotReader) {
    let (tx, rx) = watch::channel(None);
    (FrameSlot { tx }, SlotReader { rx })
}

impl FrameSlot {
    pub fn publish(&self, frame: FrameSnapshot) {
        self.tx.send_replace(Some(frame));
    }

    pub fn subscribe(&self) -> SlotReader {
        SlotReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl SlotReader {
    /// The newest frame if one arrived since the last take.
    pub fn take(&mut self) -> Option<FrameSnapshot> {
        match self.rx.has_changed() {
            Ok(true) => *self.rx.borrow_and_update(),
            _ => None,
        }
    }

    /// Wait for the next frame. `None` once the writer is gone.
    pub async fn next(&mut self) -> Option<FrameSnapshot> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(frame) = *self.rx.borrow_and_update() {
                return Some(frame);
            }
        }
    }
}
