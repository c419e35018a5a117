//! vivelink-receiver/src/receiver.rs
//!
//! Receive loop: one datagram in, one decode, one dispatch. Bad datagrams
//! are dropped and counted; nothing short of the stop signal ends the loop.
//! Frames are handed on in arrival order with no reordering, deduplication
//! or gap recovery.

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{info, trace, warn};

use vivelink_common::codec;
use vivelink_common::logging::Throttle;
use vivelink_common::shutdown::stop_requested;

use crate::consumer::Consumer;
use crate::socket::bind_udp;

/// Receive buffer size. Anything longer arrives truncated and fails to decode.
pub const RECV_BUFFER_BYTES: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub received: u64,
    pub dispatched: u64,
    pub decode_failures: u64,
    pub transport_errors: u64,
}

pub struct ReceiverLoop {
    socket: UdpSocket,
    consumer: Consumer,
    buf: Vec<u8>,
    stats: ReceiverStats,
    decode_warnings: Throttle,
    transport_warnings: Throttle,
}

impl ReceiverLoop {
    pub fn bind(listen: SocketAddr, consumer: Consumer) -> vivelink_common::Result<Self> {
        let socket = bind_udp(listen)?;
        Ok(Self::from_socket(socket, consumer))
    }

    pub fn from_socket(socket: UdpSocket, consumer: Consumer) -> Self {
        Self {
            socket,
            consumer,
            buf: vec![0u8; RECV_BUFFER_BYTES],
            stats: ReceiverStats::default(),
            decode_warnings: Throttle::default(),
            transport_warnings: Throttle::default(),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Decode one datagram and hand it to the consumer. Returns whether it was
    /// dispatched.
    pub fn handle_datagram(&mut self, payload: &[u8], from: SocketAddr) -> bool {
        self.stats.received += 1;

        let frame = match codec::decode(payload) {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.decode_failures += 1;
                if let Some(n) = self.decode_warnings.hit() {
                    warn!("Dropping {} byte datagram from {}: {} (x{})", payload.len(), from, e, n);
                }
                return false;
            }
        };

        trace!("Frame t={:.3} from {}", frame.timestamp, from);
        if let Err(e) = self.consumer.dispatch(&frame, payload, from) {
            warn!("Display write failed: {}", e);
        }
        self.stats.dispatched += 1;
        true
    }

    /// Run until the stop flag is set or its sender is dropped. Returns the
    /// final counters; the socket is closed on return.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> ReceiverStats {
        match self.socket.local_addr() {
            Ok(addr) => info!("Listening for controller data on {}", addr),
            Err(_) => info!("Listening for controller data"),
        }

        loop {
            if stop_requested(&shutdown_rx) {
                break;
            }
            tokio::select! {
                res = self.socket.recv_from(&mut self.buf) => match res {
                    Ok((n, from)) => {
                        let buf = std::mem::take(&mut self.buf);
                        self.handle_datagram(&buf[..n], from);
                        self.buf = buf;
                    }
                    Err(e) => {
                        self.stats.transport_errors += 1;
                        if let Some(n) = self.transport_warnings.hit() {
                            warn!("Receive failed: {} (x{})", e, n);
                        }
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let stats = self.stats;
        info!(
            "Receiver stopped: received={} dispatched={} decode_failures={} transport_errors={}",
            stats.received, stats.dispatched, stats.decode_failures, stats.transport_errors
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::frame_slot;
    use vivelink_common::FrameSnapshot;

    async fn receiver() -> (ReceiverLoop, crate::consumer::SlotReader) {
        let (slot, reader) = frame_slot();
        let r = ReceiverLoop::bind("127.0.0.1:0".parse().unwrap(), Consumer::Visualize(slot)).unwrap();
        (r, reader)
    }

    fn from() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn garbage_is_counted_and_dropped() {
        let (mut r, mut reader) = receiver().await;
        assert!(!r.handle_datagram(b"\x00\xff garbage", from()));
        assert!(!r.handle_datagram(b"{\"left\":", from()));
        assert!(!r.handle_datagram(b"{}", from()));
        assert_eq!(r.stats().decode_failures, 3);
        assert_eq!(r.stats().dispatched, 0);
        assert!(reader.take().is_none());
    }

    #[tokio::test]
    async fn valid_frame_reaches_consumer() {
        let (mut r, mut reader) = receiver().await;
        let frame = FrameSnapshot {
            timestamp: 7.5,
            ..Default::default()
        };
        let bytes = codec::encode(&frame).unwrap();
        assert!(r.handle_datagram(&bytes, from()));
        assert_eq!(reader.take().map(|f| f.timestamp), Some(7.5));
        assert_eq!(r.stats().received, 1);
        assert_eq!(r.stats().dispatched, 1);
    }
}
