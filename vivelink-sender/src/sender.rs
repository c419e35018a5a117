//! vivelink-sender/src/sender.rs
//!
//! Fixed-rate poll -> normalise -> encode -> send loop. One datagram per tick,
//! no acknowledgement and no retry.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use vivelink_common::codec::{self, MAX_DATAGRAM_BYTES};
use vivelink_common::logging::Throttle;
use vivelink_common::shutdown::stop_requested;
use vivelink_common::{FrameSnapshot, Hand};

use crate::clock::SessionClock;
use crate::config::SenderConfig;
use crate::normalizer::Normalizer;
use crate::provider::{PollOutcome, ProviderError, ProviderSession, TrackingProvider};

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderStats {
    pub ticks: u64,
    pub sent: u64,
    /// Ticks dropped because the provider was not ready.
    pub skipped_ticks: u64,
    pub send_errors: u64,
    pub encode_errors: u64,
}

pub struct SenderLoop<P: TrackingProvider> {
    socket: UdpSocket,
    destination: SocketAddr,
    poll_interval: Duration,
    session: ProviderSession<P>,
    normalizer: Normalizer,
    clock: SessionClock,
    buf: Vec<u8>,
    stats: SenderStats,
    provider_warnings: Throttle,
    send_warnings: Throttle,
}

impl<P: TrackingProvider> SenderLoop<P> {
    /// Bind an ephemeral local socket of the destination's address family and
    /// take ownership of `provider` for the lifetime of the loop.
    pub async fn bind(config: &SenderConfig, provider: P) -> vivelink_common::Result<Self> {
        let local: SocketAddr = if config.destination.is_ipv6() {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        debug!("Sender socket bound to {}", socket.local_addr()?);

        Ok(Self {
            socket,
            destination: config.destination,
            poll_interval: config.poll_interval,
            session: ProviderSession::open(provider),
            normalizer: Normalizer::new(),
            clock: SessionClock::start(),
            buf: Vec::with_capacity(MAX_DATAGRAM_BYTES),
            stats: SenderStats::default(),
            provider_warnings: Throttle::default(),
            send_warnings: Throttle::default(),
        })
    }

    pub fn with_clock(mut self, clock: SessionClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Poll both hands and build the next frame.
    ///
    /// If either poll fails the whole tick is skipped and the normaliser keeps
    /// its previous snapshots, so the next good tick continues from them.
    pub fn poll_frame(&mut self) -> Option<FrameSnapshot> {
        let outcomes = match self.poll_both() {
            Ok(o) => o,
            Err(e) => {
                self.stats.skipped_ticks += 1;
                if let Some(n) = self.provider_warnings.hit() {
                    warn!("Skipping tick, {} (x{})", e, n);
                }
                return None;
            }
        };
        if self.provider_warnings.count() > 0 {
            info!("Tracking provider ready again");
            self.provider_warnings.reset();
        }

        let [left, right] = outcomes;
        let left = self.normalizer.normalize(Hand::Left, &left);
        let right = self.normalizer.normalize(Hand::Right, &right);
        Some(FrameSnapshot::new(left, right, self.clock.now()))
    }

    fn poll_both(&mut self) -> Result<[PollOutcome; 2], ProviderError> {
        let left = self.session.poll(Hand::Left)?;
        let right = self.session.poll(Hand::Right)?;
        Ok([left, right])
    }

    /// Encode and send one frame. Failures are counted and logged, never
    /// returned.
    pub async fn transmit(&mut self, frame: &FrameSnapshot) -> bool {
        if let Err(e) = codec::encode_into(frame, &mut self.buf) {
            self.stats.encode_errors += 1;
            warn!("Dropping frame at t={:.3}: {}", frame.timestamp, e);
            return false;
        }

        match self.socket.send_to(&self.buf, self.destination).await {
            Ok(n) => {
                self.stats.sent += 1;
                trace!("Sent {} bytes to {} (t={:.3})", n, self.destination, frame.timestamp);
                true
            }
            Err(e) => {
                self.stats.send_errors += 1;
                if let Some(n) = self.send_warnings.hit() {
                    warn!("Send to {} failed: {} (x{})", self.destination, e, n);
                }
                false
            }
        }
    }

    /// One full tick: poll, normalise, encode, send.
    pub async fn tick(&mut self) -> bool {
        self.stats.ticks += 1;
        match self.poll_frame() {
            Some(frame) => self.transmit(&frame).await,
            None => false,
        }
    }

    /// Run until the stop flag is set or its sender is dropped. The provider
    /// is shut down when this returns.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> SenderStats {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Sending to {} every {:.1} ms",
            self.destination,
            self.poll_interval.as_secs_f64() * 1000.0
        );

        loop {
            if stop_requested(&shutdown_rx) {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let stats = self.stats;
        drop(self);
        info!(
            "Sender stopped: ticks={} sent={} skipped={} send_errors={} encode_errors={}",
            stats.ticks, stats.sent, stats.skipped_ticks, stats.send_errors, stats.encode_errors
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawRotation, RawSample, ScriptedProvider};

    fn sample(x: f64) -> Result<PollOutcome, ProviderError> {
        Ok(PollOutcome::Sample(RawSample {
            trackable: true,
            position: [x, 1.0, 0.0],
            rotation: RawRotation::Quaternion([1.0, 0.0, 0.0, 0.0]),
            input: None,
        }))
    }

    async fn sender(provider: ScriptedProvider) -> SenderLoop<ScriptedProvider> {
        let cfg = SenderConfig::new("127.0.0.1", 9, 60).unwrap();
        SenderLoop::bind(&cfg, provider).await.unwrap()
    }

    #[tokio::test]
    async fn provider_error_skips_whole_tick() {
        let provider = ScriptedProvider::new()
            .with(Hand::Left, sample(0.5))
            .with(Hand::Right, sample(-0.5))
            .with(Hand::Left, sample(0.7))
            .with(Hand::Right, Err(ProviderError::NotReady("down".into())))
            .with(Hand::Left, sample(0.9))
            .with(Hand::Right, sample(-0.9));
        let mut s = sender(provider).await;

        let first = s.poll_frame().unwrap();
        assert_eq!(first.left.position.x, 0.5);

        assert!(s.poll_frame().is_none());
        assert_eq!(s.stats().skipped_ticks, 1);
        // The failed tick left the normaliser untouched.
        assert_eq!(s.normalizer().previous(Hand::Left).unwrap().position.x, 0.5);

        let third = s.poll_frame().unwrap();
        assert_eq!(third.left.position.x, 0.9);
        assert_eq!(third.right.position.x, -0.9);
    }

    #[tokio::test]
    async fn timestamps_never_go_backwards() {
        let mut provider = ScriptedProvider::new();
        for i in 0..20 {
            provider.push(Hand::Left, sample(i as f64 * 0.01));
            provider.push(Hand::Right, sample(0.0));
        }
        let mut s = sender(provider).await.with_clock(SessionClock::from_epoch(1.0));
        let mut last = 0.0;
        for _ in 0..20 {
            let f = s.poll_frame().unwrap();
            assert!(f.timestamp >= last);
            assert!(f.timestamp >= 1.0);
            last = f.timestamp;
        }
    }

    #[tokio::test]
    async fn encode_failure_is_counted_not_fatal() {
        let mut s = sender(ScriptedProvider::new()).await;
        let frame = FrameSnapshot {
            timestamp: f64::NAN,
            ..Default::default()
        };
        assert!(!s.transmit(&frame).await);
        assert_eq!(s.stats().encode_errors, 1);
        assert_eq!(s.stats().sent, 0);
    }
}
