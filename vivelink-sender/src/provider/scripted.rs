// File: vivelink-sender/src/provider/scripted.rs

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use vivelink_common::Hand;

use super::{PollOutcome, ProviderError, TrackingProvider};

/// Plays back a fixed list of per-hand poll results, then reports
/// `Unavailable` once a hand's script runs out.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    scripts: [VecDeque<Result<PollOutcome, ProviderError>>; 2],
    shut_down: Arc<AtomicBool>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hand: Hand, step: Result<PollOutcome, ProviderError>) -> &mut Self {
        self.scripts[hand.index()].push_back(step);
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, hand: Hand, step: Result<PollOutcome, ProviderError>) -> Self {
        self.push(hand, step);
        self
    }

    /// Becomes true once `shutdown` has run.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shut_down.clone()
    }
}

impl TrackingProvider for ScriptedProvider {
    fn poll(&mut self, hand: Hand) -> Result<PollOutcome, ProviderError> {
        self.scripts[hand.index()]
            .pop_front()
            .unwrap_or(Ok(PollOutcome::Unavailable))
    }

    fn shutdown(&mut self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}
