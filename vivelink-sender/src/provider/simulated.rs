// File: vivelink-sender/src/provider/simulated.rs

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use vivelink_common::Hand;

use super::{button_id, button_mask, PollOutcome, ProviderError, RawInput, RawRotation, RawSample, TrackingProvider};

/// Length of one simulated "sleep" cycle, seconds.
const SLEEP_CYCLE: f64 = 20.0;

/// Synthetic controllers so the pipeline can run without hardware.
///
/// Left orbits at 0.3 m every 6 s and reports its rotation as a quaternion;
/// right orbits the other way at 0.2 m every 4 s and reports a matrix. Each
/// hand drops out of tracking for a short window every 20 s, and triggers are
/// pulled on a duty cycle.
#[derive(Debug)]
pub struct SimulatedProvider {
    started: Instant,
    warmup: Duration,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::with_warmup(Duration::ZERO)
    }

    /// Report `NotReady` for the first `warmup`, like a runtime still
    /// starting up.
    pub fn with_warmup(warmup: Duration) -> Self {
        Self {
            started: Instant::now(),
            warmup,
        }
    }

    /// The reading a hand produces `t` seconds into the session.
    pub fn sample_at(&self, hand: Hand, t: f64) -> Result<PollOutcome, ProviderError> {
        if t < self.warmup.as_secs_f64() {
            return Err(ProviderError::NotReady("simulated runtime warming up".to_string()));
        }

        let (center, radius, period, direction, asleep) = match hand {
            Hand::Left => ([-0.25, 1.1, 0.0], 0.3, 6.0, 1.0, in_window(t, 14.0, 16.0)),
            Hand::Right => ([0.25, 1.0, 0.0], 0.2, 4.0, -1.0, in_window(t, 4.0, 5.0)),
        };

        let angle = direction * TAU * t / period;
        let position = [
            center[0] + radius * angle.cos(),
            center[1] + 0.05 * (2.0 * angle).sin(),
            center[2] + radius * angle.sin(),
        ];

        // Controller faces along the direction of travel.
        let heading = angle + direction * TAU / 4.0;
        let rotation = match hand {
            Hand::Left => {
                let half = heading / 2.0;
                RawRotation::Quaternion([half.cos(), 0.0, half.sin(), 0.0])
            }
            Hand::Right => {
                let (s, c) = heading.sin_cos();
                RawRotation::Matrix([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
            }
        };

        let pull = ((t * 0.5 + hand.index() as f64).sin() + 1.0) / 2.0;
        let mut pressed = 0;
        if pull > 0.8 {
            pressed |= button_mask(button_id::TRIGGER);
        }
        let pad = [0.8 * (t * 0.7).cos(), 0.8 * (t * 0.7).sin()];
        let mut touched = 0;
        if (t * 0.3).sin() > 0.0 {
            touched |= button_mask(button_id::TOUCHPAD);
        }

        Ok(PollOutcome::Sample(RawSample {
            trackable: !asleep,
            position,
            rotation,
            input: Some(RawInput {
                pressed,
                touched,
                axes: vec![pad, [pull, 0.0]],
            }),
        }))
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingProvider for SimulatedProvider {
    fn poll(&mut self, hand: Hand) -> Result<PollOutcome, ProviderError> {
        let t = self.started.elapsed().as_secs_f64();
        self.sample_at(hand, t)
    }

    fn shutdown(&mut self) {
        tracing::info!("Simulated tracking runtime shut down");
    }
}

fn in_window(t: f64, from: f64, to: f64) -> bool {
    let phase = t.rem_euclid(SLEEP_CYCLE);
    phase >= from && phase < to
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(p: &SimulatedProvider, hand: Hand, t: f64) -> RawSample {
        match p.sample_at(hand, t) {
            Ok(PollOutcome::Sample(s)) => s,
            other => panic!("expected a sample, got {other:?}"),
        }
    }

    #[test]
    fn warmup_reports_not_ready() {
        let p = SimulatedProvider::with_warmup(Duration::from_secs(1));
        assert!(matches!(p.sample_at(Hand::Left, 0.5), Err(ProviderError::NotReady(_))));
        assert!(p.sample_at(Hand::Left, 1.5).is_ok());
    }

    #[test]
    fn hands_sleep_in_their_windows() {
        let p = SimulatedProvider::new();
        assert!(sample(&p, Hand::Left, 1.0).trackable);
        assert!(!sample(&p, Hand::Left, 15.0).trackable);
        assert!(!sample(&p, Hand::Right, 4.5).trackable);
        assert!(sample(&p, Hand::Right, 24.0 + 1.5).trackable);
    }

    #[test]
    fn analog_values_stay_in_range() {
        let p = SimulatedProvider::new();
        for i in 0..200 {
            let t = i as f64 * 0.37;
            for hand in Hand::ALL {
                let input = sample(&p, hand, t).input.unwrap();
                let trigger = input.axes[1][0];
                assert!((0.0..=1.0).contains(&trigger));
                assert!(input.axes[0].iter().all(|v| (-1.0..=1.0).contains(v)));
            }
        }
    }
}
