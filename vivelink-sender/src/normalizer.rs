//! vivelink-sender/src/normalizer.rs
//!
//! Turns raw provider readings into `ControllerSnapshot`s.
//!
//! Sleep/wake policy: a hand that is not trackable keeps every field of its
//! previous snapshot and only flips `tracked` to false, so viewers see it
//! frozen in place rather than snapping to the origin. The next trackable
//! sample resumes normal population; no reconnect step exists.

use tracing::{debug, info};
use vivelink_common::rotation::{orientation_from_matrix, orientation_from_quaternion};
use vivelink_common::{
    AnalogState, ButtonState, ControllerSnapshot, Hand, Orientation, RawButtons, TrackpadAxes,
    TrackpadButtons, Vector3,
};

use crate::provider::{button_id, PollOutcome, RawInput, RawRotation, RawSample};

/// Axis slots in `RawInput::axes`.
pub const TRIGGER_AXIS: usize = 1;
pub const TRACKPAD_AXIS: usize = 0;

/// Next snapshot for one hand given the previous one and the latest outcome.
pub fn next_snapshot(previous: &ControllerSnapshot, outcome: &PollOutcome) -> ControllerSnapshot {
    match outcome {
        PollOutcome::Sample(sample) if sample.trackable => from_sample(previous, sample),
        PollOutcome::Sample(_) | PollOutcome::Unavailable => previous.stale(),
    }
}

fn from_sample(previous: &ControllerSnapshot, sample: &RawSample) -> ControllerSnapshot {
    let position = Vector3::from(sample.position);
    // A garbage pose component keeps its last known value rather than
    // snapping to the origin or identity.
    let rotation = if sample.rotation.is_usable() {
        orientation_of(&sample.rotation)
    } else {
        previous.rotation
    };

    // A failed controller-state read keeps the last known inputs.
    let (buttons, analog, raw_buttons) = match &sample.input {
        Some(input) => (buttons_of(input), analog_of(input), Some(RawButtons {
            pressed: input.pressed,
            touched: input.touched,
        })),
        None => (previous.buttons, previous.analog, previous.raw_buttons),
    };

    ControllerSnapshot {
        tracked: true,
        position: if position.is_finite() { position } else { previous.position },
        rotation,
        buttons,
        analog,
        raw_buttons,
    }
}

pub fn orientation_of(rotation: &RawRotation) -> Orientation {
    match rotation {
        RawRotation::Matrix(m) => orientation_from_matrix(m),
        RawRotation::Quaternion([w, x, y, z]) => orientation_from_quaternion(*w, *x, *y, *z),
    }
}

pub fn buttons_of(input: &RawInput) -> ButtonState {
    ButtonState {
        system: input.is_pressed(button_id::SYSTEM),
        menu: input.is_pressed(button_id::APPLICATION_MENU),
        grip: input.is_pressed(button_id::GRIP),
        trigger: input.is_pressed(button_id::TRIGGER),
        trackpad: TrackpadButtons {
            pressed: input.is_pressed(button_id::TOUCHPAD),
            touched: input.is_touched(button_id::TOUCHPAD),
        },
    }
}

/// Analog axes, clamped so every value is one the codec accepts.
pub fn analog_of(input: &RawInput) -> AnalogState {
    let trigger = input
        .axes
        .get(TRIGGER_AXIS)
        .map(|a| clamp(a[0], 0.0, 1.0))
        .unwrap_or(0.0);
    let trackpad = input
        .axes
        .get(TRACKPAD_AXIS)
        .map(|a| TrackpadAxes {
            x: clamp(a[0], -1.0, 1.0),
            y: clamp(a[1], -1.0, 1.0),
        })
        .unwrap_or_default();
    AnalogState { trigger, trackpad }
}

fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() { 0.0_f64.clamp(min, max) } else { v.clamp(min, max) }
}

/// Per-hand normaliser state: the snapshot last emitted for each hand.
#[derive(Debug, Default)]
pub struct Normalizer {
    previous: [Option<ControllerSnapshot>; 2],
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self, hand: Hand) -> Option<&ControllerSnapshot> {
        self.previous[hand.index()].as_ref()
    }

    /// Produce and remember the next snapshot for `hand`.
    pub fn normalize(&mut self, hand: Hand, outcome: &PollOutcome) -> ControllerSnapshot {
        let slot = &mut self.previous[hand.index()];
        let prev = slot.unwrap_or_default();
        let next = next_snapshot(&prev, outcome);

        match slot {
            None if !next.tracked => info!("{} controller not detected", hand),
            None => info!("{} controller tracking", hand),
            Some(p) if p.tracked && !next.tracked => info!("{} controller asleep", hand),
            Some(p) if !p.tracked && next.tracked => info!("{} controller awake", hand),
            Some(_) => {}
        }
        debug!(
            "{} tracked={} pos=({:.4}, {:.4}, {:.4})",
            hand, next.tracked, next.position.x, next.position.y, next.position.z
        );

        *slot = Some(next);
        next
    }
}
