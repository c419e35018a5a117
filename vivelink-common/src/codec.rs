//! vivelink-common/src/codec.rs
//!
//! Datagram codec for `FrameSnapshot`.
//!
//! The payload is a JSON object keyed by field name:
//!
//! ```text
//! { "left":  { "tracked", "position"{x,y,z}, "rotation"{roll,pitch,yaw},
//!              "buttons"{system,menu,grip,trigger,trackpad{pressed,touched}},
//!              "analog"{trigger,trackpad{x,y}}, ["raw_buttons"{pressed,touched}] },
//!   "right": { ... },
//!   "timestamp": <seconds> }
//! ```
//!
//! Unknown fields are ignored on decode so newer senders can add optional
//! fields without breaking older receivers. One frame always fits one
//! datagram: encoding refuses anything over [`MAX_DATAGRAM_BYTES`].

use crate::error::CodecError;
use crate::models::{ControllerSnapshot, FrameSnapshot};

/// Largest payload we are willing to put in a single datagram. Stays under a
/// 1280-byte IPv6 minimum MTU after IP/UDP headers, so frames never fragment.
pub const MAX_DATAGRAM_BYTES: usize = 1200;

/// Encode a frame into a fresh buffer.
pub fn encode(frame: &FrameSnapshot) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(MAX_DATAGRAM_BYTES);
    encode_into(frame, &mut buf)?;
    Ok(buf)
}

/// Encode a frame into `buf`, replacing its contents. Lets the sender reuse
/// one allocation across ticks.
pub fn encode_into(frame: &FrameSnapshot, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    validate(frame)?;

    buf.clear();
    serde_json::to_writer(&mut *buf, frame)?;

    if buf.len() > MAX_DATAGRAM_BYTES {
        let len = buf.len();
        buf.clear();
        return Err(CodecError::Oversize {
            len,
            max: MAX_DATAGRAM_BYTES,
        });
    }
    Ok(())
}

/// Decode one datagram.
///
/// Fails on truncated or malformed input, missing or mistyped fields, and
/// values outside their declared ranges. Values are returned as sent, so
/// `decode(encode(x)) == x` for every frame `encode` accepts.
pub fn decode(bytes: &[u8]) -> Result<FrameSnapshot, CodecError> {
    let frame: FrameSnapshot = serde_json::from_slice(bytes)?;
    validate(&frame)?;
    Ok(frame)
}

fn validate(frame: &FrameSnapshot) -> Result<(), CodecError> {
    finite("timestamp", frame.timestamp)?;
    validate_controller(&frame.left)?;
    validate_controller(&frame.right)?;
    Ok(())
}

fn validate_controller(c: &ControllerSnapshot) -> Result<(), CodecError> {
    finite("position.x", c.position.x)?;
    finite("position.y", c.position.y)?;
    finite("position.z", c.position.z)?;
    within("rotation.roll", c.rotation.roll, -180.0, 180.0)?;
    within("rotation.pitch", c.rotation.pitch, -90.0, 90.0)?;
    within("rotation.yaw", c.rotation.yaw, -180.0, 180.0)?;

    within("analog.trigger", c.analog.trigger, 0.0, 1.0)?;
    within("analog.trackpad.x", c.analog.trackpad.x, -1.0, 1.0)?;
    within("analog.trackpad.y", c.analog.trackpad.y, -1.0, 1.0)?;
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), CodecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CodecError::OutOfRange { field, value })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), CodecError> {
    // NaN fails both comparisons, so it is rejected here too.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(CodecError::OutOfRange { field, value })
    }
}
