// File: vivelink-common/src/models/pose.rs

use serde::{Deserialize, Serialize};

/// A position in tracking space, meters.
///
/// The space is the provider's right-handed, Y-up standing frame as it was
/// when the sender started.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn scale(self, k: f64) -> Vector3 {
        Vector3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

/// Roll/pitch/yaw in degrees, intrinsic Z-Y-X order.
///
/// Values built through [`Orientation::new`] are canonical: roll and yaw in
/// [-180, 180), pitch in [-90, 90]. The codec carries angles through
/// unchanged, so a decoded frame compares equal to the one encoded.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation { roll: 0.0, pitch: 0.0, yaw: 0.0 };

    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        let mut roll = roll;
        let mut yaw = yaw;
        let mut pitch = wrap_degrees(pitch);

        // (yaw, pitch, roll) and (yaw + 180, 180 - pitch, roll + 180) are the
        // same rotation; fold pitch back into [-90, 90].
        if pitch > 90.0 {
            pitch = 180.0 - pitch;
            roll += 180.0;
            yaw += 180.0;
        } else if pitch < -90.0 {
            pitch = -180.0 - pitch;
            roll += 180.0;
            yaw += 180.0;
        }

        Self {
            roll: wrap_degrees(roll),
            pitch,
            yaw: wrap_degrees(yaw),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

/// Wrap an angle into [-180, 180).
pub fn wrap_degrees(angle: f64) -> f64 {
    // In-range values pass through bit-for-bit.
    if !angle.is_finite() || (-180.0..180.0).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the divisor for inputs just below -180.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}
