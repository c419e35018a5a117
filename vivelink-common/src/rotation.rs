//! vivelink-common/src/rotation.rs
//!
//! Conversions between provider rotation representations and the wire
//! `Orientation`.
//!
//! Axis convention: right-handed, Y-up tracking space. Orientation angles are
//! intrinsic Z-Y-X, so the rotation matrix is
//!
//! ```text
//! R = Rz(yaw) * Ry(pitch) * Rx(roll)
//! ```
//!
//! which is also what `nalgebra::Rotation3::from_euler_angles(roll, pitch, yaw)`
//! builds. Every function here is pure.

use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion};

use crate::models::{Orientation, Vector3};

/// Extract roll/pitch/yaw (degrees) from a row-major 3x3 rotation matrix.
///
/// Non-finite input yields the identity orientation.
pub fn orientation_from_matrix(m: &[[f64; 3]; 3]) -> Orientation {
    if !m.iter().flatten().all(|v| v.is_finite()) {
        return Orientation::IDENTITY;
    }

    let pitch = (-m[2][0]).atan2((m[0][0] * m[0][0] + m[1][0] * m[1][0]).sqrt());
    let yaw = m[1][0].atan2(m[0][0]);
    let roll = m[2][1].atan2(m[2][2]);

    Orientation::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// Same as [`orientation_from_matrix`] for a `(w, x, y, z)` quaternion.
/// The quaternion does not need to be normalised; a zero quaternion maps to
/// the identity.
pub fn orientation_from_quaternion(w: f64, x: f64, y: f64, z: f64) -> Orientation {
    let q = Quaternion::new(w, x, y, z);
    if !q.coords.iter().all(|v| v.is_finite()) || q.norm() < 1e-12 {
        return Orientation::IDENTITY;
    }

    let rot = UnitQuaternion::from_quaternion(q).to_rotation_matrix();
    orientation_from_matrix(&to_rows(rot.matrix()))
}

/// Rotation matrix for an orientation, row-major.
pub fn matrix_from_orientation(o: &Orientation) -> [[f64; 3]; 3] {
    let rot = Rotation3::from_euler_angles(
        o.roll.to_radians(),
        o.pitch.to_radians(),
        o.yaw.to_radians(),
    );
    to_rows(rot.matrix())
}

/// The body x, y and z axes expressed in tracking space, each unit length.
pub fn body_axes(o: &Orientation) -> [Vector3; 3] {
    let m = matrix_from_orientation(o);
    [
        Vector3::new(m[0][0], m[1][0], m[2][0]),
        Vector3::new(m[0][1], m[1][1], m[2][1]),
        Vector3::new(m[0][2], m[1][2], m[2][2]),
    ]
}

fn to_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}
