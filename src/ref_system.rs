//! Elementary rotations and the perifocal → inertial frame transform.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::Radian;

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Build the rotation matrix of angle `alpha` about one coordinate axis.
///
/// The rotation is **applied to the vector** in a fixed frame (active convention), so for the
/// Z axis:
///
/// ```text
/// | cos α  −sin α  0 |
/// | sin α   cos α  0 |
/// |   0       0    1 |
/// ```
///
/// The returned matrix is orthonormal: `R.transpose() == R.try_inverse().unwrap()` up to
/// rounding.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation taking perifocal coordinates to the inertial frame.
///
/// Classical 3-1-3 orbital Euler sequence, composed in this exact order:
///
/// ```text
/// R = R_z(Ω) · R_x(i) · R_z(ω)
/// ```
///
/// Arguments
/// ---------
/// * `ascending_node` – right ascension of the ascending node Ω (radians).
/// * `inclination` – inclination i (radians).
/// * `periapsis_argument` – argument of periapsis ω (radians).
pub fn perifocal_to_inertial(
    ascending_node: Radian,
    inclination: Radian,
    periapsis_argument: Radian,
) -> Matrix3<f64> {
    rotmt(ascending_node, Axis::Z)
        * rotmt(inclination, Axis::X)
        * rotmt(periapsis_argument, Axis::Z)
}
