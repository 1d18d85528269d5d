use approx::assert_abs_diff_eq;
use nalgebra::Vector3;

pub const REFERENCE_POSITION: [f64; 3] = [-6420.0, -6432.0, 6325.0];

pub fn reference_position() -> Vector3<f64> {
    Vector3::from(REFERENCE_POSITION)
}

pub fn assert_position_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = epsilon);
}
