//! # Orbital elements of a constellation satellite
//!
//! [`OrbitalElements`] holds the five classical elements used to place a satellite on its
//! ellipse, plus the epoch offset at which the satellite is observed:
//!
//! 1. **a** – Semi-major axis (km)
//! 2. **e** – Eccentricity (unitless, `0 ≤ e < 1`)
//! 3. **ω** – Argument of periapsis (radians)
//! 4. **i** – Inclination (radians)
//! 5. **Ω** – Right ascension of the ascending node (radians)
//! 6. **dt** – Time since periapsis passage at the simulated epoch (s)
//!
//! Angles are **given in degrees** (see [`OrbitalElements::from_degrees`]) and stored in
//! radians. The epoch offset replaces the mean anomaly at epoch: the propagator derives the
//! mean anomaly from `dt` and the orbital period.
//!
//! Construction validates the set, so an [`OrbitalElements`] value always describes a closed
//! orbit that the propagator can place.
use std::fmt;

use crate::{
    constants::{Degree, Kilometer, Radian, Second, RADEG},
    satlat_errors::SatlatError,
};

/// Validated elliptic orbital elements.
///
/// Units
/// -----
/// * `semi_major_axis`: kilometers.
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `periapsis_argument`: radians (ω).
/// * `inclination`: radians (i).
/// * `ascending_node_longitude`: radians (Ω).
/// * `epoch_offset`: seconds since periapsis.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct OrbitalElements {
    semi_major_axis: Kilometer,
    eccentricity: f64,
    periapsis_argument: Radian,
    inclination: Radian,
    ascending_node_longitude: Radian,
    epoch_offset: Second,
}

impl OrbitalElements {
    /// Build a validated element set from angles in degrees.
    ///
    /// Arguments
    /// ---------
    /// * `semi_major_axis` – `a` (km), finite and strictly positive.
    /// * `eccentricity` – `e`, in `[0, 1)`.
    /// * `periapsis_argument` – `ω` (degrees).
    /// * `inclination` – `i` (degrees).
    /// * `ascending_node_longitude` – `Ω` (degrees).
    /// * `epoch_offset` – `dt` (s).
    ///
    /// Return
    /// ------
    /// * `Err(SatlatError::InvalidOrbitalElements)` if any value is non-finite or `a ≤ 0`.
    /// * `Err(SatlatError::EccentricityOutOfRange)` if `e ∉ [0, 1)`.
    pub fn from_degrees(
        semi_major_axis: Kilometer,
        eccentricity: f64,
        periapsis_argument: Degree,
        inclination: Degree,
        ascending_node_longitude: Degree,
        epoch_offset: Second,
    ) -> Result<Self, SatlatError> {
        let values = [
            ("semi-major axis", semi_major_axis),
            ("eccentricity", eccentricity),
            ("argument of periapsis", periapsis_argument),
            ("inclination", inclination),
            ("ascending node", ascending_node_longitude),
            ("epoch offset", epoch_offset),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SatlatError::InvalidOrbitalElements(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if semi_major_axis <= 0.0 {
            return Err(SatlatError::InvalidOrbitalElements(format!(
                "semi-major axis must be strictly positive, got {semi_major_axis} km"
            )));
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(SatlatError::EccentricityOutOfRange(eccentricity));
        }

        Ok(OrbitalElements {
            semi_major_axis,
            eccentricity,
            periapsis_argument: periapsis_argument * RADEG,
            inclination: inclination * RADEG,
            ascending_node_longitude: ascending_node_longitude * RADEG,
            epoch_offset,
        })
    }

    pub fn semi_major_axis(&self) -> Kilometer {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn periapsis_argument(&self) -> Radian {
        self.periapsis_argument
    }

    pub fn inclination(&self) -> Radian {
        self.inclination
    }

    pub fn ascending_node_longitude(&self) -> Radian {
        self.ascending_node_longitude
    }

    pub fn epoch_offset(&self) -> Second {
        self.epoch_offset
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(f, "Orbital Elements @ dt = {:.4} s", self.epoch_offset)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.3} km",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.4}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.4}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (ascending node)        = {:.6} rad ({:.4}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )
    }
}

#[cfg(test)]
mod test_orbital_elements {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degrees_are_stored_in_radians() {
        let elem = OrbitalElements::from_degrees(16400.0, 0.3725, 60.0, 20.0, 40.0, 5225.3666)
            .unwrap();

        assert_eq!(elem.semi_major_axis(), 16400.0);
        assert_eq!(elem.eccentricity(), 0.3725);
        assert_relative_eq!(
            elem.periapsis_argument(),
            std::f64::consts::FRAC_PI_3,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            elem.inclination(),
            std::f64::consts::PI / 9.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            elem.ascending_node_longitude(),
            2.0 * std::f64::consts::PI / 9.0,
            epsilon = 1e-15
        );
        assert_eq!(elem.epoch_offset(), 5225.3666);
    }

    #[test]
    fn test_eccentricity_bounds() {
        assert!(OrbitalElements::from_degrees(7000.0, 0.0, 0.0, 0.0, 0.0, 0.0).is_ok());
        assert!(OrbitalElements::from_degrees(7000.0, 0.999, 0.0, 0.0, 0.0, 0.0).is_ok());
        assert_eq!(
            OrbitalElements::from_degrees(7000.0, 1.0, 0.0, 0.0, 0.0, 0.0),
            Err(SatlatError::EccentricityOutOfRange(1.0))
        );
        assert_eq!(
            OrbitalElements::from_degrees(7000.0, -0.01, 0.0, 0.0, 0.0, 0.0),
            Err(SatlatError::EccentricityOutOfRange(-0.01))
        );
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(matches!(
            OrbitalElements::from_degrees(0.0, 0.1, 0.0, 0.0, 0.0, 0.0),
            Err(SatlatError::InvalidOrbitalElements(_))
        ));
        assert!(matches!(
            OrbitalElements::from_degrees(-7000.0, 0.1, 0.0, 0.0, 0.0, 0.0),
            Err(SatlatError::InvalidOrbitalElements(_))
        ));
        assert!(matches!(
            OrbitalElements::from_degrees(7000.0, 0.1, f64::NAN, 0.0, 0.0, 0.0),
            Err(SatlatError::InvalidOrbitalElements(_))
        ));
        assert!(matches!(
            OrbitalElements::from_degrees(7000.0, 0.1, 0.0, 0.0, 0.0, f64::INFINITY),
            Err(SatlatError::InvalidOrbitalElements(_))
        ));
    }

    #[test]
    fn test_display() {
        let elem =
            OrbitalElements::from_degrees(15300.0, 0.41, 60.0, 30.0, 0.0, 4708.5603).unwrap();
        let text = elem.to_string();
        assert!(text.starts_with("Orbital Elements @ dt = 4708.5603 s"));
        assert!(text.contains("a   (semi-major axis)       = 15300.000 km"));
        assert!(text.contains("(60.0000°)"));
    }
}
