//! # Two-body orbit propagation
//!
//! [`OrbitPropagator`] places a satellite in the inertial frame from its
//! [`OrbitalElements`](crate::orbital_elements::OrbitalElements):
//!
//! 1. orbital period `T = 2π·√(a³/μ)`,
//! 2. mean anomaly `M = 2π·dt/T`,
//! 3. eccentric anomaly `E` from Kepler's equation ([`KeplerSolver`]),
//! 4. perifocal position `(a(cos E − e), a·sin E·√(1 − e²), 0)`,
//! 5. inertial position `R_z(Ω)·R_x(i)·R_z(ω)·r_pf` ([`perifocal_to_inertial`]).
//!
//! Units follow [`crate::constants`]: km, s, km³/s².
use log::debug;
use nalgebra::Vector3;

use crate::{
    constants::{Kilometer, Radian, Second, DPI, GM_EARTH},
    constellation::{Constellation, Satellite},
    kepler::KeplerSolver,
    orbital_elements::OrbitalElements,
    ref_system::perifocal_to_inertial,
    satlat_errors::SatlatError,
};

/// Inertial position of one satellite at the simulated epoch (km).
#[derive(Debug, Clone, PartialEq)]
pub struct SatellitePosition {
    pub name: String,
    pub position: Vector3<Kilometer>,
}

/// Keplerian propagator around a central body of gravitational parameter μ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPropagator {
    gravitational_parameter: f64,
    kepler: KeplerSolver,
}

impl Default for OrbitPropagator {
    fn default() -> Self {
        OrbitPropagator {
            gravitational_parameter: GM_EARTH,
            kepler: KeplerSolver::default(),
        }
    }
}

impl OrbitPropagator {
    /// Create a propagator for a central body of parameter `gravitational_parameter` (km³/s²).
    ///
    /// Return
    /// ------
    /// * `Err(SatlatError::InvalidPhysicalConstant)` if μ is not finite and strictly positive.
    pub fn new(gravitational_parameter: f64, kepler: KeplerSolver) -> Result<Self, SatlatError> {
        if !(gravitational_parameter.is_finite() && gravitational_parameter > 0.0) {
            return Err(SatlatError::InvalidPhysicalConstant(format!(
                "gravitational parameter must be finite and strictly positive, got {gravitational_parameter}"
            )));
        }
        Ok(OrbitPropagator {
            gravitational_parameter,
            kepler,
        })
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }

    /// Orbital period `T = 2π·√(a³/μ)` (s).
    pub fn orbital_period(&self, semi_major_axis: Kilometer) -> Second {
        DPI * (semi_major_axis.powi(3) / self.gravitational_parameter).sqrt()
    }

    /// Mean anomaly `M = 2π·dt/T` (radians), not reduced to `[0, 2π)`.
    pub fn mean_anomaly(&self, elements: &OrbitalElements) -> Radian {
        DPI * elements.epoch_offset() / self.orbital_period(elements.semi_major_axis())
    }

    /// Position in the perifocal frame (X towards periapsis, Z along the orbit normal).
    pub fn perifocal_position(
        elements: &OrbitalElements,
        eccentric_anomaly: Radian,
    ) -> Vector3<Kilometer> {
        let a = elements.semi_major_axis();
        let e = elements.eccentricity();
        let (sin_ecc_anom, cos_ecc_anom) = eccentric_anomaly.sin_cos();

        Vector3::new(
            a * (cos_ecc_anom - e),
            a * sin_ecc_anom * (1.0 - e.powi(2)).sqrt(),
            0.0,
        )
    }

    /// Inertial position of a satellite at its epoch offset.
    ///
    /// Return
    /// ------
    /// * `Ok(position)` – inertial Cartesian position (km).
    /// * `Err(SatlatError)` – a Kepler solver failure, see
    ///   [`KeplerSolver::eccentric_anomaly`].
    pub fn position(&self, elements: &OrbitalElements) -> Result<Vector3<Kilometer>, SatlatError> {
        let mean_anomaly = self.mean_anomaly(elements);
        let eccentric_anomaly = self
            .kepler
            .eccentric_anomaly(mean_anomaly, elements.eccentricity())?;

        let perifocal = Self::perifocal_position(elements, eccentric_anomaly);
        let rotation = perifocal_to_inertial(
            elements.ascending_node_longitude(),
            elements.inclination(),
            elements.periapsis_argument(),
        );

        Ok(rotation * perifocal)
    }

    /// Propagate one named satellite.
    pub fn propagate(&self, satellite: &Satellite) -> Result<SatellitePosition, SatlatError> {
        let position = self.position(&satellite.elements)?;
        debug!(
            "{}: position = [{:.3}, {:.3}, {:.3}] km, |r| = {:.3} km",
            satellite.name,
            position.x,
            position.y,
            position.z,
            position.norm()
        );
        Ok(SatellitePosition {
            name: satellite.name.clone(),
            position,
        })
    }

    /// Propagate every satellite, in constellation order.
    ///
    /// The first failing satellite aborts the whole propagation: positioning needs every
    /// configured satellite.
    pub fn propagate_constellation(
        &self,
        constellation: &Constellation,
    ) -> Result<Vec<SatellitePosition>, SatlatError> {
        constellation
            .iter()
            .map(|satellite| self.propagate(satellite))
            .collect()
    }
}

#[cfg(test)]
mod propagator_test {
    use super::*;
    use crate::{
        constants::RADEG,
        ref_system::{rotmt, Axis},
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_gravitational_parameter() {
        for mu in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                OrbitPropagator::new(mu, KeplerSolver::default()),
                Err(SatlatError::InvalidPhysicalConstant(_))
            ));
        }
    }

    #[test]
    fn test_orbital_period() {
        let prop = OrbitPropagator::default();
        assert_relative_eq!(
            prop.orbital_period(15300.0),
            18834.241149073056,
            max_relative = 1e-13
        );
    }

    #[test]
    fn test_quarter_period_offset() {
        let prop = OrbitPropagator::default();
        let period = prop.orbital_period(8000.0);
        let elem =
            OrbitalElements::from_degrees(8000.0, 0.2, 0.0, 0.0, 0.0, period / 4.0).unwrap();
        assert_relative_eq!(
            prop.mean_anomaly(&elem),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_periapsis_and_apoapsis() {
        let prop = OrbitPropagator::default();
        let a = 10000.0;
        let e = 0.3;

        let at_periapsis = OrbitalElements::from_degrees(a, e, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(
            prop.position(&at_periapsis).unwrap(),
            Vector3::new(a * (1.0 - e), 0.0, 0.0),
            epsilon = 1e-8
        );

        let half_period = prop.orbital_period(a) / 2.0;
        let at_apoapsis =
            OrbitalElements::from_degrees(a, e, 0.0, 0.0, 0.0, half_period).unwrap();
        let r = prop.position(&at_apoapsis).unwrap();
        assert_relative_eq!(r.norm(), a * (1.0 + e), max_relative = 1e-12);
        assert_relative_eq!(r.x, -a * (1.0 + e), max_relative = 1e-12);
    }

    #[test]
    fn test_circular_orbit_radius_is_constant() {
        let prop = OrbitPropagator::default();
        let a = 26560.0;
        let period = prop.orbital_period(a);

        for k in 0..24 {
            let dt = period * k as f64 / 7.0 - 3000.0;
            let elem = OrbitalElements::from_degrees(a, 0.0, 35.0, 55.0, 120.0, dt).unwrap();
            let r = prop.position(&elem).unwrap();
            assert_relative_eq!(r.norm(), a, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_equatorial_orbit_rotates_about_z_only() {
        let prop = OrbitPropagator::default();
        let elem = OrbitalElements::from_degrees(17800.0, 0.235, 30.0, 0.0, 0.0, 5908.5511)
            .unwrap();

        let ecc_anom = KeplerSolver::default()
            .eccentric_anomaly(prop.mean_anomaly(&elem), elem.eccentricity())
            .unwrap();
        let perifocal = OrbitPropagator::perifocal_position(&elem, ecc_anom);

        let r = prop.position(&elem).unwrap();
        assert_relative_eq!(r, rotmt(30.0 * RADEG, Axis::Z) * perifocal, epsilon = 1e-9);
        assert_eq!(r.z, 0.0);
    }

    #[test]
    fn test_reference_constellation_positions() {
        let prop = OrbitPropagator::default();
        let positions = prop
            .propagate_constellation(&Constellation::reference().unwrap())
            .unwrap();

        let expected = [
            Vector3::new(-17198.94636766279, -3357.888426900573, -1938.6777871797744),
            Vector3::new(-16764.513265759095, -188.27453646886534, 6138.269559272154),
            Vector3::new(-18646.045149633792, -1962.47472563864, 0.0),
            Vector3::new(-12159.762070731842, -13896.768195017445, -1029.8165281607808),
        ];

        assert_eq!(positions.len(), 4);
        for (sat, exp) in positions.iter().zip(expected.iter()) {
            assert_relative_eq!(sat.position, *exp, epsilon = 1e-6);
        }
        assert_eq!(positions[3].name, "satelite_4");
    }
}
