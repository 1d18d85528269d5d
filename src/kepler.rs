//! # Kepler's equation
//!
//! Newton–Raphson solver for the elliptic Kepler equation
//!
//! ```text
//! E − e·sin(E) = M
//! ```
//!
//! mapping a mean anomaly `M` to the eccentric anomaly `E` of an elliptic orbit
//! (`0 ≤ e < 1`). The iteration is delegated to [`roots::find_root_newton_raphson`]
//! with the analytic slope `1 − e·cos(E)` and the classical starting point `E₀ = π`,
//! which converges for every mean anomaly in `[0, 2π)` and every elliptic eccentricity.
use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    constants::{Radian, DPI},
    satlat_errors::SatlatError,
};

/// Returns the principal value of an angle in radians, in [0, 2π).
pub(crate) fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Tolerances of the Newton–Raphson iteration used on Kepler's equation.
///
/// * `eps` – absolute tolerance on both the equation residual and the step size (radians).
/// * `max_iter` – iteration cap before [`roots::SearchError::NoConvergency`] is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub eps: f64,
    pub max_iter: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver {
            eps: 1e-12,
            max_iter: 50,
        }
    }
}

impl KeplerSolver {
    /// Solve Kepler's equation for the eccentric anomaly.
    ///
    /// The mean anomaly is first reduced to `[0, 2π)`; the whole revolutions removed by the
    /// reduction are added back to the root, so the returned `E` satisfies the equation for
    /// the `mean_anomaly` actually given.
    ///
    /// Arguments
    /// ---------
    /// * `mean_anomaly` – mean anomaly `M` (radians), any real value.
    /// * `eccentricity` – eccentricity `e`, must lie in `[0, 1)`.
    ///
    /// Return
    /// ------
    /// * `Ok(E)` – eccentric anomaly (radians).
    /// * `Err(SatlatError::EccentricityOutOfRange)` – parabolic, hyperbolic or negative `e`.
    /// * `Err(SatlatError::NonFiniteKeplerInput)` – `M` or `e` is NaN or infinite.
    /// * `Err(SatlatError::RootFindingError)` – the Newton iteration did not converge
    ///   or hit a vanishing derivative.
    pub fn eccentric_anomaly(
        &self,
        mean_anomaly: Radian,
        eccentricity: f64,
    ) -> Result<Radian, SatlatError> {
        if !mean_anomaly.is_finite() || !eccentricity.is_finite() {
            return Err(SatlatError::NonFiniteKeplerInput);
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(SatlatError::EccentricityOutOfRange(eccentricity));
        }

        let reduced_anomaly = principal_angle(mean_anomaly);
        let revolutions = mean_anomaly - reduced_anomaly;

        let f = |ecc_anom: f64| -> f64 {
            ecc_anom - eccentricity * ecc_anom.sin() - reduced_anomaly
        };
        let df = |ecc_anom: f64| -> f64 { 1.0 - eccentricity * ecc_anom.cos() };

        let mut tol = SimpleConvergency {
            eps: self.eps,
            max_iter: self.max_iter,
        };

        let ecc_anom = find_root_newton_raphson(PI, &f, &df, &mut tol)?;
        Ok(ecc_anom + revolutions)
    }
}
