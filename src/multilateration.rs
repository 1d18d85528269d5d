//! # Gradient-descent multilateration
//!
//! Recovers a receiver position from the positions `sᵢ` of the satellites and the flight
//! times `tofᵢ` of their signals. Each flight time gives a range `pᵢ = v·tofᵢ`, and the
//! solver walks the estimate `r` down the (unnormalized) gradient of `Σ (|r − sᵢ| − pᵢ)²`:
//!
//! ```text
//! dᵢ = r − sᵢ,   mᵢ = |dᵢ|,   Rᵢ = 1 − pᵢ/mᵢ
//! g  = Σ Rᵢ·dᵢ
//! r ← r − λ·g
//! ```
//!
//! The step carries neither the factor 2 of the exact gradient nor any normalization by the
//! number of satellites; the default learning rate `λ = 0.6` and iteration budget `500` are
//! tuned for that exact form.
//!
//! The loop always runs the whole budget: there is no convergence test and no early exit.
//! Its state ([`GradientDescentState`]) is explicit, so callers can drive it one
//! [`step`](MultilaterationSolver::step) at a time or let
//! [`solve`](MultilaterationSolver::solve) exhaust it.
//!
//! ## Failure modes
//!
//! * An estimate within `min_range` of a satellite makes `Rᵢ` undefined:
//!   [`SatlatError::DegenerateGeometry`].
//! * A step producing NaN or ±∞ (e.g. a learning rate far too large):
//!   [`SatlatError::NonFiniteEstimate`].
//!
//! Convergence is not guaranteed for every geometry: a seed in the wrong hemisphere may
//! settle on the mirror solution, and near-coplanar satellites make the problem ill-posed.
use std::fmt;

use itertools::Itertools;
use log::{debug, trace};
use nalgebra::Vector3;

use crate::{
    constants::{Kilometer, Second},
    propagator::SatellitePosition,
    satlat_errors::SatlatError,
};

/// Tunable parameters of the gradient-descent solver.
///
/// Fields
/// -----------------
/// * `learning_rate` – step factor `λ` applied to the gradient (default `0.6`).
/// * `max_iterations` – exact number of iterations run (default `500`). `0` returns the seed.
/// * `min_range` – distance (km) below which the estimate is considered to coincide with a
///   satellite (default `1e-9`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub min_range: Kilometer,
}

impl SolverParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SolverParamsBuilder`] initialized with default values.
    ///
    /// ```rust,no_run
    /// use satlat::multilateration::SolverParams;
    ///
    /// let params = SolverParams::builder()
    ///     .learning_rate(0.3)
    ///     .max_iterations(2000)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> SolverParamsBuilder {
        SolverParamsBuilder::new()
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            learning_rate: 0.6,
            max_iterations: 500,
            min_range: 1e-9,
        }
    }
}

/// Builder for [`SolverParams`], with validation.
#[derive(Debug, Clone)]
pub struct SolverParamsBuilder {
    params: SolverParams,
}

impl Default for SolverParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SolverParams::default(),
        }
    }

    pub fn learning_rate(mut self, v: f64) -> Self {
        self.params.learning_rate = v;
        self
    }
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.params.max_iterations = v;
        self
    }
    pub fn min_range(mut self, v: Kilometer) -> Self {
        self.params.min_range = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `learning_rate` finite and `> 0.0`.
    /// * `min_range` finite and `>= 0.0`.
    pub fn build(self) -> Result<SolverParams, SatlatError> {
        let p = &self.params;

        if !(p.learning_rate.is_finite() && p.learning_rate > 0.0) {
            return Err(SatlatError::InvalidSolverParameter(
                "learning_rate must be finite and > 0".into(),
            ));
        }
        if !(p.min_range.is_finite() && p.min_range >= 0.0) {
            return Err(SatlatError::InvalidSolverParameter(
                "min_range must be finite and >= 0".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Iteration state of the solver: the current estimate and how much budget is left.
/// Upper bound on the residual history reserved before the first step; longer runs grow
/// the buffer as they go.
const PREALLOCATED_RESIDUALS: usize = 4096;

fn residual_history_capacity(max_iterations: usize) -> usize {
    max_iterations.saturating_add(1).min(PREALLOCATED_RESIDUALS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescentState {
    estimate: Vector3<Kilometer>,
    iteration: usize,
    max_iterations: usize,
}

impl GradientDescentState {
    pub fn estimate(&self) -> &Vector3<Kilometer> {
        &self.estimate
    }

    /// Number of iterations already applied.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn is_exhausted(&self) -> bool {
        self.iteration >= self.max_iterations
    }
}

/// Result of a complete solver run.
///
/// `residual_history[k]` is the squared range residual `Σ (mᵢ − pᵢ)²` (km²) after `k`
/// iterations; index 0 is the seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub estimate: Vector3<Kilometer>,
    pub iterations: usize,
    pub residual_history: Vec<f64>,
}

impl SolverOutcome {
    pub fn initial_residual(&self) -> f64 {
        self.residual_history.first().copied().unwrap_or(f64::NAN)
    }

    pub fn final_residual(&self) -> f64 {
        self.residual_history.last().copied().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Estimate after {} iterations: [{:.4}, {:.4}, {:.4}] km",
            self.iterations, self.estimate.x, self.estimate.y, self.estimate.z
        )?;
        write!(
            f,
            "Squared range residual: {:.6e} km² -> {:.6e} km²",
            self.initial_residual(),
            self.final_residual()
        )
    }
}

/// Gradient-descent multilateration over a fixed set of range observations.
#[derive(Debug, Clone)]
pub struct MultilaterationSolver<'a> {
    satellites: &'a [SatellitePosition],
    ranges: Vec<Kilometer>,
    params: SolverParams,
}

impl<'a> MultilaterationSolver<'a> {
    /// Arguments
    /// ---------
    /// * `satellites` – satellite positions (km).
    /// * `flight_times` – observed flight time of each satellite signal (s), same order.
    /// * `signal_speed` – propagation speed `v` (km/s).
    /// * `params` – solver parameters.
    ///
    /// Return
    /// ------
    /// * `Err(SatlatError::ObservationCountMismatch)` if the two slices differ in length.
    /// * `Err(SatlatError::InsufficientObservations)` with fewer than 3 observations.
    /// * `Err(SatlatError::InvalidFlightTime)` for a non-finite or non-positive flight time.
    /// * `Err(SatlatError::InvalidPhysicalConstant)` for a bad signal speed.
    pub fn new(
        satellites: &'a [SatellitePosition],
        flight_times: &[Second],
        signal_speed: f64,
        params: SolverParams,
    ) -> Result<Self, SatlatError> {
        if satellites.len() != flight_times.len() {
            return Err(SatlatError::ObservationCountMismatch {
                satellites: satellites.len(),
                observations: flight_times.len(),
            });
        }
        if satellites.len() < 3 {
            return Err(SatlatError::InsufficientObservations(satellites.len()));
        }
        if !(signal_speed.is_finite() && signal_speed > 0.0) {
            return Err(SatlatError::InvalidPhysicalConstant(format!(
                "signal speed must be finite and strictly positive, got {signal_speed}"
            )));
        }

        let ranges = satellites
            .iter()
            .zip_eq(flight_times)
            .map(|(sat, &tof)| {
                if tof.is_finite() && tof > 0.0 {
                    Ok(signal_speed * tof)
                } else {
                    Err(SatlatError::InvalidFlightTime {
                        satellite: sat.name.clone(),
                        flight_time: tof,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MultilaterationSolver {
            satellites,
            ranges,
            params,
        })
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Ranges `pᵢ = v·tofᵢ` (km), in satellite order.
    pub fn ranges(&self) -> &[Kilometer] {
        &self.ranges
    }

    /// Squared range residual `Σ (|r − sᵢ| − pᵢ)²` (km²).
    pub fn squared_residual(&self, estimate: &Vector3<Kilometer>) -> f64 {
        self.satellites
            .iter()
            .zip_eq(&self.ranges)
            .map(|(sat, range)| ((estimate - sat.position).norm() - range).powi(2))
            .sum()
    }

    /// Unnormalized gradient `Σ (1 − pᵢ/mᵢ)·(r − sᵢ)`.
    ///
    /// `iteration` only labels a [`SatlatError::DegenerateGeometry`] error.
    pub fn gradient(
        &self,
        estimate: &Vector3<Kilometer>,
        iteration: usize,
    ) -> Result<Vector3<f64>, SatlatError> {
        let mut gradient = Vector3::zeros();
        for (sat, range) in self.satellites.iter().zip_eq(&self.ranges) {
            let displacement = estimate - sat.position;
            let distance = displacement.norm();
            if !(distance > self.params.min_range) {
                return Err(SatlatError::DegenerateGeometry {
                    iteration,
                    satellite: sat.name.clone(),
                });
            }
            let ratio = 1.0 - range / distance;
            gradient += ratio * displacement;
        }
        Ok(gradient)
    }

    /// Fresh iteration state seeded at `initial_guess`.
    pub fn start(
        &self,
        initial_guess: Vector3<Kilometer>,
    ) -> Result<GradientDescentState, SatlatError> {
        if !initial_guess.iter().all(|c| c.is_finite()) {
            return Err(SatlatError::NonFiniteEstimate { iteration: 0 });
        }
        Ok(GradientDescentState {
            estimate: initial_guess,
            iteration: 0,
            max_iterations: self.params.max_iterations,
        })
    }

    /// Apply one gradient step to `state`.
    ///
    /// Return
    /// ------
    /// * `Ok(false)` without touching the state once the budget is exhausted.
    /// * `Ok(true)` after a step.
    /// * `Err(SatlatError)` on degenerate geometry or a non-finite update; the state keeps
    ///   the last valid estimate.
    pub fn step(&self, state: &mut GradientDescentState) -> Result<bool, SatlatError> {
        if state.is_exhausted() {
            return Ok(false);
        }

        let gradient = self.gradient(&state.estimate, state.iteration)?;
        let next = state.estimate - self.params.learning_rate * gradient;
        if !next.iter().all(|c| c.is_finite()) {
            return Err(SatlatError::NonFiniteEstimate {
                iteration: state.iteration,
            });
        }

        state.estimate = next;
        state.iteration += 1;
        Ok(true)
    }

    /// Run the whole iteration budget from `initial_guess`.
    pub fn solve(&self, initial_guess: Vector3<Kilometer>) -> Result<SolverOutcome, SatlatError> {
        let mut state = self.start(initial_guess)?;
        let mut residual_history =
            Vec::with_capacity(residual_history_capacity(state.max_iterations));
        residual_history.push(self.squared_residual(&state.estimate));

        while self.step(&mut state)? {
            let residual = self.squared_residual(&state.estimate);
            trace!(
                "iteration {}: r = [{:.6}, {:.6}, {:.6}] km, residual = {:.6e} km²",
                state.iteration,
                state.estimate.x,
                state.estimate.y,
                state.estimate.z,
                residual
            );
            residual_history.push(residual);
        }

        let outcome = SolverOutcome {
            estimate: state.estimate,
            iterations: state.iteration,
            residual_history,
        };
        debug!(
            "gradient descent finished after {} iterations, residual {:.6e} -> {:.6e} km²",
            outcome.iterations,
            outcome.initial_residual(),
            outcome.final_residual()
        );
        Ok(outcome)
    }
}
