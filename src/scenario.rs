//! # Positioning scenario
//!
//! A [`Scenario`] gathers everything a positioning run needs (constellation, physical
//! constants, ground-truth receiver position, solver seed and solver parameters) and
//! [`Scenario::run`] chains the pipeline:
//!
//! ```text
//! Constellation ──OrbitPropagator──▶ satellite positions
//!               ──TimingSimulator(truth)──▶ timing observations (TOT)
//!               ──TimingSimulator::flight_times──▶ flight times
//!               ──MultilaterationSolver(seed)──▶ estimate
//! ```
//!
//! Every stage hands its output to the next as a plain value; nothing outlives the run.
//! Any failure stops the pipeline: there is no partial result.
//!
//! ## Example
//!
//! ```rust,no_run
//! use satlat::scenario::Scenario;
//!
//! let scenario = Scenario::builder().build().unwrap();
//! let report = scenario.run().unwrap();
//! println!("{report}");
//! ```
use std::fmt;

use itertools::Itertools;
use log::info;
use nalgebra::Vector3;

use crate::{
    constants::{
        Kilometer, Millisecond, Second, GM_EARTH, REFERENCE_INITIAL_GUESS, REFERENCE_POSITION,
        REFERENCE_TOA, SIGNAL_SPEED,
    },
    constellation::Constellation,
    kepler::KeplerSolver,
    multilateration::{MultilaterationSolver, SolverOutcome, SolverParams},
    propagator::{OrbitPropagator, SatellitePosition},
    satlat_errors::SatlatError,
    timing::{TimingObservation, TimingSimulator},
};

/// Complete, validated configuration of one positioning run.
///
/// Defaults reproduce the reference run: the four-satellite reference constellation,
/// μ = 3.986004418e5 km³/s², v = 300000 km/s, TOA = 600000 ms, receiver at
/// `(−6420, −6432, 6325)` km, seed `(−6371, 0, 0)` km, 500 iterations at learning rate 0.6.
#[derive(Debug, Clone)]
pub struct Scenario {
    constellation: Constellation,
    propagator: OrbitPropagator,
    timing: TimingSimulator,
    reference_position: Vector3<Kilometer>,
    initial_guess: Vector3<Kilometer>,
    solver_params: SolverParams,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::new()
    }

    pub fn constellation(&self) -> &Constellation {
        &self.constellation
    }

    pub fn propagator(&self) -> &OrbitPropagator {
        &self.propagator
    }

    pub fn timing(&self) -> &TimingSimulator {
        &self.timing
    }

    pub fn reference_position(&self) -> &Vector3<Kilometer> {
        &self.reference_position
    }

    pub fn initial_guess(&self) -> &Vector3<Kilometer> {
        &self.initial_guess
    }

    pub fn solver_params(&self) -> &SolverParams {
        &self.solver_params
    }

    /// Run the full pipeline once.
    ///
    /// Return
    /// ------
    /// * `Ok(PositioningReport)` – positions, observations, flight times and the solver
    ///   outcome, with the error of the estimate against the reference position.
    /// * `Err(SatlatError)` – the first failure of any stage.
    pub fn run(&self) -> Result<PositioningReport, SatlatError> {
        info!(
            "Propagating {} satellites (mu = {} km^3/s^2)",
            self.constellation.len(),
            self.propagator.gravitational_parameter()
        );
        let satellite_positions = self.propagator.propagate_constellation(&self.constellation)?;

        info!(
            "Simulating timing observations (TOA = {} ms, v = {} km/s)",
            self.timing.time_of_arrival(),
            self.timing.signal_speed()
        );
        let observations = self
            .timing
            .simulate(&satellite_positions, &self.reference_position)?;
        let flight_times = self.timing.flight_times(&observations)?;

        info!(
            "Running gradient descent: {} iterations, learning rate {}",
            self.solver_params.max_iterations, self.solver_params.learning_rate
        );
        let solver = MultilaterationSolver::new(
            &satellite_positions,
            &flight_times,
            self.timing.signal_speed(),
            self.solver_params,
        )?;
        let outcome = solver.solve(self.initial_guess)?;

        let error = (self.reference_position - outcome.estimate).norm();
        info!("Final position error: {error:.4} km");

        Ok(PositioningReport {
            satellite_positions,
            observations,
            flight_times,
            reference_position: self.reference_position,
            initial_guess: self.initial_guess,
            outcome,
            error,
        })
    }
}

/// Builder for [`Scenario`], with validation.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    constellation: Option<Constellation>,
    gravitational_parameter: f64,
    kepler: KeplerSolver,
    signal_speed: f64,
    time_of_arrival: Millisecond,
    reference_position: Vector3<Kilometer>,
    initial_guess: Vector3<Kilometer>,
    solver_params: SolverParams,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        ScenarioBuilder {
            constellation: None,
            gravitational_parameter: GM_EARTH,
            kepler: KeplerSolver::default(),
            signal_speed: SIGNAL_SPEED,
            time_of_arrival: REFERENCE_TOA,
            reference_position: Vector3::from(REFERENCE_POSITION),
            initial_guess: Vector3::from(REFERENCE_INITIAL_GUESS),
            solver_params: SolverParams::default(),
        }
    }

    pub fn constellation(mut self, v: Constellation) -> Self {
        self.constellation = Some(v);
        self
    }
    pub fn gravitational_parameter(mut self, v: f64) -> Self {
        self.gravitational_parameter = v;
        self
    }
    pub fn kepler(mut self, v: KeplerSolver) -> Self {
        self.kepler = v;
        self
    }
    pub fn signal_speed(mut self, v: f64) -> Self {
        self.signal_speed = v;
        self
    }
    pub fn time_of_arrival(mut self, v: Millisecond) -> Self {
        self.time_of_arrival = v;
        self
    }
    pub fn reference_position(mut self, v: Vector3<Kilometer>) -> Self {
        self.reference_position = v;
        self
    }
    pub fn initial_guess(mut self, v: Vector3<Kilometer>) -> Self {
        self.initial_guess = v;
        self
    }
    pub fn solver_params(mut self, v: SolverParams) -> Self {
        self.solver_params = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Without an explicit constellation, [`Constellation::reference`] is used.
    ///
    /// Validation rules
    /// -----------------
    /// * gravitational parameter and signal speed finite and `> 0`, TOA finite;
    /// * reference position and initial guess finite;
    /// * Kepler tolerance finite and `> 0`, at least one Newton iteration.
    pub fn build(self) -> Result<Scenario, SatlatError> {
        if !(self.kepler.eps.is_finite() && self.kepler.eps > 0.0) || self.kepler.max_iter == 0 {
            return Err(SatlatError::InvalidSolverParameter(
                "Kepler solver needs eps > 0 and max_iter >= 1".into(),
            ));
        }
        if !self.reference_position.iter().all(|c| c.is_finite()) {
            return Err(SatlatError::InvalidScenarioParameter(
                "reference position must be finite".into(),
            ));
        }
        if !self.initial_guess.iter().all(|c| c.is_finite()) {
            return Err(SatlatError::InvalidScenarioParameter(
                "initial guess must be finite".into(),
            ));
        }

        let constellation = match self.constellation {
            Some(constellation) => constellation,
            None => Constellation::reference()?,
        };

        Ok(Scenario {
            constellation,
            propagator: OrbitPropagator::new(self.gravitational_parameter, self.kepler)?,
            timing: TimingSimulator::new(self.signal_speed, self.time_of_arrival)?,
            reference_position: self.reference_position,
            initial_guess: self.initial_guess,
            solver_params: self.solver_params,
        })
    }
}

/// Everything produced by one [`Scenario::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositioningReport {
    pub satellite_positions: Vec<SatellitePosition>,
    pub observations: Vec<TimingObservation>,
    pub flight_times: Vec<Second>,
    pub reference_position: Vector3<Kilometer>,
    pub initial_guess: Vector3<Kilometer>,
    pub outcome: SolverOutcome,
    /// Euclidean distance between the reference position and the estimate (km).
    pub error: Kilometer,
}

impl PositioningReport {
    pub fn estimate(&self) -> &Vector3<Kilometer> {
        &self.outcome.estimate
    }
}

fn fmt_vector(v: &Vector3<f64>) -> String {
    format!("[{:.4}, {:.4}, {:.4}]", v.x, v.y, v.z)
}

impl fmt::Display for PositioningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Satellites")?;
        writeln!(f, "-------------------------------------------")?;
        for ((sat, obs), tof) in self
            .satellite_positions
            .iter()
            .zip_eq(&self.observations)
            .zip_eq(&self.flight_times)
        {
            writeln!(
                f,
                "  {:<12} r = {} km, TOT = {:.6} ms, TOF = {:.9} s",
                sat.name,
                fmt_vector(&sat.position),
                obs.time_of_transmission,
                tof
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Initial guess:      {} km", fmt_vector(&self.initial_guess))?;
        writeln!(
            f,
            "Reference position: {} km",
            fmt_vector(&self.reference_position)
        )?;
        writeln!(
            f,
            "Estimated position: {} km ({} iterations)",
            fmt_vector(&self.outcome.estimate),
            self.outcome.iterations
        )?;
        write!(f, "Final error: {:.4} km", self.error)
    }
}
