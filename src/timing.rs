//! # Timing observations
//!
//! Forward model of the receiver clock: every satellite signal reaches the receiver at the
//! same, fixed **time of arrival** (TOA, ms). Given the true receiver position, the
//! [`TimingSimulator`] computes the one-way flight time of each signal and back-dates the
//! **time of transmission** (TOT, ms) that the satellite must have stamped:
//!
//! ```text
//! tof = |r_sat − r_true| / v        (s)
//! TOT = TOA − 1000 · tof            (ms)
//! ```
//!
//! The inverse, [`TimingSimulator::flight_times`], turns observations back into flight times
//! `(TOA − TOT) / 1000` (s) for the solver. Clocks are perfect and no noise is added.
use log::debug;
use nalgebra::Vector3;

use crate::{
    constants::{Kilometer, Millisecond, Second, MS_PER_SECOND, REFERENCE_TOA, SIGNAL_SPEED},
    propagator::SatellitePosition,
    satlat_errors::SatlatError,
};

/// Time of transmission of one satellite signal, as the receiver would record it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingObservation {
    pub satellite: String,
    pub time_of_transmission: Millisecond,
}

/// Synthesizes and inverts time-of-flight observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSimulator {
    signal_speed: f64,
    time_of_arrival: Millisecond,
}

impl Default for TimingSimulator {
    fn default() -> Self {
        TimingSimulator {
            signal_speed: SIGNAL_SPEED,
            time_of_arrival: REFERENCE_TOA,
        }
    }
}

impl TimingSimulator {
    /// Arguments
    /// ---------
    /// * `signal_speed` – propagation speed `v` (km/s), finite and strictly positive.
    /// * `time_of_arrival` – shared TOA (ms), finite.
    pub fn new(signal_speed: f64, time_of_arrival: Millisecond) -> Result<Self, SatlatError> {
        if !(signal_speed.is_finite() && signal_speed > 0.0) {
            return Err(SatlatError::InvalidPhysicalConstant(format!(
                "signal speed must be finite and strictly positive, got {signal_speed}"
            )));
        }
        if !time_of_arrival.is_finite() {
            return Err(SatlatError::InvalidPhysicalConstant(format!(
                "time of arrival must be finite, got {time_of_arrival}"
            )));
        }
        Ok(TimingSimulator {
            signal_speed,
            time_of_arrival,
        })
    }

    pub fn signal_speed(&self) -> f64 {
        self.signal_speed
    }

    pub fn time_of_arrival(&self) -> Millisecond {
        self.time_of_arrival
    }

    /// Range travelled in `flight_time` seconds (km).
    pub fn range(&self, flight_time: Second) -> Kilometer {
        self.signal_speed * flight_time
    }

    /// Synthesize one observation per satellite for a receiver at `true_position`.
    ///
    /// Return
    /// ------
    /// * `Ok(observations)` in the same order as `satellites`.
    /// * `Err(SatlatError::NonPositiveFlightTime)` if the receiver sits on a satellite, which
    ///   would give a zero flight time.
    pub fn simulate(
        &self,
        satellites: &[SatellitePosition],
        true_position: &Vector3<Kilometer>,
    ) -> Result<Vec<TimingObservation>, SatlatError> {
        satellites
            .iter()
            .map(|sat| {
                let true_range = (sat.position - true_position).norm();
                let flight_time = true_range / self.signal_speed;
                let time_of_transmission = self.time_of_arrival - flight_time * MS_PER_SECOND;

                if time_of_transmission >= self.time_of_arrival {
                    return Err(SatlatError::NonPositiveFlightTime {
                        satellite: sat.name.clone(),
                        toa_ms: self.time_of_arrival,
                        tot_ms: time_of_transmission,
                    });
                }

                debug!(
                    "{}: range = {:.3} km, tof = {:.9} s, TOT = {:.6} ms",
                    sat.name, true_range, flight_time, time_of_transmission
                );
                Ok(TimingObservation {
                    satellite: sat.name.clone(),
                    time_of_transmission,
                })
            })
            .collect()
    }

    /// Flight time `(TOA − TOT) / 1000` (s) of one observation.
    ///
    /// Return
    /// ------
    /// * `Err(SatlatError::NonPositiveFlightTime)` unless TOA is strictly greater than TOT.
    pub fn flight_time(&self, observation: &TimingObservation) -> Result<Second, SatlatError> {
        if !(self.time_of_arrival > observation.time_of_transmission) {
            return Err(SatlatError::NonPositiveFlightTime {
                satellite: observation.satellite.clone(),
                toa_ms: self.time_of_arrival,
                tot_ms: observation.time_of_transmission,
            });
        }
        Ok((self.time_of_arrival - observation.time_of_transmission) / MS_PER_SECOND)
    }

    /// Flight times of every observation, in order; the first inconsistent observation
    /// aborts.
    pub fn flight_times(
        &self,
        observations: &[TimingObservation],
    ) -> Result<Vec<Second>, SatlatError> {
        observations
            .iter()
            .map(|obs| self.flight_time(obs))
            .collect()
    }
}

#[cfg(test)]
mod timing_test {
    use super::*;
    use approx::assert_relative_eq;

    fn sat(name: &str, x: f64, y: f64, z: f64) -> SatellitePosition {
        SatellitePosition {
            name: name.into(),
            position: Vector3::new(x, y, z),
        }
    }

    #[test]
    fn test_invalid_constants() {
        assert!(matches!(
            TimingSimulator::new(0.0, 1000.0),
            Err(SatlatError::InvalidPhysicalConstant(_))
        ));
        assert!(matches!(
            TimingSimulator::new(-3.0e5, 1000.0),
            Err(SatlatError::InvalidPhysicalConstant(_))
        ));
        assert!(matches!(
            TimingSimulator::new(3.0e5, f64::NAN),
            Err(SatlatError::InvalidPhysicalConstant(_))
        ));
    }

    #[test]
    fn test_simulate_known_range() {
        let sim = TimingSimulator::default();
        let sats = [sat("s1", 30000.0, 0.0, 0.0), sat("s2", 0.0, -15000.0, 0.0)];

        let obs = sim.simulate(&sats, &Vector3::zeros()).unwrap();

        // 30000 km at 300000 km/s is 0.1 s
        assert_eq!(obs[0].satellite, "s1");
        assert_relative_eq!(obs[0].time_of_transmission, 599_900.0, epsilon = 1e-9);
        assert_eq!(obs[1].satellite, "s2");
        assert_relative_eq!(obs[1].time_of_transmission, 599_950.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flight_times_invert_simulation() {
        let sim = TimingSimulator::default();
        let truth = Vector3::new(-6420.0, -6432.0, 6325.0);
        let sats = [
            sat("a", -17198.9, -3357.9, -1938.7),
            sat("b", -16764.5, -188.3, 6138.3),
            sat("c", -18646.0, -1962.5, 0.0),
        ];

        let obs = sim.simulate(&sats, &truth).unwrap();
        let tof = sim.flight_times(&obs).unwrap();

        for (s, t) in sats.iter().zip(tof.iter()) {
            let range = (s.position - truth).norm();
            assert_relative_eq!(sim.range(*t), range, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_receiver_on_satellite_is_rejected() {
        let sim = TimingSimulator::default();
        let sats = [sat("s1", 7000.0, 0.0, 0.0)];
        assert_eq!(
            sim.simulate(&sats, &Vector3::new(7000.0, 0.0, 0.0)),
            Err(SatlatError::NonPositiveFlightTime {
                satellite: "s1".into(),
                toa_ms: REFERENCE_TOA,
                tot_ms: REFERENCE_TOA,
            })
        );
    }

    #[test]
    fn test_tot_after_toa_is_rejected() {
        let sim = TimingSimulator::default();
        let obs = vec![
            TimingObservation {
                satellite: "ok".into(),
                time_of_transmission: 599_950.0,
            },
            TimingObservation {
                satellite: "late".into(),
                time_of_transmission: 600_010.0,
            },
        ];

        assert_eq!(
            sim.flight_times(&obs),
            Err(SatlatError::NonPositiveFlightTime {
                satellite: "late".into(),
                toa_ms: 600_000.0,
                tot_ms: 600_010.0,
            })
        );
    }

    #[test]
    fn test_toa_equal_to_tot_is_rejected() {
        let sim = TimingSimulator::new(SIGNAL_SPEED, 1000.0).unwrap();
        let obs = TimingObservation {
            satellite: "edge".into(),
            time_of_transmission: 1000.0,
        };
        assert!(matches!(
            sim.flight_time(&obs),
            Err(SatlatError::NonPositiveFlightTime { .. })
        ));
    }

    #[test]
    fn test_small_toa_still_positive_flight_time() {
        // TOT can go negative, only the ordering TOA > TOT matters
        let sim = TimingSimulator::new(SIGNAL_SPEED, 10.0).unwrap();
        let sats = [sat("far", 30000.0, 0.0, 0.0)];
        let obs = sim.simulate(&sats, &Vector3::zeros()).unwrap();
        assert_relative_eq!(obs[0].time_of_transmission, -90.0, epsilon = 1e-9);
        assert_relative_eq!(sim.flight_time(&obs[0]).unwrap(), 0.1, epsilon = 1e-12);
    }
}
