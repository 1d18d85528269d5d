use thiserror::Error;

#[derive(Error, Debug)]
pub enum SatlatError {
    #[error("Kepler equation root finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Eccentricity {0} outside the elliptic range [0, 1); Kepler's equation cannot be solved")]
    EccentricityOutOfRange(f64),

    #[error("Non-finite mean anomaly or eccentricity given to the Kepler solver")]
    NonFiniteKeplerInput,

    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),

    #[error("Invalid physical constant: {0}")]
    InvalidPhysicalConstant(String),

    #[error("Invalid solver parameter: {0}")]
    InvalidSolverParameter(String),

    #[error("Invalid scenario configuration: {0}")]
    InvalidScenarioParameter(String),

    #[error("Satellite {0} is defined more than once in the constellation")]
    DuplicateSatellite(String),

    #[error("Constellation contains no satellite")]
    EmptyConstellation,

    #[error(
        "Non-positive flight time for {satellite}: TOA ({toa_ms} ms) must be strictly greater than TOT ({tot_ms} ms)"
    )]
    NonPositiveFlightTime {
        satellite: String,
        toa_ms: f64,
        tot_ms: f64,
    },

    #[error("{satellites} satellite positions given for {observations} flight times")]
    ObservationCountMismatch {
        satellites: usize,
        observations: usize,
    },

    #[error("Flight time of {satellite} must be finite and strictly positive, got {flight_time} s")]
    InvalidFlightTime { satellite: String, flight_time: f64 },

    #[error("At least 3 observations are required to fix a 3-D position, got {0}")]
    InsufficientObservations(usize),

    #[error("Degenerate geometry at iteration {iteration}: estimate coincides with satellite {satellite}")]
    DegenerateGeometry { iteration: usize, satellite: String },

    #[error("Position estimate became non-finite at iteration {iteration}")]
    NonFiniteEstimate { iteration: usize },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error while reading the constellation csv: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for SatlatError {
    fn eq(&self, other: &Self) -> bool {
        use SatlatError::*;
        match (self, other) {
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (EccentricityOutOfRange(a), EccentricityOutOfRange(b)) => a == b,
            (InvalidOrbitalElements(a), InvalidOrbitalElements(b)) => a == b,
            (InvalidPhysicalConstant(a), InvalidPhysicalConstant(b)) => a == b,
            (InvalidSolverParameter(a), InvalidSolverParameter(b)) => a == b,
            (InvalidScenarioParameter(a), InvalidScenarioParameter(b)) => a == b,
            (DuplicateSatellite(a), DuplicateSatellite(b)) => a == b,
            (
                NonPositiveFlightTime {
                    satellite: s1,
                    toa_ms: a1,
                    tot_ms: t1,
                },
                NonPositiveFlightTime {
                    satellite: s2,
                    toa_ms: a2,
                    tot_ms: t2,
                },
            ) => s1 == s2 && a1 == a2 && t1 == t2,
            (
                ObservationCountMismatch {
                    satellites: s1,
                    observations: o1,
                },
                ObservationCountMismatch {
                    satellites: s2,
                    observations: o2,
                },
            ) => s1 == s2 && o1 == o2,
            (
                InvalidFlightTime {
                    satellite: s1,
                    flight_time: t1,
                },
                InvalidFlightTime {
                    satellite: s2,
                    flight_time: t2,
                },
            ) => s1 == s2 && t1 == t2,
            (InsufficientObservations(a), InsufficientObservations(b)) => a == b,
            (
                DegenerateGeometry {
                    iteration: i1,
                    satellite: s1,
                },
                DegenerateGeometry {
                    iteration: i2,
                    satellite: s2,
                },
            ) => i1 == i2 && s1 == s2,
            (NonFiniteEstimate { iteration: a }, NonFiniteEstimate { iteration: b }) => a == b,

            // not comparable, same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (NonFiniteKeplerInput, NonFiniteKeplerInput) => true,
            (EmptyConstellation, EmptyConstellation) => true,

            _ => false,
        }
    }
}
