//! # Satellite constellation
//!
//! A [`Constellation`] is the ordered list of [`Satellite`]s whose signals the receiver
//! ranges against. The order of the constellation is the order of every downstream product
//! (positions, timing observations, flight times), and satellite names are unique so that a
//! product can always be traced back to its satellite.
//!
//! ## Sources
//!
//! * [`Constellation::reference`] – the built-in four-satellite constellation of the
//!   reference positioning run.
//! * [`Constellation::from_csv_path`] / [`Constellation::from_csv_reader`] – a CSV table with
//!   header `name,a,e,w,i,o,dt` (km, unitless, degrees, degrees, degrees, seconds).
//!
//! ```text
//! name,a,e,w,i,o,dt
//! satelite_1,15300,0.41,60,30,0,4708.5603
//! satelite_2,16100,0.342,10,30,40,5082.6453
//! ```
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;
use log::debug;
use serde::Deserialize;

use crate::{
    constants::{Degree, Kilometer, Second},
    orbital_elements::OrbitalElements,
    satlat_errors::SatlatError,
};

/// A named satellite and its orbital elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    pub name: String,
    pub elements: OrbitalElements,
}

impl Satellite {
    pub fn new(name: impl Into<String>, elements: OrbitalElements) -> Self {
        Satellite {
            name: name.into(),
            elements,
        }
    }
}

/// One row of the constellation CSV table.
#[derive(Debug, Deserialize)]
struct SatelliteRecord {
    name: String,
    a: Kilometer,
    e: f64,
    w: Degree,
    i: Degree,
    o: Degree,
    dt: Second,
}

impl TryFrom<SatelliteRecord> for Satellite {
    type Error = SatlatError;

    fn try_from(record: SatelliteRecord) -> Result<Self, Self::Error> {
        let elements = OrbitalElements::from_degrees(
            record.a, record.e, record.w, record.i, record.o, record.dt,
        )?;
        Ok(Satellite::new(record.name, elements))
    }
}

/// Ordered, non-empty set of uniquely named satellites.
#[derive(Debug, Clone, PartialEq)]
pub struct Constellation {
    satellites: Vec<Satellite>,
}

impl Constellation {
    /// Build a constellation, keeping the given order.
    ///
    /// Return
    /// ------
    /// * `Err(SatlatError::EmptyConstellation)` if `satellites` is empty.
    /// * `Err(SatlatError::DuplicateSatellite)` if two satellites share a name.
    pub fn new(satellites: Vec<Satellite>) -> Result<Self, SatlatError> {
        if satellites.is_empty() {
            return Err(SatlatError::EmptyConstellation);
        }

        {
            let mut seen = HashSet::with_capacity(satellites.len());
            if let Some(dup) = satellites.iter().find(|sat| !seen.insert(sat.name.as_str())) {
                return Err(SatlatError::DuplicateSatellite(dup.name.clone()));
            }
        }

        Ok(Constellation { satellites })
    }

    /// The four-satellite constellation of the reference positioning run.
    ///
    /// Every satellite is observed a quarter period after its periapsis passage.
    pub fn reference() -> Result<Self, SatlatError> {
        let table: [(&str, Kilometer, f64, Degree, Degree, Degree, Second); 4] = [
            ("satelite_1", 15300.0, 0.41, 60.0, 30.0, 0.0, 4708.5603),
            ("satelite_2", 16100.0, 0.342, 10.0, 30.0, 40.0, 5082.6453),
            ("satelite_3", 17800.0, 0.235, 30.0, 0.0, 40.0, 5908.5511),
            ("satelite_4", 16400.0, 0.3725, 60.0, 20.0, 40.0, 5225.3666),
        ];

        let satellites = table
            .into_iter()
            .map(|(name, a, e, w, i, o, dt)| {
                OrbitalElements::from_degrees(a, e, w, i, o, dt)
                    .map(|elements| Satellite::new(name, elements))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Constellation::new(satellites)
    }

    /// Read a constellation from a CSV source with header `name,a,e,w,i,o,dt`.
    ///
    /// Rows are validated like [`OrbitalElements::from_degrees`]; the first invalid row
    /// aborts the read.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SatlatError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let satellites = csv_reader
            .deserialize::<SatelliteRecord>()
            .map(|record| Satellite::try_from(record?))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Read {} satellites from csv", satellites.len());
        Constellation::new(satellites)
    }

    /// Read a constellation from a CSV file, see [`Constellation::from_csv_reader`].
    pub fn from_csv_path(path: &Utf8Path) -> Result<Self, SatlatError> {
        let file = File::open(path)?;
        Constellation::from_csv_reader(file)
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Satellite> {
        self.satellites.iter()
    }
}

impl<'a> IntoIterator for &'a Constellation {
    type Item = &'a Satellite;
    type IntoIter = std::slice::Iter<'a, Satellite>;

    fn into_iter(self) -> Self::IntoIter {
        self.satellites.iter()
    }
}
