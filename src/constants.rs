//! # Constants and type definitions for satlat
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **unit type
//! aliases** used throughout the crate, together with the literal values of the reference
//! positioning run.
//!
//! ## Units
//!
//! The whole pipeline works in a single unit system:
//!
//! - Lengths: **kilometers**
//! - Orbital time (epoch offsets, periods): **seconds**
//! - Gravitational parameter: **km³/s²**
//! - Signal speed: **km/s**
//! - Receiver timestamps (TOA, TOT): **milliseconds**
//!
//! The millisecond timestamps are converted to seconds only when a flight time is derived
//! (see [`MS_PER_SECOND`]).

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Milliseconds in one second
pub const MS_PER_SECOND: f64 = 1000.0;

/// Earth gravitational parameter GM (km³/s²)
pub const GM_EARTH: f64 = 3.986004418e5;

/// Propagation speed of the ranging signal (km/s), rounded speed of light
pub const SIGNAL_SPEED: f64 = 300_000.0;

/// Mean Earth radius (km)
pub const EARTH_MEAN_RADIUS: f64 = 6371.0;

// -------------------------------------------------------------------------------------------------
// Reference run
// -------------------------------------------------------------------------------------------------

/// Time of arrival stamped by the receiver for every signal (ms).
///
/// Must exceed every time of transmission so that all flight times are positive.
pub const REFERENCE_TOA: Millisecond = 600_000.0;

/// Ground-truth receiver position of the reference run (km).
pub const REFERENCE_POSITION: [Kilometer; 3] = [-6420.0, -6432.0, 6325.0];

/// Solver seed of the reference run: a point on the Earth's surface (km).
pub const REFERENCE_INITIAL_GUESS: [Kilometer; 3] = [-EARTH_MEAN_RADIUS, 0.0, 0.0];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Duration or epoch offset in seconds
pub type Second = f64;
/// Receiver timestamp in milliseconds
pub type Millisecond = f64;
