pub mod constants;
pub mod constellation;
pub mod kepler;
pub mod multilateration;
pub mod orbital_elements;
pub mod propagator;
pub mod ref_system;
pub mod satlat_errors;
pub mod scenario;
pub mod timing;
