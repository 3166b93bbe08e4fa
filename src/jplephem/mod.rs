//! JPL Ephemeris module for kernel-backed planetary positions
//!
//! This module reads JPL Development Ephemerides (DE) distributed as binary SPK
//! (Spacecraft Planet Kernel) files in the SPICE format.
//!
//! # Main Components
//!
//! - `daf`: Double Array File format reader (underlying format of SPK files)
//! - `spk`: Spacecraft Planet Kernel segment lookup and evaluation
//! - `chebyshev`: Chebyshev series used by SPK types 2 and 3
//! - `names`: Mappings between celestial body names and ID numbers

pub mod chebyshev;
pub mod daf;
pub mod errors;
pub mod names;
pub mod spk;

#[cfg(test)]
pub(crate) mod testing;


// Re-export primary types for convenience
pub use self::errors::JplephemError;
pub use self::spk::{Segment, Spk};
