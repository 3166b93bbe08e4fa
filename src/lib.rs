//! Fastephem: array-oriented ephemeris helpers for fast numeric paths
//!
//! This crate provides the small pieces that sit between a time/ephemeris
//! abstraction and tight numeric loops: conversions between astronomical-unit
//! and kilometer quantities, raw position/velocity arrays for solar-system
//! bodies at split TDB Julian dates, and optional parallel variants of
//! element-wise kernels.
//!
//! ```no_run
//! use fastephem::ephemeris::StandardEphemeris;
//! use fastephem::solar_system::prepare_earth_position_vel_jd;
//! use fastephem::time::{time_to_jd1_jd2, Time, TimeScale};
//!
//! let time = Time::from_calendar(TimeScale::Utc, 2024, 1, 1, 0, 0, 0.0);
//! let (jd1, jd2) = time_to_jd1_jd2(&time, "tdb")?;
//! let provider = StandardEphemeris::new();
//! let (pos, vel, helio) =
//!     prepare_earth_position_vel_jd(&provider, jd1.view(), jd2.view(), Some("builtin"), "km")?;
//! println!("{} {} {}", pos, vel, helio);
//! # Ok::<(), fastephem::FastephemError>(())
//! ```

use thiserror::Error;

pub mod accel;
pub mod constants;
pub mod ephemeris;
pub mod jplephem;
pub mod solar_system;
pub mod time;
pub mod units;

// Re-export commonly used types
pub use accel::{parallel, Accelerated, HAS_PARALLEL};
pub use constants::{AU_KM, DAY_S};
pub use ephemeris::{BodySpec, BodyState, EarthState, SolarSystemEphemeris, StandardEphemeris};
pub use solar_system::{get_body_barycentric_posvel_jd, prepare_earth_position_vel_jd};
pub use time::{time_to_jd1_jd2, Time, TimeScale};
pub use units::LengthUnit;

/// Main error type for the fastephem library
#[derive(Debug, Error)]
pub enum FastephemError {
    #[error("Unsupported unit '{0}' (expected 'au' or 'km').")]
    InvalidUnit(String),

    #[error("{0} is not installed")]
    MissingDependency(&'static str),

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Unknown ephemeris: {0}")]
    UnknownEphemeris(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error(transparent)]
    Time(#[from] time::TimeError),

    #[error(transparent)]
    Kernel(#[from] jplephem::JplephemError),
}

/// Result type for fastephem operations
pub type Result<T> = std::result::Result<T, FastephemError>;
