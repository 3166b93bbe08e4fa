//! Constants module for unit conversions and ephemeris calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in meters (per IAU 2012 Resolution B2)
pub const AU_M: f64 = 149_597_870_700.0;
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = AU_M / 1000.0;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Modified Julian date zero point
pub const MJD_ZERO: f64 = 2_400_000.5;
/// TT minus TAI in seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;
/// TT minus TAI in days
pub const TT_MINUS_TAI: f64 = TT_MINUS_TAI_S / DAY_S;
/// MJD of 1977-01-01, the origin of TCG and TCB
pub const MJD_1977: f64 = 43_144.0;
/// Rate of TCG relative to TT (IAU 2000 Resolution B1.9)
pub const L_G: f64 = 6.969_290_134e-10;
/// Rate of TCB relative to TDB (IAU 2006 Resolution B3)
pub const L_B: f64 = 1.550_519_768e-8;
/// TDB minus TCB at 1977-01-01T00:00:32.184 TAI, in days
pub const TDB0: f64 = -6.55e-5 / DAY_S;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Mean obliquity of the ecliptic at J2000 in radians (IAU 2006)
pub const OBLIQUITY_J2000: f64 = 84_381.406 / 3600.0 * DEG2RAD;

// Earth and Moon
/// Earth's equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.1366;
/// Earth/Moon mass ratio (DE430)
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_568_9;

// Sun/planet mass ratios (IAU 2009 system of constants)
/// Sun/Mercury mass ratio
pub const SUN_MERCURY_MASS_RATIO: f64 = 6_023_597.4;
/// Sun/Venus mass ratio
pub const SUN_VENUS_MASS_RATIO: f64 = 408_523.719;
/// Sun/(Earth + Moon) mass ratio
pub const SUN_EMB_MASS_RATIO: f64 = 328_900.561_4;
/// Sun/Mars system mass ratio
pub const SUN_MARS_MASS_RATIO: f64 = 3_098_703.59;
/// Sun/Jupiter system mass ratio
pub const SUN_JUPITER_MASS_RATIO: f64 = 1_047.348_644;
/// Sun/Saturn system mass ratio
pub const SUN_SATURN_MASS_RATIO: f64 = 3_497.901_8;
/// Sun/Uranus system mass ratio
pub const SUN_URANUS_MASS_RATIO: f64 = 22_902.98;
/// Sun/Neptune system mass ratio
pub const SUN_NEPTUNE_MASS_RATIO: f64 = 19_412.26;
