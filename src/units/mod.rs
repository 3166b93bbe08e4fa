//! Unit conversions between astronomical-unit and kilometer quantities
//!
//! Every conversion accepts anything that views as an `f64` array (owned
//! arrays, views, slices, vectors) and returns a newly allocated array of the
//! same shape. Velocities "per day" share the length factor because the time
//! unit does not change.

use crate::accel::{maybe_parallel, Accelerated};
use crate::{FastephemError, Result};
use lazy_static::lazy_static;
use ndarray::{Array, ArrayView, AsArray, Dimension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use crate::constants::{AU_KM, DAY_S};

/// Length unit attached to raw position arrays; velocities are this unit per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Astronomical units
    Au,
    /// Kilometers
    Km,
}

impl LengthUnit {
    /// Short lowercase name used when parsing
    pub fn name(&self) -> &'static str {
        match self {
            LengthUnit::Au => "au",
            LengthUnit::Km => "km",
        }
    }

    /// Rescale a position array from `self` to `to`
    pub fn convert_position<D: Dimension>(
        self,
        to: LengthUnit,
        value: Array<f64, D>,
    ) -> Array<f64, D> {
        match (self, to) {
            (LengthUnit::Au, LengthUnit::Km) => au_to_km(&value),
            (LengthUnit::Km, LengthUnit::Au) => km_to_au(&value),
            _ => value,
        }
    }

    /// Rescale a per-day velocity array from `self` to `to`
    pub fn convert_velocity<D: Dimension>(
        self,
        to: LengthUnit,
        value: Array<f64, D>,
    ) -> Array<f64, D> {
        match (self, to) {
            (LengthUnit::Au, LengthUnit::Km) => au_per_day_to_km_per_day(&value),
            (LengthUnit::Km, LengthUnit::Au) => km_per_day_to_au_per_day(&value),
            _ => value,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = FastephemError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "au" => Ok(LengthUnit::Au),
            "km" => Ok(LengthUnit::Km),
            _ => Err(FastephemError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn scaled<'a, V, D>(value: V, factor: f64) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    let view: ArrayView<'a, f64, D> = value.into();
    view.mapv(|x| x * factor)
}

fn divided<'a, V, D>(value: V, divisor: f64) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    let view: ArrayView<'a, f64, D> = value.into();
    view.mapv(|x| x / divisor)
}

/// Astronomical units to kilometers
pub fn au_to_km<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    scaled(value, AU_KM)
}

/// Kilometers to astronomical units
pub fn km_to_au<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    divided(value, AU_KM)
}

/// AU/day to km/day
pub fn au_per_day_to_km_per_day<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    scaled(value, AU_KM)
}

/// km/day to AU/day
pub fn km_per_day_to_au_per_day<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    divided(value, AU_KM)
}

/// km/s to AU/day
pub fn km_per_s_to_au_per_day<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    scaled(value, DAY_S / AU_KM)
}

/// AU/day to km/s
pub fn au_per_day_to_km_per_s<'a, V, D>(value: V) -> Array<f64, D>
where
    V: AsArray<'a, f64, D>,
    D: Dimension,
{
    scaled(value, AU_KM / DAY_S)
}

/// Element-wise kernel type used by the parallel conversions
pub type ScalarKernel = Accelerated<fn(f64) -> f64>;

lazy_static! {
    /// Parallel [`au_to_km`], when acceleration is available
    pub static ref AU_TO_KM_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x * AU_KM) as fn(f64) -> f64);
    /// Parallel [`km_to_au`], when acceleration is available
    pub static ref KM_TO_AU_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x / AU_KM) as fn(f64) -> f64);
    /// Parallel [`au_per_day_to_km_per_day`], when acceleration is available
    pub static ref AU_PER_DAY_TO_KM_PER_DAY_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x * AU_KM) as fn(f64) -> f64);
    /// Parallel [`km_per_day_to_au_per_day`], when acceleration is available
    pub static ref KM_PER_DAY_TO_AU_PER_DAY_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x / AU_KM) as fn(f64) -> f64);
    /// Parallel [`km_per_s_to_au_per_day`], when acceleration is available
    pub static ref KM_PER_S_TO_AU_PER_DAY_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x * (DAY_S / AU_KM)) as fn(f64) -> f64);
    /// Parallel [`au_per_day_to_km_per_s`], when acceleration is available
    pub static ref AU_PER_DAY_TO_KM_PER_S_PARALLEL: Option<ScalarKernel> =
        maybe_parallel((|x: f64| x * (AU_KM / DAY_S)) as fn(f64) -> f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::HAS_PARALLEL;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{arr1, arr2, Array2};
    use rand::Rng;
    use rstest::rstest;

    #[test]
    fn test_basic_unit_conversions() {
        let values = arr1(&[0.0, 1.0, 2.5]);
        let km = au_to_km(&values);
        let au = km_to_au(&km);
        for (a, b) in au.iter().zip(values.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-14);
        }

        let kms = arr1(&[0.0, 1.0, 12.3]);
        let au_per_day = km_per_s_to_au_per_day(&kms);
        let km_per_s = au_per_day_to_km_per_s(&au_per_day);
        for (a, b) in km_per_s.iter().zip(kms.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-14);
        }
    }

    #[test]
    fn test_km_round_trip_from_slice() {
        let values = [0.0, 1.0, 2.5];
        let back = au_to_km(&km_to_au(&values[..]));
        assert_relative_eq!(back[0], 0.0);
        assert_relative_eq!(back[1], 1.0, max_relative = 1e-14);
        assert_relative_eq!(back[2], 2.5, max_relative = 1e-14);
    }

    #[rstest]
    #[case::position(|v: &Array2<f64>| au_to_km(v), |v: &Array2<f64>| km_to_au(v))]
    #[case::velocity_per_day(
        |v: &Array2<f64>| au_per_day_to_km_per_day(v),
        |v: &Array2<f64>| km_per_day_to_au_per_day(v)
    )]
    #[case::speed(
        |v: &Array2<f64>| au_per_day_to_km_per_s(v),
        |v: &Array2<f64>| km_per_s_to_au_per_day(v)
    )]
    fn test_random_round_trip(
        #[case] forward: fn(&Array2<f64>) -> Array2<f64>,
        #[case] backward: fn(&Array2<f64>) -> Array2<f64>,
    ) {
        let mut rng = rand::thread_rng();
        let values = Array2::from_shape_fn((16, 3), |_| rng.gen_range(-50.0..50.0));
        let back = backward(&forward(&values));
        assert_eq!(back.shape(), values.shape());
        for (a, b) in back.iter().zip(values.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linearity() {
        let x = 3.7;
        let y = -1.25;
        let out = au_to_km(&arr1(&[x, y]));
        assert_relative_eq!(out[0] / out[1], x / y, max_relative = 1e-14);
    }

    #[test]
    fn test_known_factors() {
        let one = arr1(&[1.0]);
        assert_relative_eq!(au_to_km(&one)[0], 149_597_870.7);
        assert_relative_eq!(au_per_day_to_km_per_day(&one)[0], 149_597_870.7);
        // 1 AU/day is about 1731.46 km/s
        assert_relative_eq!(au_per_day_to_km_per_s(&one)[0], 1731.456_836_8, epsilon = 1e-6);
    }

    #[test]
    fn test_shape_is_preserved() {
        let pv = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let km = au_to_km(pv.view());
        assert_eq!(km.shape(), &[2, 3]);
        assert_relative_eq!(km[[1, 0]], 4.0 * AU_KM);
    }

    #[rstest]
    #[case("au", LengthUnit::Au)]
    #[case("km", LengthUnit::Km)]
    fn test_parse_length_unit(#[case] name: &str, #[case] expected: LengthUnit) {
        assert_eq!(name.parse::<LengthUnit>().unwrap(), expected);
    }

    #[rstest]
    #[case("KM")]
    #[case("Au")]
    #[case(" au ")]
    fn test_unit_names_are_exact(#[case] name: &str) {
        let err = name.parse::<LengthUnit>().unwrap_err();
        assert!(matches!(err, FastephemError::InvalidUnit(ref u) if u == name));
    }

    #[test]
    fn test_invalid_unit_names_offender() {
        let err = "miles".parse::<LengthUnit>().unwrap_err();
        assert!(matches!(err, FastephemError::InvalidUnit(ref u) if u == "miles"));
        assert!(err.to_string().contains("'miles'"));
    }

    #[test]
    fn test_convert_dispatch() {
        let pos = arr1(&[2.0]);
        let same = LengthUnit::Km.convert_position(LengthUnit::Km, pos.clone());
        assert_eq!(same, pos);

        let km = LengthUnit::Au.convert_position(LengthUnit::Km, pos.clone());
        assert_relative_eq!(km[0], 2.0 * AU_KM);

        let vel = LengthUnit::Km.convert_velocity(LengthUnit::Au, arr1(&[AU_KM]));
        assert_relative_eq!(vel[0], 1.0);
    }

    #[test]
    fn test_parallel_variants_match_serial() {
        let kernels = [
            &*AU_TO_KM_PARALLEL,
            &*KM_TO_AU_PARALLEL,
            &*AU_PER_DAY_TO_KM_PER_DAY_PARALLEL,
            &*KM_PER_DAY_TO_AU_PER_DAY_PARALLEL,
            &*KM_PER_S_TO_AU_PER_DAY_PARALLEL,
            &*AU_PER_DAY_TO_KM_PER_S_PARALLEL,
        ];
        assert_eq!(kernels.iter().all(|k| k.is_some()), *HAS_PARALLEL);

        if let Some(kernel) = AU_TO_KM_PARALLEL.as_ref() {
            let values = arr2(&[[0.5, 1.0, 1.5], [2.0, 2.5, 3.0]]);
            let fast = kernel.call(&values);
            let slow = au_to_km(&values);
            assert_eq!(fast, slow);
        }
        if let Some(kernel) = KM_PER_S_TO_AU_PER_DAY_PARALLEL.as_ref() {
            let values = arr1(&[0.0, 1.0, 12.3]);
            assert_eq!(kernel.call(&values), km_per_s_to_au_per_day(&values));
        }
    }
}
