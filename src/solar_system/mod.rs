//! Raw position and velocity arrays for solar-system bodies
//!
//! These wrappers take a split TDB Julian date, ask an ephemeris provider for
//! barycentric states, and hand back plain `(n, 3)` arrays in the requested
//! unit ("au" or "km"). Velocities are always per day.

use crate::ephemeris::{is_builtin, BodySpec, SolarSystemEphemeris};
use crate::units::{
    au_per_day_to_km_per_day, au_to_km, km_per_day_to_au_per_day, km_to_au, LengthUnit,
};
use crate::{FastephemError, Result};
use ndarray::{Array2, ArrayView1};

fn resolve_ephemeris<E>(provider: &E, ephemeris: Option<&str>) -> String
where
    E: SolarSystemEphemeris + ?Sized,
{
    ephemeris
        .map(str::to_string)
        .unwrap_or_else(|| provider.default_ephemeris())
}

fn rescale(
    native: LengthUnit,
    unit: LengthUnit,
    position: Array2<f64>,
    velocity: Array2<f64>,
) -> (Array2<f64>, Array2<f64>) {
    match (native, unit) {
        (LengthUnit::Km, LengthUnit::Au) => {
            log::debug!("Rescaling km to au");
            (km_to_au(&position), km_per_day_to_au_per_day(&velocity))
        }
        (LengthUnit::Au, LengthUnit::Km) => {
            log::debug!("Rescaling au to km");
            (au_to_km(&position), au_per_day_to_km_per_day(&velocity))
        }
        _ => (position, velocity),
    }
}

/// Barycentric position and velocity arrays of `body` at TDB `jd1 + jd2`
///
/// `ephemeris` of `None` uses the provider's default selector. Positions are
/// in `unit`, velocities in `unit` per day. Any unit other than "au" or "km"
/// fails with [`FastephemError::InvalidUnit`] before the provider is asked.
pub fn get_body_barycentric_posvel_jd<E>(
    provider: &E,
    body: impl Into<BodySpec>,
    jd1: ArrayView1<f64>,
    jd2: ArrayView1<f64>,
    ephemeris: Option<&str>,
    unit: &str,
) -> Result<(Array2<f64>, Array2<f64>)>
where
    E: SolarSystemEphemeris + ?Sized,
{
    let unit: LengthUnit = unit.parse()?;
    let ephemeris = resolve_ephemeris(provider, ephemeris);
    let body = body.into();

    let state = provider.body_barycentric_posvel(&body, jd1, jd2, &ephemeris, true)?;
    let velocity = state.velocity.ok_or_else(|| {
        FastephemError::CalculationError(format!("no velocity returned for {}", body))
    })?;
    Ok(rescale(state.unit, unit, state.position, velocity))
}

/// Earth barycentric position, barycentric velocity and heliocentric position
///
/// With the "builtin" ephemeris the provider's dedicated Earth routine is
/// used. Otherwise Earth and Sun are fetched separately and the Sun's position
/// is brought into Earth's unit before subtracting.
pub fn prepare_earth_position_vel_jd<E>(
    provider: &E,
    jd1: ArrayView1<f64>,
    jd2: ArrayView1<f64>,
    ephemeris: Option<&str>,
    unit: &str,
) -> Result<(Array2<f64>, Array2<f64>, Array2<f64>)>
where
    E: SolarSystemEphemeris + ?Sized,
{
    let unit: LengthUnit = unit.parse()?;
    let ephemeris = resolve_ephemeris(provider, ephemeris);

    let (position, velocity, heliocentric, native) = if is_builtin(&ephemeris) {
        let earth = provider.builtin_earth_state(jd1, jd2)?;
        (
            earth.barycentric_position,
            earth.barycentric_velocity,
            earth.heliocentric_position,
            LengthUnit::Au,
        )
    } else {
        let earth = provider.body_barycentric_posvel(
            &BodySpec::from("earth"),
            jd1,
            jd2,
            &ephemeris,
            true,
        )?;
        let sun = provider.body_barycentric_posvel(
            &BodySpec::from("sun"),
            jd1,
            jd2,
            &ephemeris,
            false,
        )?;
        let velocity = earth.velocity.ok_or_else(|| {
            FastephemError::CalculationError("no velocity returned for earth".to_string())
        })?;
        let sun_position = sun.unit.convert_position(earth.unit, sun.position);
        if sun_position.shape() != earth.position.shape() {
            return Err(FastephemError::CalculationError(format!(
                "earth positions have shape {:?} but sun positions {:?}",
                earth.position.shape(),
                sun_position.shape()
            )));
        }
        let heliocentric = &earth.position - &sun_position;
        (earth.position, velocity, heliocentric, earth.unit)
    };

    let (position, velocity) = rescale(native, unit, position, velocity);
    let heliocentric = native.convert_position(unit, heliocentric);
    Ok((position, velocity, heliocentric))
}
