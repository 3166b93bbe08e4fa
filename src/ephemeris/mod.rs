//! Solar-system ephemeris providers
//!
//! The array wrappers in [`crate::solar_system`] never compute positions
//! themselves. They ask an implementation of [`SolarSystemEphemeris`] for raw
//! barycentric states, so tests can swap in a mock provider.
//!
//! [`StandardEphemeris`] is the provider used in practice. The selector
//! `"builtin"` routes to the analytical [`BuiltinEphemeris`] (AU, AU/day);
//! any other selector names a JPL SPK kernel read through
//! [`crate::jplephem`] (km, km/day).

pub mod builtin;

pub use builtin::{BuiltinBody, BuiltinEphemeris};

use crate::jplephem::Spk;
use crate::time::{broadcast_jd, time_to_jd1_jd2, Time};
use crate::units::LengthUnit;
use crate::{FastephemError, Result};
use lazy_static::lazy_static;
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Selector of the built-in analytical ephemeris
pub const BUILTIN: &str = "builtin";

/// Whether a selector names the built-in ephemeris, ignoring case
pub fn is_builtin(ephemeris: &str) -> bool {
    ephemeris.trim().eq_ignore_ascii_case(BUILTIN)
}

/// A body to look up: a name, or an explicit chain of kernel segments
///
/// A chain is a list of `(center, target)` NAIF id pairs whose positions are
/// summed, e.g. `[(0, 3), (3, 399)]` for the Earth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodySpec {
    Name(String),
    Chain(Vec<(i32, i32)>),
}

impl From<&str> for BodySpec {
    fn from(name: &str) -> Self {
        BodySpec::Name(name.to_string())
    }
}

impl From<String> for BodySpec {
    fn from(name: String) -> Self {
        BodySpec::Name(name)
    }
}

impl From<Vec<(i32, i32)>> for BodySpec {
    fn from(chain: Vec<(i32, i32)>) -> Self {
        BodySpec::Chain(chain)
    }
}

impl From<&[(i32, i32)]> for BodySpec {
    fn from(chain: &[(i32, i32)]) -> Self {
        BodySpec::Chain(chain.to_vec())
    }
}

impl fmt::Display for BodySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodySpec::Name(name) => f.write_str(name),
            BodySpec::Chain(chain) => {
                let links: Vec<String> = chain
                    .iter()
                    .map(|(center, target)| format!("{}->{}", center, target))
                    .collect();
                write!(f, "[{}]", links.join(", "))
            }
        }
    }
}

/// Barycentric state returned by a provider, in its native unit
///
/// Arrays have shape (n, 3). Velocity is per day.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub position: Array2<f64>,
    pub velocity: Option<Array2<f64>>,
    pub unit: LengthUnit,
}

impl BodyState {
    /// Rescale position and velocity to `unit`
    pub fn to_unit(self, unit: LengthUnit) -> BodyState {
        let from = self.unit;
        if from == unit {
            return self;
        }
        BodyState {
            position: from.convert_position(unit, self.position),
            velocity: self.velocity.map(|v| from.convert_velocity(unit, v)),
            unit,
        }
    }
}

/// Earth state from the built-in model, in AU and AU/day
#[derive(Debug, Clone, PartialEq)]
pub struct EarthState {
    pub barycentric_position: Array2<f64>,
    pub barycentric_velocity: Array2<f64>,
    pub heliocentric_position: Array2<f64>,
    pub heliocentric_velocity: Array2<f64>,
}

/// Source of raw solar-system body states at split TDB Julian dates
pub trait SolarSystemEphemeris {
    /// Barycentric position (and velocity when `get_velocity`) of `body`
    ///
    /// `jd1` and `jd2` are broadcast against each other. The returned state
    /// carries the provider's native unit.
    fn body_barycentric_posvel(
        &self,
        body: &BodySpec,
        jd1: ArrayView1<f64>,
        jd2: ArrayView1<f64>,
        ephemeris: &str,
        get_velocity: bool,
    ) -> Result<BodyState>;

    /// Earth state from the built-in model, always in AU and AU/day
    fn builtin_earth_state(&self, jd1: ArrayView1<f64>, jd2: ArrayView1<f64>)
        -> Result<EarthState>;

    /// Selector used when a caller does not name one
    fn default_ephemeris(&self) -> String {
        solar_system_ephemeris::get()
    }
}

/// Process-wide default ephemeris selector
pub mod solar_system_ephemeris {
    use super::BUILTIN;
    use lazy_static::lazy_static;
    use std::sync::RwLock;

    lazy_static! {
        static ref DEFAULT: RwLock<String> = RwLock::new(BUILTIN.to_string());
    }

    /// Current default selector, `"builtin"` unless changed
    pub fn get() -> String {
        match DEFAULT.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Change the default selector for the whole process
    ///
    /// The selector is stored as given, apart from surrounding whitespace, so
    /// kernel paths keep their case.
    pub fn set(ephemeris: &str) {
        let value = ephemeris.trim().to_string();
        log::debug!("Default solar-system ephemeris set to '{}'", value);
        match DEFAULT.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

lazy_static! {
    /// Kernel segment chains for named bodies, solar-system barycenter first
    static ref KERNEL_CHAINS: HashMap<&'static str, Vec<(i32, i32)>> = {
        let mut m = HashMap::new();
        m.insert("sun", vec![(0, 10)]);
        m.insert("mercury", vec![(0, 1), (1, 199)]);
        m.insert("venus", vec![(0, 2), (2, 299)]);
        m.insert("earth-moon-barycenter", vec![(0, 3)]);
        m.insert("earth", vec![(0, 3), (3, 399)]);
        m.insert("moon", vec![(0, 3), (3, 301)]);
        m.insert("mars", vec![(0, 4)]);
        m.insert("jupiter", vec![(0, 5)]);
        m.insert("saturn", vec![(0, 6)]);
        m.insert("uranus", vec![(0, 7)]);
        m.insert("neptune", vec![(0, 8)]);
        m.insert("pluto", vec![(0, 9)]);
        m
    };
}

/// Kernel chain for a named body, if it has one
pub fn kernel_chain(name: &str) -> Option<Vec<(i32, i32)>> {
    KERNEL_CHAINS
        .get(name.trim().to_ascii_lowercase().as_str())
        .cloned()
}

/// Provider that dispatches between the built-in model and SPK kernels
#[derive(Debug, Clone, Default)]
pub struct StandardEphemeris {
    builtin: BuiltinEphemeris,
    kernels: HashMap<String, PathBuf>,
    data_dir: Option<PathBuf>,
}

impl StandardEphemeris {
    /// Create a provider with no registered kernels
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for `<name>.bsp` kernels in this directory
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Register a kernel file under a selector name
    pub fn with_kernel<P: AsRef<Path>>(mut self, name: &str, path: P) -> Self {
        self.kernels
            .insert(name.trim().to_ascii_lowercase(), path.as_ref().to_path_buf());
        self
    }

    /// Resolve a non-builtin selector to a kernel file
    ///
    /// Registered names win, then `<data_dir>/<name>.bsp`, then the selector
    /// itself as a path.
    pub fn resolve_kernel(&self, ephemeris: &str) -> Result<PathBuf> {
        let trimmed = ephemeris.trim();
        let name = trimmed.to_ascii_lowercase();
        if let Some(path) = self.kernels.get(&name) {
            return Ok(path.clone());
        }
        if let Some(dir) = &self.data_dir {
            for stem in [trimmed, name.as_str()] {
                let candidate = dir.join(format!("{}.bsp", stem));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
        let direct = PathBuf::from(ephemeris.trim());
        if direct.is_file() {
            return Ok(direct);
        }
        Err(FastephemError::UnknownEphemeris(ephemeris.to_string()))
    }

    fn builtin_posvel(
        &self,
        body: &BodySpec,
        jd1: &Array1<f64>,
        jd2: &Array1<f64>,
        get_velocity: bool,
    ) -> Result<BodyState> {
        let target = match body {
            BodySpec::Name(name) => BuiltinBody::from_name(name),
            BodySpec::Chain(_) => None,
        }
        .ok_or_else(|| {
            FastephemError::UnknownBody(format!("{} is not in the builtin ephemeris", body))
        })?;

        let (position, velocity) = self.builtin.posvel(target, jd1.view(), jd2.view());
        Ok(BodyState {
            position,
            velocity: get_velocity.then_some(velocity),
            unit: LengthUnit::Au,
        })
    }

    fn kernel_posvel(
        &self,
        spk: &Spk,
        chain: &[(i32, i32)],
        jd1: &Array1<f64>,
        jd2: &Array1<f64>,
        get_velocity: bool,
    ) -> Result<BodyState> {
        let n = jd1.len();
        let mut position = Array2::zeros((n, 3));
        let mut velocity = Array2::zeros((n, 3));

        for (row, (&a, &b)) in jd1.iter().zip(jd2.iter()).enumerate() {
            for &(center, target) in chain {
                let (r, v) = if get_velocity {
                    spk.compute_and_differentiate(center, target, a, b)?
                } else {
                    (spk.compute(center, target, a, b)?, nalgebra::Vector3::zeros())
                };
                for k in 0..3 {
                    position[[row, k]] += r[k];
                    velocity[[row, k]] += v[k];
                }
            }
        }

        Ok(BodyState {
            position,
            velocity: get_velocity.then_some(velocity),
            unit: LengthUnit::Km,
        })
    }
}

impl SolarSystemEphemeris for StandardEphemeris {
    fn body_barycentric_posvel(
        &self,
        body: &BodySpec,
        jd1: ArrayView1<f64>,
        jd2: ArrayView1<f64>,
        ephemeris: &str,
        get_velocity: bool,
    ) -> Result<BodyState> {
        let (jd1, jd2) = broadcast_jd(jd1, jd2)?;

        if is_builtin(ephemeris) {
            log::debug!("Builtin ephemeris for {} at {} instants", body, jd1.len());
            return self.builtin_posvel(body, &jd1, &jd2, get_velocity);
        }

        let chain = match body {
            BodySpec::Name(name) => kernel_chain(name).ok_or_else(|| {
                FastephemError::UnknownBody(format!("{} has no kernel chain", name))
            })?,
            BodySpec::Chain(chain) => chain.clone(),
        };

        let path = self.resolve_kernel(ephemeris)?;
        log::debug!(
            "Kernel {} for {} at {} instants",
            path.display(),
            body,
            jd1.len()
        );
        let spk = Spk::open(&path)?;
        self.kernel_posvel(&spk, &chain, &jd1, &jd2, get_velocity)
    }

    fn builtin_earth_state(
        &self,
        jd1: ArrayView1<f64>,
        jd2: ArrayView1<f64>,
    ) -> Result<EarthState> {
        let (jd1, jd2) = broadcast_jd(jd1, jd2)?;
        Ok(self.builtin.earth(jd1.view(), jd2.view()))
    }
}

/// Barycentric position and velocity of `body` at `time`
///
/// The time is converted to TDB first. `None` uses the provider's default
/// ephemeris.
pub fn get_body_barycentric_posvel<E>(
    provider: &E,
    body: impl Into<BodySpec>,
    time: &Time,
    ephemeris: Option<&str>,
) -> Result<BodyState>
where
    E: SolarSystemEphemeris + ?Sized,
{
    let ephemeris = ephemeris
        .map(str::to_string)
        .unwrap_or_else(|| provider.default_ephemeris());
    let (jd1, jd2) = time_to_jd1_jd2(time, "tdb")?;
    provider.body_barycentric_posvel(&body.into(), jd1.view(), jd2.view(), &ephemeris, true)
}
