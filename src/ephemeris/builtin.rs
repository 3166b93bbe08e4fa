//! Built-in low-precision analytical ephemeris
//!
//! Planets and the Earth-Moon barycenter follow the JPL "Keplerian Elements for
//! Approximate Positions of the Major Planets" (Standish, 1800-2050 fit). The
//! Sun's offset from the barycenter comes from the planetary mass ratios, and
//! the Moon from the Astronomical Almanac low-precision series, which also
//! splits the Earth from the Earth-Moon barycenter.
//!
//! Output is in AU and AU/day on ICRF-aligned equatorial axes. Accuracy is of
//! order 1e-4 AU for the inner planets, enough for aberration-level work and
//! tests, not for astrometry.

use crate::constants::{
    DAYS_PER_CENTURY, DEG2RAD, EARTH_MOON_MASS_RATIO, EARTH_RADIUS_KM, J2000, OBLIQUITY_J2000,
    SUN_EMB_MASS_RATIO, SUN_JUPITER_MASS_RATIO, SUN_MARS_MASS_RATIO, SUN_MERCURY_MASS_RATIO,
    SUN_NEPTUNE_MASS_RATIO, SUN_SATURN_MASS_RATIO, SUN_URANUS_MASS_RATIO, SUN_VENUS_MASS_RATIO,
    AU_KM,
};
use super::EarthState;
use nalgebra::{Rotation3, Vector3};
use ndarray::{Array2, ArrayView1};

/// Position and velocity of one body at one instant (AU, AU/day)
type PosVel = (Vector3<f64>, Vector3<f64>);

/// Mean elements at J2000 and their rates per Julian century
struct PlanetElements {
    /// Semi-major axis (AU)
    a: (f64, f64),
    /// Eccentricity
    e: (f64, f64),
    /// Inclination (deg)
    i: (f64, f64),
    /// Mean longitude (deg)
    l: (f64, f64),
    /// Longitude of perihelion (deg)
    varpi: (f64, f64),
    /// Longitude of the ascending node (deg)
    node: (f64, f64),
    /// Sun mass over planet (system) mass
    mass_ratio: f64,
}

const MERCURY: usize = 0;
const VENUS: usize = 1;
const EMB: usize = 2;
const MARS: usize = 3;
const JUPITER: usize = 4;
const SATURN: usize = 5;
const URANUS: usize = 6;
const NEPTUNE: usize = 7;

#[rustfmt::skip]
const PLANETS: [PlanetElements; 8] = [
    PlanetElements {
        a: (0.387_099_27, 0.000_000_37), e: (0.205_635_93, 0.000_019_06),
        i: (7.004_979_02, -0.005_947_49), l: (252.250_323_50, 149_472.674_111_75),
        varpi: (77.457_796_28, 0.160_476_89), node: (48.330_765_93, -0.125_340_81),
        mass_ratio: SUN_MERCURY_MASS_RATIO,
    },
    PlanetElements {
        a: (0.723_335_66, 0.000_003_90), e: (0.006_776_72, -0.000_041_07),
        i: (3.394_676_05, -0.000_788_90), l: (181.979_099_50, 58_517.815_387_29),
        varpi: (131.602_467_18, 0.002_683_29), node: (76.679_842_55, -0.277_694_18),
        mass_ratio: SUN_VENUS_MASS_RATIO,
    },
    PlanetElements {
        a: (1.000_002_61, 0.000_005_62), e: (0.016_711_23, -0.000_043_92),
        i: (-0.000_015_31, -0.012_946_68), l: (100.464_571_66, 35_999.372_449_81),
        varpi: (102.937_681_93, 0.323_273_64), node: (0.0, 0.0),
        mass_ratio: SUN_EMB_MASS_RATIO,
    },
    PlanetElements {
        a: (1.523_710_34, 0.000_018_47), e: (0.093_394_10, 0.000_078_82),
        i: (1.849_691_42, -0.008_131_31), l: (-4.553_432_05, 19_140.302_684_99),
        varpi: (-23.943_629_59, 0.444_410_88), node: (49.559_538_91, -0.292_573_43),
        mass_ratio: SUN_MARS_MASS_RATIO,
    },
    PlanetElements {
        a: (5.202_887_00, -0.000_116_07), e: (0.048_386_24, -0.000_132_53),
        i: (1.304_396_95, -0.001_837_14), l: (34.396_440_51, 3_034.746_127_75),
        varpi: (14.728_479_83, 0.212_526_68), node: (100.473_909_09, 0.204_691_06),
        mass_ratio: SUN_JUPITER_MASS_RATIO,
    },
    PlanetElements {
        a: (9.536_675_94, -0.001_250_60), e: (0.053_861_79, -0.000_509_91),
        i: (2.485_991_87, 0.001_936_09), l: (49.954_244_23, 1_222.493_622_01),
        varpi: (92.598_878_31, -0.418_972_16), node: (113.662_424_48, -0.288_677_94),
        mass_ratio: SUN_SATURN_MASS_RATIO,
    },
    PlanetElements {
        a: (19.189_164_64, -0.001_961_76), e: (0.047_257_44, -0.000_043_97),
        i: (0.772_637_83, -0.002_429_39), l: (313.238_104_51, 428.482_027_85),
        varpi: (170.954_276_30, 0.408_052_81), node: (74.016_925_03, 0.042_405_89),
        mass_ratio: SUN_URANUS_MASS_RATIO,
    },
    PlanetElements {
        a: (30.069_922_76, 0.000_262_91), e: (0.008_590_48, 0.000_051_05),
        i: (1.770_043_47, 0.000_353_72), l: (-55.120_029_69, 218.459_453_25),
        varpi: (44.964_762_27, -0.322_414_64), node: (131.784_225_74, -0.005_086_64),
        mass_ratio: SUN_NEPTUNE_MASS_RATIO,
    },
];

/// Bodies the built-in ephemeris can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinBody {
    Sun,
    Mercury,
    Venus,
    EarthMoonBarycenter,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl BuiltinBody {
    /// Look up a body by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        let body = match name.trim().to_ascii_lowercase().as_str() {
            "sun" => BuiltinBody::Sun,
            "mercury" => BuiltinBody::Mercury,
            "venus" => BuiltinBody::Venus,
            "earth-moon-barycenter" | "earth-moon barycenter" | "emb" => {
                BuiltinBody::EarthMoonBarycenter
            }
            "earth" => BuiltinBody::Earth,
            "moon" => BuiltinBody::Moon,
            "mars" => BuiltinBody::Mars,
            "jupiter" => BuiltinBody::Jupiter,
            "saturn" => BuiltinBody::Saturn,
            "uranus" => BuiltinBody::Uranus,
            "neptune" => BuiltinBody::Neptune,
            _ => return None,
        };
        Some(body)
    }
}

fn rotation(axis: &nalgebra::Unit<Vector3<f64>>, angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(axis, angle)
}

/// Solve Kepler's equation for the eccentric anomaly
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ea = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (mean_anomaly - (ea - e * ea.sin())) / (1.0 - e * ea.cos());
        ea += delta;
        if delta.abs() < 1e-14 {
            break;
        }
    }
    ea
}

impl PlanetElements {
    /// Heliocentric equatorial state `t` days after J2000
    fn state(&self, t: f64) -> PosVel {
        let c = t / DAYS_PER_CENTURY;
        let at = |(base, rate): (f64, f64)| base + rate * c;

        let a = at(self.a);
        let e = at(self.e);
        let incl = at(self.i) * DEG2RAD;
        let varpi = at(self.varpi);
        let node = at(self.node);
        let omega = (varpi - node) * DEG2RAD;
        let mean_anomaly = ((at(self.l) - varpi + 180.0).rem_euclid(360.0) - 180.0) * DEG2RAD;
        let mean_motion = (self.l.1 - self.varpi.1) * DEG2RAD / DAYS_PER_CENTURY;

        let ea = eccentric_anomaly(mean_anomaly, e);
        let (sin_e, cos_e) = ea.sin_cos();
        let root = (1.0 - e * e).sqrt();
        let ea_dot = mean_motion / (1.0 - e * cos_e);

        let r = Vector3::new(a * (cos_e - e), a * root * sin_e, 0.0);
        let v = Vector3::new(-a * sin_e * ea_dot, a * root * cos_e * ea_dot, 0.0);

        let to_equator = rotation(&Vector3::x_axis(), OBLIQUITY_J2000)
            * rotation(&Vector3::z_axis(), node * DEG2RAD)
            * rotation(&Vector3::x_axis(), incl)
            * rotation(&Vector3::z_axis(), omega);

        (to_equator * r, to_equator * v)
    }
}

/// Geocentric equatorial Moon position (AU) `t` days after J2000
fn moon_position(t: f64) -> Vector3<f64> {
    let c = t / DAYS_PER_CENTURY;
    let sin = |deg: f64| (deg * DEG2RAD).sin();
    let cos = |deg: f64| (deg * DEG2RAD).cos();

    // Ecliptic of date, brought back to J2000 by general precession in longitude
    let lambda = 218.32 + 481_267.881 * c
        + 6.29 * sin(135.0 + 477_198.87 * c)
        - 1.27 * sin(259.3 - 413_335.36 * c)
        + 0.66 * sin(235.7 + 890_534.22 * c)
        + 0.21 * sin(269.9 + 954_397.74 * c)
        - 0.19 * sin(357.5 + 35_999.05 * c)
        - 0.11 * sin(186.5 + 966_404.03 * c)
        - 1.396_971 * c;
    let beta = 5.13 * sin(93.3 + 483_202.02 * c)
        + 0.28 * sin(228.2 + 960_400.89 * c)
        - 0.28 * sin(318.3 + 6_003.15 * c)
        - 0.17 * sin(217.6 - 407_332.21 * c);
    let parallax = 0.9508
        + 0.0518 * cos(135.0 + 477_198.87 * c)
        + 0.0095 * cos(259.3 - 413_335.36 * c)
        + 0.0078 * cos(235.7 + 890_534.22 * c)
        + 0.0028 * cos(269.9 + 954_397.74 * c);

    let distance = EARTH_RADIUS_KM / sin(parallax) / AU_KM;
    let ecliptic = Vector3::new(
        cos(beta) * cos(lambda),
        cos(beta) * sin(lambda),
        sin(beta),
    ) * distance;

    rotation(&Vector3::x_axis(), OBLIQUITY_J2000) * ecliptic
}

/// Geocentric Moon state, velocity by central difference
fn moon_state(t: f64) -> PosVel {
    const STEP: f64 = 0.01;
    let velocity = (moon_position(t + STEP) - moon_position(t - STEP)) / (2.0 * STEP);
    (moon_position(t), velocity)
}

/// Every body the model knows at one instant, barycentric
struct Snapshot {
    heliocentric: [PosVel; 8],
    sun: PosVel,
    moon_geocentric: PosVel,
}

impl Snapshot {
    fn at(t: f64) -> Self {
        let heliocentric: [PosVel; 8] = std::array::from_fn(|k| PLANETS[k].state(t));

        let mut weighted = (Vector3::zeros(), Vector3::zeros());
        let mut total = 1.0;
        for (planet, (r, v)) in PLANETS.iter().zip(heliocentric.iter()) {
            let mu = 1.0 / planet.mass_ratio;
            weighted.0 += r * mu;
            weighted.1 += v * mu;
            total += mu;
        }
        let sun = (-weighted.0 / total, -weighted.1 / total);

        Snapshot {
            heliocentric,
            sun,
            moon_geocentric: moon_state(t),
        }
    }

    fn planet(&self, index: usize) -> PosVel {
        let (r, v) = self.heliocentric[index];
        (r + self.sun.0, v + self.sun.1)
    }

    fn earth(&self) -> PosVel {
        let (r, v) = self.planet(EMB);
        let (mr, mv) = self.moon_geocentric;
        let share = 1.0 / (1.0 + EARTH_MOON_MASS_RATIO);
        (r - mr * share, v - mv * share)
    }

    fn moon(&self) -> PosVel {
        let (r, v) = self.planet(EMB);
        let (mr, mv) = self.moon_geocentric;
        let share = EARTH_MOON_MASS_RATIO / (1.0 + EARTH_MOON_MASS_RATIO);
        (r + mr * share, v + mv * share)
    }

    fn body(&self, body: BuiltinBody) -> PosVel {
        match body {
            BuiltinBody::Sun => self.sun,
            BuiltinBody::Mercury => self.planet(MERCURY),
            BuiltinBody::Venus => self.planet(VENUS),
            BuiltinBody::EarthMoonBarycenter => self.planet(EMB),
            BuiltinBody::Earth => self.earth(),
            BuiltinBody::Moon => self.moon(),
            BuiltinBody::Mars => self.planet(MARS),
            BuiltinBody::Jupiter => self.planet(JUPITER),
            BuiltinBody::Saturn => self.planet(SATURN),
            BuiltinBody::Uranus => self.planet(URANUS),
            BuiltinBody::Neptune => self.planet(NEPTUNE),
        }
    }
}

fn days_since_j2000(jd1: f64, jd2: f64) -> f64 {
    (jd1 - J2000) + jd2
}

fn put_row(array: &mut Array2<f64>, row: usize, value: &Vector3<f64>) {
    array[[row, 0]] = value.x;
    array[[row, 1]] = value.y;
    array[[row, 2]] = value.z;
}

/// The built-in analytical ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEphemeris;

impl BuiltinEphemeris {
    /// Create the built-in ephemeris
    pub fn new() -> Self {
        BuiltinEphemeris
    }

    /// Barycentric state of one body at one split TDB Julian date
    pub fn state(&self, body: BuiltinBody, jd1: f64, jd2: f64) -> (Vector3<f64>, Vector3<f64>) {
        Snapshot::at(days_since_j2000(jd1, jd2)).body(body)
    }

    /// Barycentric positions and velocities, shape (n, 3), for equal-length date parts
    pub fn posvel(
        &self,
        body: BuiltinBody,
        jd1: ArrayView1<f64>,
        jd2: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let n = jd1.len();
        let mut position = Array2::zeros((n, 3));
        let mut velocity = Array2::zeros((n, 3));
        for (row, (&a, &b)) in jd1.iter().zip(jd2.iter()).enumerate() {
            let (r, v) = self.state(body, a, b);
            put_row(&mut position, row, &r);
            put_row(&mut velocity, row, &v);
        }
        (position, velocity)
    }

    /// Earth barycentric and heliocentric states for equal-length date parts
    pub fn earth(&self, jd1: ArrayView1<f64>, jd2: ArrayView1<f64>) -> EarthState {
        let n = jd1.len();
        let mut earth = EarthState {
            barycentric_position: Array2::zeros((n, 3)),
            barycentric_velocity: Array2::zeros((n, 3)),
            heliocentric_position: Array2::zeros((n, 3)),
            heliocentric_velocity: Array2::zeros((n, 3)),
        };
        for (row, (&a, &b)) in jd1.iter().zip(jd2.iter()).enumerate() {
            let snapshot = Snapshot::at(days_since_j2000(a, b));
            let (r, v) = snapshot.earth();
            let (sr, sv) = snapshot.sun;
            put_row(&mut earth.barycentric_position, row, &r);
            put_row(&mut earth.barycentric_velocity, row, &v);
            put_row(&mut earth.heliocentric_position, row, &(r - sr));
            put_row(&mut earth.heliocentric_velocity, row, &(v - sv));
        }
        earth
    }
}
