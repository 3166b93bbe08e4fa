//! Spacecraft Planet Kernel (SPK) format handling
//!
//! This module reads NASA SPICE SPK files which contain position and velocity
//! data for solar system bodies. Only the Chebyshev segment types used by the
//! JPL planetary ephemerides are supported: type 2 (position coefficients,
//! velocity by differentiation) and type 3 (separate velocity coefficients).
//!
//! Positions are in kilometers and velocities in kilometers per day.
//!
//! The SPK format is described in:
//! http://naif.jpl.nasa.gov/pub/naif/toolkit_docs/FORTRAN/req/spk.html

use crate::constants::{DAY_S, J2000};
use crate::jplephem::chebyshev::ChebyshevSeries;
use crate::jplephem::daf::Daf;
use crate::jplephem::errors::{JplephemError, Result};
use crate::jplephem::names::target_name;
use crate::time::calendar::format_date;
use nalgebra::Vector3;
use std::fmt;
use std::path::Path;

/// Convert seconds since J2000 to Julian date
pub fn seconds_to_jd(seconds: f64) -> f64 {
    J2000 + seconds / DAY_S
}

/// Convert Julian date to seconds since J2000
pub fn jd_to_seconds(jd: f64) -> f64 {
    (jd - J2000) * DAY_S
}

/// A segment in an SPK file containing data for one (center, target) pair
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Source of the segment (e.g., "DE-0430LE-0430")
    pub source: String,
    /// Initial epoch in seconds since J2000
    pub start_second: f64,
    /// Final epoch in seconds since J2000
    pub end_second: f64,
    /// Target body ID
    pub target: i32,
    /// Center body ID
    pub center: i32,
    /// Reference frame ID
    pub frame: i32,
    /// Data type (2: position only, 3: position and velocity)
    pub data_type: i32,
    /// First word address of the segment data
    pub start_i: usize,
    /// Last word address of the segment data
    pub end_i: usize,
}

impl Segment {
    /// Start Julian date (TDB)
    pub fn start_jd(&self) -> f64 {
        seconds_to_jd(self.start_second)
    }

    /// End Julian date (TDB)
    pub fn end_jd(&self) -> f64 {
        seconds_to_jd(self.end_second)
    }

    /// Whether this segment covers the given split TDB Julian date
    pub fn covers(&self, jd1: f64, jd2: f64) -> bool {
        let et = jd_to_seconds(jd1) + jd2 * DAY_S;
        et >= self.start_second && et <= self.end_second
    }

    /// Return a textual description of the segment
    pub fn describe(&self) -> String {
        let center = target_name(self.center).unwrap_or("Unknown center");
        let target = target_name(self.target).unwrap_or("Unknown target");
        format!(
            "{}..{}  Type {}  {} ({}) -> {} ({})",
            format_date(self.start_jd()),
            format_date(self.end_jd()),
            self.data_type,
            center,
            self.center,
            target,
            self.target
        )
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Directory at the tail of a type 2/3 segment
#[derive(Debug, Clone, Copy)]
struct Directory {
    /// Initial epoch (TDB seconds past J2000)
    init: f64,
    /// Interval length in seconds
    intlen: f64,
    /// Record size in double-precision words
    rsize: usize,
    /// Number of records
    n_records: usize,
}

/// Spacecraft Planet Kernel (SPK) file reader
#[derive(Debug)]
pub struct Spk {
    daf: Daf,
    /// Segments in file order
    pub segments: Vec<Segment>,
}

impl Spk {
    /// Open an SPK file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let daf = Daf::open(path)?;
        if daf.nd != 2 || daf.ni != 6 {
            return Err(JplephemError::InvalidFormat(format!(
                "SPK summaries need ND=2 and NI=6, found ND={} NI={}",
                daf.nd, daf.ni
            )));
        }

        let segments = daf
            .summaries()?
            .into_iter()
            .filter(|s| s.ints[4] > 0 && s.ints[5] >= s.ints[4])
            .map(|s| Segment {
                source: s.name,
                start_second: s.doubles[0],
                end_second: s.doubles[1],
                target: s.ints[0],
                center: s.ints[1],
                frame: s.ints[2],
                data_type: s.ints[3],
                start_i: s.ints[4] as usize,
                end_i: s.ints[5] as usize,
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Loaded {} segments from {}",
            segments.len(),
            daf.path.display()
        );

        Ok(Spk { daf, segments })
    }

    /// The underlying DAF file
    pub fn daf(&self) -> &Daf {
        &self.daf
    }

    /// Read the comments from the SPK file
    pub fn comments(&self) -> String {
        self.daf.comments()
    }

    /// Return the segment for the pair that covers the given date
    ///
    /// Later segments take precedence over earlier ones, as in SPICE.
    pub fn segment_at(&self, center: i32, target: i32, jd1: f64, jd2: f64) -> Result<&Segment> {
        let mut candidates = self
            .segments
            .iter()
            .rev()
            .filter(|s| s.center == center && s.target == target)
            .peekable();

        let newest = match candidates.peek() {
            Some(&segment) => segment,
            None => return Err(JplephemError::BodyNotFound { center, target }),
        };

        candidates
            .find(|s| s.covers(jd1, jd2))
            .ok_or(JplephemError::OutOfRangeError {
                jd: jd1 + jd2,
                start_jd: newest.start_jd(),
                end_jd: newest.end_jd(),
            })
    }

    /// Compute the position (km) of `target` relative to `center`
    pub fn compute(&self, center: i32, target: i32, jd1: f64, jd2: f64) -> Result<Vector3<f64>> {
        let segment = self.segment_at(center, target, jd1, jd2)?;
        Ok(self.evaluate(segment, jd1, jd2, false)?.0)
    }

    /// Compute position (km) and velocity (km/day) of `target` relative to `center`
    pub fn compute_and_differentiate(
        &self,
        center: i32,
        target: i32,
        jd1: f64,
        jd2: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let segment = self.segment_at(center, target, jd1, jd2)?;
        let (position, velocity) = self.evaluate(segment, jd1, jd2, true)?;
        Ok((position, velocity.unwrap_or_else(Vector3::zeros)))
    }

    fn directory(&self, segment: &Segment) -> Result<Directory> {
        if segment.end_i < segment.start_i + 3 {
            return Err(JplephemError::InvalidFormat(format!(
                "Segment {} is too small to hold a directory",
                segment
            )));
        }
        let tail = self.daf.read_array(segment.end_i - 3, segment.end_i)?;
        let directory = Directory {
            init: tail[0],
            intlen: tail[1],
            rsize: tail[2] as usize,
            n_records: tail[3] as usize,
        };

        let expected = directory
            .n_records
            .checked_mul(directory.rsize)
            .and_then(|n| n.checked_add(4));
        if directory.intlen <= 0.0
            || directory.rsize < 2
            || expected != Some(segment.end_i - segment.start_i + 1)
        {
            return Err(JplephemError::InvalidFormat(format!(
                "Inconsistent directory for segment {}: intlen={}, rsize={}, n={}",
                segment, directory.intlen, directory.rsize, directory.n_records
            )));
        }
        Ok(directory)
    }

    /// Evaluate a segment at a split TDB Julian date
    fn evaluate(
        &self,
        segment: &Segment,
        jd1: f64,
        jd2: f64,
        with_velocity: bool,
    ) -> Result<(Vector3<f64>, Option<Vector3<f64>>)> {
        let components = match segment.data_type {
            2 => 3,
            3 => 6,
            other => return Err(JplephemError::UnsupportedDataType(other)),
        };
        let dir = self.directory(segment)?;
        let n_coeffs = (dir.rsize - 2) / components;

        // Split the division so the large jd1 term keeps its precision
        let first = jd_to_seconds(jd1) - dir.init;
        let second = jd2 * DAY_S;
        let (index1, offset1) = (first.div_euclid(dir.intlen), first.rem_euclid(dir.intlen));
        let (index2, offset2) = (second.div_euclid(dir.intlen), second.rem_euclid(dir.intlen));
        let offset_sum = offset1 + offset2;
        let (index3, mut offset) = (
            offset_sum.div_euclid(dir.intlen),
            offset_sum.rem_euclid(dir.intlen),
        );
        let mut index = index1 + index2 + index3;

        // The final instant belongs to the last record
        if index == dir.n_records as f64 && offset == 0.0 {
            index -= 1.0;
            offset += dir.intlen;
        }
        if index < 0.0 || index >= dir.n_records as f64 {
            return Err(JplephemError::OutOfRangeError {
                jd: jd1 + jd2,
                start_jd: segment.start_jd(),
                end_jd: segment.end_jd(),
            });
        }

        let record_start = segment.start_i + index as usize * dir.rsize;
        let record = self
            .daf
            .read_array(record_start, record_start + dir.rsize - 1)?;
        let coefficients = &record[2..];
        let s = 2.0 * offset / dir.intlen - 1.0;
        let block = |k: usize| ChebyshevSeries::new(&coefficients[k * n_coeffs..(k + 1) * n_coeffs]);

        if !with_velocity {
            let position = Vector3::new(block(0).evaluate(s), block(1).evaluate(s), block(2).evaluate(s));
            return Ok((position, None));
        }

        let (x, dx) = block(0).evaluate_with_derivative(s);
        let (y, dy) = block(1).evaluate_with_derivative(s);
        let (z, dz) = block(2).evaluate_with_derivative(s);
        let position = Vector3::new(x, y, z);

        let velocity = if segment.data_type == 3 {
            // Stored velocity is km/s
            Vector3::new(block(3).evaluate(s), block(4).evaluate(s), block(5).evaluate(s)) * DAY_S
        } else {
            // ds/dt = 2 / intlen per second
            Vector3::new(dx, dy, dz) * (2.0 * DAY_S / dir.intlen)
        };

        Ok((position, Some(velocity)))
    }
}
