//! Double Array File format module for reading SPICE DAF files
//!
//! A DAF is a sequence of 1024-byte records. Record 1 is the file record,
//! records after it up to `fward` hold comments, and the summary/name record
//! pairs form a doubly linked list starting at `fward`. Arrays are addressed in
//! 1-based 8-byte words.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use memmap2::Mmap;

use crate::jplephem::errors::{io_err, JplephemError, Result};

/// Size of a DAF record (bytes)
const RECORD_SIZE: usize = 1024;
/// Size of a double-precision value (bytes)
const DOUBLE_SIZE: usize = 8;
/// Bound on the summary record chain
const MAX_SUMMARY_RECORDS: usize = 10_000;

/// DAF file endianness
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// One array summary: its name plus the double and integer components
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// Segment name, trailing blanks removed
    pub name: String,
    /// The ND double-precision components
    pub doubles: Vec<f64>,
    /// The NI integer components
    pub ints: Vec<i32>,
}

/// Double Array File (DAF) reader over a read-only memory map
pub struct Daf {
    /// Path to the DAF file
    pub path: PathBuf,
    map: Mmap,
    /// File version word, e.g. "DAF/SPK"
    pub locidw: String,
    /// Number of double-precision components per summary
    pub nd: usize,
    /// Number of integer components per summary
    pub ni: usize,
    /// Internal file name
    pub ifname: String,
    /// Forward pointer to first summary record
    pub fward: usize,
    /// Backward pointer to last summary record
    pub bward: usize,
    /// First free address
    pub free: usize,
    /// Byte order (endianness)
    pub endian: Endian,
}

impl Daf {
    /// Open a DAF file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| io_err(&path, e))?;
        // SAFETY: the mapping is read-only and kernel files are not modified while open.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| io_err(&path, e))?;

        if map.len() < RECORD_SIZE {
            return Err(JplephemError::InvalidFormat(format!(
                "{} is too short to hold a DAF file record",
                path.display()
            )));
        }

        let header = &map[..RECORD_SIZE];
        let locidw = String::from_utf8_lossy(&header[0..8]).trim_end().to_string();
        if !locidw.starts_with("DAF/") && !locidw.starts_with("NAIF/DAF") {
            return Err(JplephemError::InvalidFormat(format!(
                "Unrecognized DAF ID word {:?}",
                locidw
            )));
        }

        let endian = match &header[88..96] {
            b"LTL-IEEE" => Endian::Little,
            b"BIG-IEEE" => Endian::Big,
            // Pre-LOCFMT files: ND is a small positive number in the right byte order
            _ if (1..=124).contains(&LittleEndian::read_i32(&header[8..12])) => Endian::Little,
            _ => Endian::Big,
        };

        let read_i32 = |bytes: &[u8]| match endian {
            Endian::Little => LittleEndian::read_i32(bytes),
            Endian::Big => BigEndian::read_i32(bytes),
        };
        let nd = read_i32(&header[8..12]);
        let ni = read_i32(&header[12..16]);
        let fward = read_i32(&header[76..80]);
        let bward = read_i32(&header[80..84]);
        let free = read_i32(&header[84..88]);

        if nd <= 0 || ni <= 0 || fward <= 0 || bward <= 0 || free <= 0 {
            return Err(JplephemError::InvalidFormat(format!(
                "Invalid DAF header: nd={}, ni={}, fward={}, bward={}, free={}",
                nd, ni, fward, bward, free
            )));
        }

        let daf = Daf {
            path,
            ifname: String::from_utf8_lossy(&header[16..76]).trim_end().to_string(),
            map,
            locidw,
            nd: nd as usize,
            ni: ni as usize,
            fward: fward as usize,
            bward: bward as usize,
            free: free as usize,
            endian,
        };

        log::debug!(
            "Opened DAF {}: locidw={}, nd={}, ni={}, fward={}, endian={:?}",
            daf.path.display(),
            daf.locidw,
            daf.nd,
            daf.ni,
            daf.fward,
            daf.endian
        );

        Ok(daf)
    }

    /// Number of 8-byte words in one summary
    fn summary_length(&self) -> usize {
        self.nd + (self.ni + 1) / 2
    }

    fn read_f64(&self, bytes: &[u8]) -> f64 {
        match self.endian {
            Endian::Little => LittleEndian::read_f64(bytes),
            Endian::Big => BigEndian::read_f64(bytes),
        }
    }

    fn read_i32(&self, bytes: &[u8]) -> i32 {
        match self.endian {
            Endian::Little => LittleEndian::read_i32(bytes),
            Endian::Big => BigEndian::read_i32(bytes),
        }
    }

    /// Read a record (1024 bytes) at the given record number (1-indexed)
    pub fn read_record(&self, record_number: usize) -> Result<&[u8]> {
        let start = record_number
            .checked_sub(1)
            .and_then(|r| r.checked_mul(RECORD_SIZE))
            .ok_or_else(|| {
                JplephemError::InvalidFormat(format!("Invalid record number: {}", record_number))
            })?;
        self.map.get(start..start.saturating_add(RECORD_SIZE)).ok_or_else(|| {
            JplephemError::InvalidFormat(format!(
                "Record {} lies beyond the end of the file",
                record_number
            ))
        })
    }

    /// Read the words `start..=end` (1-based word addresses) as doubles
    pub fn read_array(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if start == 0 || end < start {
            return Err(JplephemError::InvalidFormat(format!(
                "Invalid array bounds {}..{}",
                start, end
            )));
        }
        let bytes = (start - 1)
            .checked_mul(DOUBLE_SIZE)
            .zip(end.checked_mul(DOUBLE_SIZE))
            .and_then(|(lo, hi)| self.map.get(lo..hi))
            .ok_or_else(|| {
                JplephemError::InvalidFormat(format!(
                    "Array {}..{} lies beyond the end of the file",
                    start, end
                ))
            })?;

        let mut values = vec![0.0; end - start + 1];
        match self.endian {
            Endian::Little => LittleEndian::read_f64_into(bytes, &mut values),
            Endian::Big => BigEndian::read_f64_into(bytes, &mut values),
        }
        Ok(values)
    }

    /// Read comments from the comment area of the file
    pub fn comments(&self) -> String {
        let mut text = Vec::new();
        for record_number in 2..self.fward {
            match self.read_record(record_number) {
                Ok(record) => text.extend_from_slice(&record[..1000]),
                Err(_) => break,
            }
        }
        // Lines are separated by NUL and the area ends with EOT
        let end = text.iter().position(|&b| b == 4).unwrap_or(text.len());
        String::from_utf8_lossy(&text[..end])
            .replace('\0', "\n")
            .trim_end()
            .to_string()
    }

    /// Walk the summary records and return every array summary in file order
    pub fn summaries(&self) -> Result<Vec<Summary>> {
        let step = self.summary_length() * DOUBLE_SIZE;
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut record_number = self.fward;

        while record_number > 0 {
            if !visited.insert(record_number) || visited.len() > MAX_SUMMARY_RECORDS {
                return Err(JplephemError::InvalidFormat(format!(
                    "Cycle in summary records at record {}",
                    record_number
                )));
            }

            let summary_record = self.read_record(record_number)?;
            let name_record = self.read_record(record_number.saturating_add(1))?;

            let next = self.read_f64(&summary_record[0..8]) as usize;
            let n_summaries = self.read_f64(&summary_record[16..24]) as usize;
            let used = n_summaries
                .checked_mul(step)
                .and_then(|n| n.checked_add(24));
            if used.map_or(true, |n| n > RECORD_SIZE) {
                return Err(JplephemError::InvalidFormat(format!(
                    "Summary record {} claims {} summaries",
                    record_number, n_summaries
                )));
            }

            for i in 0..n_summaries {
                let bytes = &summary_record[24 + i * step..24 + (i + 1) * step];
                let doubles = (0..self.nd)
                    .map(|j| self.read_f64(&bytes[j * 8..(j + 1) * 8]))
                    .collect();
                let int_base = self.nd * 8;
                let ints = (0..self.ni)
                    .map(|j| self.read_i32(&bytes[int_base + j * 4..int_base + (j + 1) * 4]))
                    .collect();
                let name = String::from_utf8_lossy(&name_record[i * step..(i + 1) * step])
                    .trim_end()
                    .to_string();
                result.push(Summary {
                    name,
                    doubles,
                    ints,
                });
            }

            record_number = next;
        }

        Ok(result)
    }
}

impl std::fmt::Debug for Daf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daf")
            .field("path", &self.path)
            .field("locidw", &self.locidw)
            .field("nd", &self.nd)
            .field("ni", &self.ni)
            .field("endian", &self.endian)
            .finish()
    }
}
