//! Writer for small synthetic SPK files used by the tests

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;
use std::path::Path;

const RECORD_SIZE: usize = 1024;
/// Word address of the first data word (start of record 4)
const FIRST_DATA_WORD: usize = 3 * 128 + 1;

/// One Chebyshev segment to write
pub(crate) struct TestSegment {
    pub center: i32,
    pub target: i32,
    pub data_type: i32,
    /// Initial epoch in seconds past J2000
    pub init: f64,
    /// Record length in seconds
    pub intlen: f64,
    /// Coefficients per record, component blocks back to back
    pub records: Vec<Vec<f64>>,
}

impl TestSegment {
    fn words(&self) -> Vec<f64> {
        let mut words = Vec::new();
        for (i, coefficients) in self.records.iter().enumerate() {
            words.push(self.init + (i as f64 + 0.5) * self.intlen);
            words.push(self.intlen / 2.0);
            words.extend_from_slice(coefficients);
        }
        let rsize = self.records.first().map_or(2, |r| r.len() + 2);
        words.extend_from_slice(&[
            self.init,
            self.intlen,
            rsize as f64,
            self.records.len() as f64,
        ]);
        words
    }
}

fn pad(buf: &mut Vec<u8>) {
    let target = buf.len().div_ceil(RECORD_SIZE) * RECORD_SIZE;
    buf.resize(target, 0);
}

/// Write a little-endian DAF/SPK file holding `segments`
pub(crate) fn write_spk(path: &Path, segments: &[TestSegment]) -> std::io::Result<()> {
    let mut data = Vec::new();
    let mut summaries = Vec::new();
    let mut names = Vec::new();
    let mut next_word = FIRST_DATA_WORD;

    for (n, segment) in segments.iter().enumerate() {
        let words = segment.words();
        let start_i = next_word;
        let end_i = start_i + words.len() - 1;
        next_word = end_i + 1;
        for w in &words {
            data.write_f64::<LittleEndian>(*w)?;
        }

        summaries.write_f64::<LittleEndian>(segment.init)?;
        summaries
            .write_f64::<LittleEndian>(segment.init + segment.intlen * segment.records.len() as f64)?;
        for value in [
            segment.target,
            segment.center,
            1,
            segment.data_type,
            start_i as i32,
            end_i as i32,
        ] {
            summaries.write_i32::<LittleEndian>(value)?;
        }

        let mut name = format!("TEST SEGMENT {}", n).into_bytes();
        name.resize(40, b' ');
        names.extend_from_slice(&name);
    }

    let mut file = Vec::new();
    file.extend_from_slice(b"DAF/SPK ");
    file.write_i32::<LittleEndian>(2)?;
    file.write_i32::<LittleEndian>(6)?;
    let mut ifname = b"SYNTHETIC TEST KERNEL".to_vec();
    ifname.resize(60, b' ');
    file.extend_from_slice(&ifname);
    file.write_i32::<LittleEndian>(2)?;
    file.write_i32::<LittleEndian>(2)?;
    file.write_i32::<LittleEndian>(next_word as i32)?;
    file.extend_from_slice(b"LTL-IEEE");
    pad(&mut file);

    file.write_f64::<LittleEndian>(0.0)?;
    file.write_f64::<LittleEndian>(0.0)?;
    file.write_f64::<LittleEndian>(segments.len() as f64)?;
    file.extend_from_slice(&summaries);
    pad(&mut file);

    file.extend_from_slice(&names);
    pad(&mut file);

    file.extend_from_slice(&data);
    pad(&mut file);

    std::fs::File::create(path)?.write_all(&file)
}

/// A kernel with the Sun, the Earth-Moon barycenter, and the Earth around it
///
/// Every segment is type 2, starts at J2000, and has two 10-day records of
/// linear series. At J2000 + 5 days the positions (km) are
/// sun = (100, 200, 300), emb = (1.5e8, 0, 0), earth - emb = (-4000, 1000, 0).
pub(crate) fn write_planet_kernel(path: &Path) -> std::io::Result<()> {
    let intlen = 10.0 * 86_400.0;
    let segment = |center, target, record: Vec<f64>| TestSegment {
        center,
        target,
        data_type: 2,
        init: 0.0,
        intlen,
        records: vec![record.clone(), record],
    };
    write_spk(
        path,
        &[
            segment(0, 10, vec![100.0, 10.0, 200.0, -20.0, 300.0, 0.0]),
            segment(0, 3, vec![1.5e8, 0.0, 0.0, 2.5e7, 0.0, 0.0]),
            segment(3, 399, vec![-4000.0, 0.0, 1000.0, 0.0, 0.0, 0.0]),
        ],
    )
}
