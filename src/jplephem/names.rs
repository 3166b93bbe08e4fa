//! Standard SPICE target names and ID numbers

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Map from target ID numbers to canonical names
    static ref TARGET_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        // First entry for an ID is its canonical name
        for &(id, name) in TARGET_NAME_PAIRS.iter().rev() {
            m.insert(id, name);
        }
        m
    };

    /// Map from lowercase target names to ID numbers
    static ref TARGET_IDS: HashMap<String, i32> = TARGET_NAME_PAIRS
        .iter()
        .map(|&(id, name)| (name.to_lowercase(), id))
        .collect();
}

/// Get the name of a target given its ID number
pub fn target_name(id: i32) -> Option<&'static str> {
    TARGET_NAMES.get(&id).copied()
}

/// Get the ID number of a target given its name
pub fn target_id(name: &str) -> Option<i32> {
    TARGET_IDS.get(&name.trim().to_lowercase()).copied()
}

/// Pairs of (id, name) for celestial bodies
const TARGET_NAME_PAIRS: &[(i32, &str)] = &[
    (0, "SOLAR_SYSTEM_BARYCENTER"),
    (0, "SSB"),
    (0, "SOLAR SYSTEM BARYCENTER"),
    (1, "MERCURY_BARYCENTER"),
    (1, "MERCURY BARYCENTER"),
    (2, "VENUS_BARYCENTER"),
    (2, "VENUS BARYCENTER"),
    (3, "EARTH_BARYCENTER"),
    (3, "EMB"),
    (3, "EARTH MOON BARYCENTER"),
    (3, "EARTH-MOON BARYCENTER"),
    (3, "EARTH BARYCENTER"),
    (4, "MARS_BARYCENTER"),
    (4, "MARS BARYCENTER"),
    (5, "JUPITER_BARYCENTER"),
    (5, "JUPITER BARYCENTER"),
    (6, "SATURN_BARYCENTER"),
    (6, "SATURN BARYCENTER"),
    (7, "URANUS_BARYCENTER"),
    (7, "URANUS BARYCENTER"),
    (8, "NEPTUNE_BARYCENTER"),
    (8, "NEPTUNE BARYCENTER"),
    (9, "PLUTO_BARYCENTER"),
    (9, "PLUTO BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (399, "EARTH"),
    (301, "MOON"),
    (499, "MARS"),
    (599, "JUPITER"),
    (699, "SATURN"),
    (799, "URANUS"),
    (899, "NEPTUNE"),
    (999, "PLUTO"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(target_name(399), Some("EARTH"));
        assert_eq!(target_name(0), Some("SOLAR_SYSTEM_BARYCENTER"));
        assert_eq!(target_name(3), Some("EARTH_BARYCENTER"));
        assert_eq!(target_name(12345), None);
        assert_eq!(target_id("earth-moon barycenter"), Some(3));
        assert_eq!(target_id(" Sun "), Some(10));
        assert_eq!(target_id("vulcan"), None);
    }
}
