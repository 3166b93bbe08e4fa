//! Calendar date and Julian date conversion functions

/// Convert Julian day integer to calendar date (year, month, day)
///
/// Proleptic Gregorian calendar, per the Explanatory Supplement to the
/// Astronomical Almanac 15.11.
pub fn compute_calendar_date(jd_integer: i64) -> (i64, u32, u32) {
    let f = jd_integer + 1401 + (4 * jd_integer + 274_277) / 146_097 * 3 / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year, month as u32, day as u32)
}

/// Convert (year, month, day) to the Julian day number of that day's noon
pub fn compute_julian_day(year: i64, month: u32, day: u32) -> i64 {
    let month = month as i64;
    let day = day as i64;
    let janfeb = month < 3;

    1461 * (year + 4800 - i64::from(janfeb)) / 4
        + 367 * (month - 2 + if janfeb { 12 } else { 0 }) / 12
        - 3 * ((year + 4900 - i64::from(janfeb)) / 100) / 4
        - 32075
        + day
}

/// Format a Julian date as a calendar date string (YYYY-MM-DD)
pub fn format_date(jd: f64) -> String {
    let (year, month, day) = compute_calendar_date((jd + 0.5).floor() as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2000, 1, 1, 2_451_545)]
    #[case(2024, 1, 1, 2_460_311)]
    #[case(1972, 1, 1, 2_441_318)]
    #[case(1858, 11, 17, 2_400_001)]
    fn test_julian_day(#[case] y: i64, #[case] m: u32, #[case] d: u32, #[case] jdn: i64) {
        assert_eq!(compute_julian_day(y, m, d), jdn);
        assert_eq!(compute_calendar_date(jdn), (y, m, d));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(2_451_544.5), "2000-01-01");
        assert_eq!(format_date(2_451_545.49), "2000-01-01");
        assert_eq!(format_date(2_451_545.5), "2000-01-02");
    }
}
