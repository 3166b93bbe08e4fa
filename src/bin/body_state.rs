//! Body State Tool
//!
//! Prints the barycentric position and velocity of a solar-system body for a
//! calendar date, or Earth's barycentric and heliocentric state with `--earth`.
//!
//! Usage:
//!   cargo run --bin body_state -- mars --date 2024-01-01T12:00:00 --unit km
//!   cargo run --bin body_state -- --earth --ephemeris de440 --kernel-dir data --json

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use clap::{ArgAction, Parser};
use fastephem::ephemeris::StandardEphemeris;
use fastephem::solar_system::{get_body_barycentric_posvel_jd, prepare_earth_position_vel_jd};
use fastephem::time::{time_to_jd1_jd2, Time, TimeScale};
use fastephem::LengthUnit;
use ndarray::Array2;
use serde::Serialize;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prints barycentric positions and velocities of solar-system bodies",
    long_about = None
)]
struct Args {
    /// Body name (sun, mercury, venus, earth, moon, mars, ...)
    #[arg(default_value = "earth")]
    body: String,

    /// Date as YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS
    #[arg(short, long, default_value = "2000-01-01T12:00:00")]
    date: String,

    /// Time scale the date is given in
    #[arg(short, long, default_value = "utc")]
    scale: String,

    /// Ephemeris: "builtin", a kernel name, or a path to a .bsp file
    #[arg(short, long)]
    ephemeris: Option<String>,

    /// Directory searched for <ephemeris>.bsp
    #[arg(short, long)]
    kernel_dir: Option<String>,

    /// Output unit: au or km
    #[arg(short, long, default_value = "au")]
    unit: String,

    /// Print Earth's barycentric and heliocentric state instead of a body
    #[arg(long, action = ArgAction::SetTrue)]
    earth: bool,

    /// Emit JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    body: String,
    ephemeris: String,
    unit: LengthUnit,
    jd_tdb: f64,
    position: [f64; 3],
    velocity: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    heliocentric: Option<[f64; 3]>,
}

fn parse_date(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| format!("Cannot parse date '{}': {}", text, e))?;
    Ok(date.and_hms_opt(0, 0, 0).ok_or("invalid time of day")?)
}

fn first_row(array: &Array2<f64>) -> [f64; 3] {
    [array[[0, 0]], array[[0, 1]], array[[0, 2]]]
}

fn print_vector(name: &str, value: &[f64; 3], unit: &str) {
    println!(
        "{:<14} {:>20.12} {:>20.12} {:>20.12}  {}",
        name, value[0], value[1], value[2], unit
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    let scale: TimeScale = args.scale.parse()?;
    let unit: LengthUnit = args.unit.parse()?;
    let dt = parse_date(&args.date)?;
    let second = dt.second() as f64 + dt.nanosecond() as f64 * 1e-9;
    let time = Time::from_calendar(
        scale,
        dt.year() as i64,
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        second,
    );
    let (jd1, jd2) = time_to_jd1_jd2(&time, "tdb")?;

    let mut provider = StandardEphemeris::new();
    if let Some(dir) = &args.kernel_dir {
        provider = provider.with_data_dir(dir);
    }
    let ephemeris = args
        .ephemeris
        .clone()
        .unwrap_or_else(fastephem::ephemeris::solar_system_ephemeris::get);

    let report = if args.earth {
        let (position, velocity, heliocentric) = prepare_earth_position_vel_jd(
            &provider,
            jd1.view(),
            jd2.view(),
            Some(&ephemeris),
            unit.name(),
        )?;
        Report {
            body: "earth".to_string(),
            ephemeris,
            unit,
            jd_tdb: jd1[0] + jd2[0],
            position: first_row(&position),
            velocity: first_row(&velocity),
            heliocentric: Some(first_row(&heliocentric)),
        }
    } else {
        let (position, velocity) = get_body_barycentric_posvel_jd(
            &provider,
            args.body.as_str(),
            jd1.view(),
            jd2.view(),
            Some(&ephemeris),
            unit.name(),
        )?;
        Report {
            body: args.body.to_ascii_lowercase(),
            ephemeris,
            unit,
            jd_tdb: jd1[0] + jd2[0],
            position: first_row(&position),
            velocity: first_row(&velocity),
            heliocentric: None,
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}  ({} ephemeris)", time, report.ephemeris);
    println!("TDB Julian date: {:.9}", report.jd_tdb);
    println!("Body: {}", report.body);
    println!("-------------------------------------------------------");
    print_vector("position", &report.position, unit.name());
    print_vector("velocity", &report.velocity, &format!("{}/day", unit));
    if let Some(helio) = &report.heliocentric {
        print_vector("heliocentric", helio, unit.name());
    }
    Ok(())
}
