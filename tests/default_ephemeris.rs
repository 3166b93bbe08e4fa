//! The process-wide default ephemeris selector
//!
//! Kept in its own test binary so changing the selector cannot race with
//! tests that rely on the "builtin" default.

use fastephem::ephemeris::solar_system_ephemeris;
use fastephem::{get_body_barycentric_posvel_jd, FastephemError, StandardEphemeris};
use ndarray::arr1;
use tempfile::tempdir;

#[test]
fn test_default_selector_round_trip() {
    assert_eq!(solar_system_ephemeris::get(), "builtin");

    let provider = StandardEphemeris::new();
    let jd1 = arr1(&[2_451_545.0]);
    let jd2 = arr1(&[0.0]);
    assert!(
        get_body_barycentric_posvel_jd(&provider, "earth", jd1.view(), jd2.view(), None, "au")
            .is_ok()
    );

    solar_system_ephemeris::set(" DE-Missing ");
    assert_eq!(solar_system_ephemeris::get(), "DE-Missing");
    let result =
        get_body_barycentric_posvel_jd(&provider, "earth", jd1.view(), jd2.view(), None, "au");
    assert!(matches!(result, Err(FastephemError::UnknownEphemeris(name)) if name == "DE-Missing"));

    // A mixed-case kernel path keeps resolving once it is the default
    let dir = tempdir().unwrap();
    let kernel_dir = dir.path().join("Kernels");
    std::fs::create_dir(&kernel_dir).unwrap();
    let kernel = kernel_dir.join("DE-Short.bsp");
    std::fs::write(&kernel, b"DAF/SPK ").unwrap();
    let selector = kernel.to_string_lossy().to_string();
    solar_system_ephemeris::set(&selector);
    assert_eq!(solar_system_ephemeris::get(), selector);
    let result =
        get_body_barycentric_posvel_jd(&provider, "earth", jd1.view(), jd2.view(), None, "au");
    assert!(matches!(result, Err(FastephemError::Kernel(_))));

    // Case does not matter when selecting the builtin model
    solar_system_ephemeris::set("BuiltIn");
    assert!(
        get_body_barycentric_posvel_jd(&provider, "earth", jd1.view(), jd2.view(), None, "au")
            .is_ok()
    );

    // An explicit selector still wins over the default
    assert!(get_body_barycentric_posvel_jd(
        &provider,
        "earth",
        jd1.view(),
        jd2.view(),
        Some("builtin"),
        "au"
    )
    .is_ok());

    solar_system_ephemeris::set("builtin");
    assert_eq!(solar_system_ephemeris::get(), "builtin");
}
