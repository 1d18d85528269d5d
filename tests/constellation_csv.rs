mod common;

use camino::Utf8Path;
use satlat::constellation::Constellation;
use satlat::satlat_errors::SatlatError;
use satlat::scenario::Scenario;

#[test]
fn test_csv_file_matches_reference() {
    let constellation =
        Constellation::from_csv_path(Utf8Path::new("tests/data/reference_constellation.csv"))
            .unwrap();
    assert_eq!(constellation, Constellation::reference().unwrap());
}

#[test]
fn test_csv_constellation_drives_the_run() {
    let constellation =
        Constellation::from_csv_path(Utf8Path::new("tests/data/reference_constellation.csv"))
            .unwrap();
    let report = Scenario::builder()
        .constellation(constellation)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.satellite_positions.len(), 4);
    assert!(report.error < 0.01);
    common::assert_position_close(report.estimate(), &common::reference_position(), 0.01);
}

#[test]
fn test_parabolic_row_is_rejected() {
    assert_eq!(
        Constellation::from_csv_path(Utf8Path::new("tests/data/parabolic_satellite.csv")),
        Err(SatlatError::EccentricityOutOfRange(1.0))
    );
}
