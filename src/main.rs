use std::env;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use log::{error, info};

use satlat::constellation::Constellation;
use satlat::satlat_errors::SatlatError;
use satlat::scenario::{PositioningReport, Scenario};

/// Build the scenario and run it once.
///
/// Usage:
///   satlat [CONSTELLATION_CSV]
///
/// Without argument the built-in reference constellation is used.
fn run(csv_path: Option<Utf8PathBuf>) -> Result<PositioningReport, SatlatError> {
    let mut builder = Scenario::builder();
    if let Some(path) = csv_path {
        info!("Loading constellation from {path}");
        builder = builder.constellation(Constellation::from_csv_path(&path)?);
    }

    builder.build()?.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let csv_path = env::args().nth(1).map(Utf8PathBuf::from);

    match run(csv_path) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Positioning run failed: {err}");
            ExitCode::FAILURE
        }
    }
}
