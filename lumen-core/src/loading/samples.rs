use std::fs::File;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::model::BeautySample;

#[derive(Debug, Deserialize)]
struct SampleRecord {
    longitude: f64,
    latitude: f64,
    score: f64,
}

/// Loads beauty/light samples from a `longitude,latitude,score` CSV
/// file. Malformed rows are skipped.
///
/// # Errors
///
/// Returns an error when the file cannot be opened.
pub fn load_samples_csv(path: &Path) -> Result<Vec<BeautySample>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let mut samples = Vec::new();
    for record in csv::Reader::from_reader(file).deserialize() {
        match record {
            Ok(SampleRecord {
                longitude,
                latitude,
                score,
            }) => samples.push(BeautySample::new(longitude, latitude, score)),
            Err(e) => warn!("skipping sample row: {e}"),
        }
    }

    info!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}
