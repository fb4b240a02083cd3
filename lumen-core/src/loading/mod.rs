//! This module is responsible for loading segment and sample data from
//! files into the plain structures the builder consumes.

mod geojson;
mod samples;

pub use geojson::load_segments_geojson;
pub use samples::load_samples_csv;
