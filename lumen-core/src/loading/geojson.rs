use std::path::Path;

use geo::{Coord, LineString};
use geojson::{Feature, GeoJson, GeometryValue};
use log::{info, trace};

use crate::error::Error;
use crate::model::Segment;
use crate::SegmentId;

/// Loads road segments from a `GeoJSON` `FeatureCollection` of
/// `LineString` features.
///
/// Recognized feature properties: `id` (defaults to the feature's
/// position), `oneway` (boolean or `"yes"`-style string), `class` and
/// `max_speed`. Non-LineString features are skipped.
///
/// # Errors
///
/// Returns [`Error::GeoJsonError`] when the file is not a parseable
/// feature collection.
pub fn load_segments_geojson(path: &Path) -> Result<Vec<Segment>, Error> {
    let raw = std::fs::read_to_string(path)?;
    let geojson: GeoJson = raw
        .parse()
        .map_err(|e: geojson::Error| Error::GeoJsonError(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(Error::GeoJsonError(format!(
            "{} is not a FeatureCollection",
            path.display()
        )));
    };

    let mut segments = Vec::with_capacity(collection.features.len());
    for (position, feature) in collection.features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            trace!("feature {position} has no geometry, skipping");
            continue;
        };
        let GeometryValue::LineString { coordinates, .. } = &geometry.value else {
            trace!("feature {position} is not a LineString, skipping");
            continue;
        };

        let polyline: LineString<f64> = coordinates
            .iter()
            .map(|pair| Coord {
                x: pair[0],
                y: pair[1],
            })
            .collect();

        let mut segment = Segment::new(segment_id(feature, position), polyline);
        segment.oneway = oneway_property(feature);
        segment.class = feature
            .property("class")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
        segment.max_speed = feature.property("max_speed").and_then(|v| v.as_f64());
        segments.push(segment);
    }

    info!(
        "loaded {} segments from {}",
        segments.len(),
        path.display()
    );
    Ok(segments)
}

fn segment_id(feature: &Feature, position: usize) -> SegmentId {
    feature
        .property("id")
        .and_then(|v| v.as_u64())
        .unwrap_or(position as SegmentId)
}

fn oneway_property(feature: &Feature) -> bool {
    match feature.property("oneway") {
        Some(value) if value.is_boolean() => value.as_bool().unwrap_or(false),
        Some(value) => matches!(value.as_str(), Some("yes" | "true" | "1")),
        None => false,
    }
}
