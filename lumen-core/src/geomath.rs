//! Small helpers for mixing metric distances with degree-space indices.

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Degree-space search radius guaranteed to contain every point within
/// `meters` of a location at latitude `lat_deg`.
///
/// Longitude degrees shrink by `cos(lat)`, so the radius is taken as the
/// larger of the two axes, scaled by `sqrt(2)` to cover the diagonal.
/// Candidates found with this radius still need an exact haversine check.
pub(crate) fn search_radius_deg(meters: f64, lat_deg: f64) -> f64 {
    let lat_radius = meters / METERS_PER_DEGREE;
    let cos_lat = lat_deg.to_radians().cos().abs().max(0.01);
    let lon_radius = meters / (METERS_PER_DEGREE * cos_lat);
    lat_radius.max(lon_radius) * std::f64::consts::SQRT_2
}

/// Normalizes a bearing difference to the half-open range `[-180, 180)`.
pub(crate) fn normalize_bearing_delta(delta_deg: f64) -> f64 {
    (delta_deg % 360.0 + 540.0) % 360.0 - 180.0
}
