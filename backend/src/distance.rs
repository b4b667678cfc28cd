use shared::{Coordinate, DistanceMatrixRequest, Unit};

use crate::error::ServiceError;

const EARTH_RADIUS_KM: f64 = 6_371.0;
const KM_PER_MILE: f64 = 1.609_344;

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

pub fn convert_km(km: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Metric => km,
        Unit::Imperial => km / KM_PER_MILE,
    }
}

/// Distances between consecutive points, in the requested unit.
pub fn consecutive_distances(points: &[Coordinate], unit: Unit) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| convert_km(haversine_km(w[0], w[1]), unit))
        .collect()
}

pub fn distance_matrix(req: &DistanceMatrixRequest) -> Result<Vec<f64>, ServiceError> {
    let points = req.coordinates().ok_or(ServiceError::LengthMismatch {
        latitudes: req.latitudes.len(),
        longitudes: req.longitudes.len(),
    })?;
    if let Some(idx) = points.iter().position(|p| !p.is_valid()) {
        return Err(ServiceError::CoordinateOutOfRange(idx));
    }
    Ok(consecutive_distances(&points, req.unit))
}
