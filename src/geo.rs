use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a point only when both coordinates are finite and in range.
    /// Parsers use this to drop malformed records instead of propagating them.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// A closed ring of `[longitude, latitude]` vertices outlining a selection
/// circle, ready to hand to a globe renderer as a polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPolygon {
    ring: Vec<[f64; 2]>,
}

impl SelectionPolygon {
    pub fn ring(&self) -> &[[f64; 2]] {
        &self.ring
    }

    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

/// Wraps a longitude in degrees into `[-180, 180)`.
pub fn normalize_lon(deg: f64) -> f64 {
    (deg + 540.0).rem_euclid(360.0) - 180.0
}

/// Approximates a circle of `radius_km` around `center` as a closed ring of
/// `segments + 1` vertices, walking clockwise from due north.
///
/// Uses the spherical destination-point formula. The bearing is derived from
/// `i % segments`, so the final vertex repeats the first one bit for bit and
/// the ring closes exactly.
pub fn generate_circle(center: GeoPoint, radius_km: f64, segments: usize) -> SelectionPolygon {
    let segments = segments.max(3);
    let lat = center.latitude.to_radians();
    let lng = center.longitude.to_radians();
    let angular = radius_km / EARTH_RADIUS_KM;

    let mut ring = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let bearing = 2.0 * std::f64::consts::PI * ((i % segments) as f64) / (segments as f64);
        let lat2 = (lat.sin() * angular.cos() + lat.cos() * angular.sin() * bearing.cos()).asin();
        let lng2 = lng
            + (bearing.sin() * angular.sin() * lat.cos())
                .atan2(angular.cos() - lat.sin() * lat2.sin());
        ring.push([normalize_lon(lng2.to_degrees()), lat2.to_degrees()]);
    }
    SelectionPolygon { ring }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
