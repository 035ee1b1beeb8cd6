//! Geographic coordinate type and distance helpers.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Single precision drifts by
//! decimetres at the 100 km scale, which is enough to break integer-metre
//! cost matrices, so everything here is double precision.

/// Mean Earth radius in metres used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        // `min` guards asin against a > 1 from rounding on antipodal pairs.
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_M * c
    }

    /// Approximate bounding-box check, much cheaper than `distance_m`.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Euclidean distance between two planar coordinates.
#[inline]
pub fn planar_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}
