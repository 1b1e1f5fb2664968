use super::{GeoPosition, LatLng, Vec3, meters_to_degrees_lat, meters_to_degrees_lng};

/// Tangent-plane metric frame anchored at a geographic origin.
///
/// Local coordinates are metres: x east, y north, z is the absolute altitude
/// (not relative to the origin). Conversions use the same per-latitude factors
/// in both directions so `to_geo(to_local(p)) == p` up to rounding.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalFrame {
    origin: LatLng,
    deg_per_m_lat: f64,
    deg_per_m_lng: f64,
}

impl LocalFrame {
    pub fn new(origin: LatLng) -> Self {
        Self {
            origin,
            deg_per_m_lat: meters_to_degrees_lat(origin.lat),
            deg_per_m_lng: meters_to_degrees_lng(origin.lat),
        }
    }

    pub fn origin(&self) -> LatLng {
        self.origin
    }

    pub fn to_local(&self, geo: GeoPosition) -> Vec3 {
        Vec3::new(
            (geo.lng - self.origin.lng) / self.deg_per_m_lng,
            (geo.lat - self.origin.lat) / self.deg_per_m_lat,
            geo.alt,
        )
    }

    pub fn to_geo(&self, local: Vec3) -> GeoPosition {
        GeoPosition::new(
            self.origin.lat + local.y * self.deg_per_m_lat,
            self.origin.lng + local.x * self.deg_per_m_lng,
            local.z,
        )
    }
}

/// Horizontal unit vector (east, north) for a bearing in radians clockwise from north.
pub fn heading_vector(bearing_rad: f64) -> Vec3 {
    Vec3::new(bearing_rad.sin(), bearing_rad.cos(), 0.0)
}
