use serde::{Deserialize, Serialize};

/// Metres per degree of latitude on the spherical approximation used for
/// placing offsets. Longitude degrees shrink with `cos(latitude)`.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Smallest cosine used for the longitude correction; keeps the factor finite at the poles.
const MIN_COS_LAT: f64 = 1e-9;

/// Geographic point in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic position in degrees plus altitude in metres.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64, alt: f64) -> Self {
        Self { lat, lng, alt }
    }

    pub fn lat_lng(self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn with_alt(self, alt: f64) -> Self {
        Self::new(self.lat, self.lng, alt)
    }

    /// `[lng, lat, alt]`, the order the rendering boundary consumes.
    pub fn to_lng_lat_alt(self) -> [f64; 3] {
        [self.lng, self.lat, self.alt]
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.alt.is_finite()
    }
}

/// Initial great-circle bearing from `from` to `to`, in radians clockwise from north.
///
/// Result lies in `(-π, π]`. Coincident points yield `0.0`.
pub fn bearing(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    y.atan2(x)
}

/// [`bearing`] in degrees.
pub fn bearing_deg(from: LatLng, to: LatLng) -> f64 {
    bearing(from, to).to_degrees()
}

/// Degrees of latitude per metre. Constant on a sphere; `lat` kept for symmetry.
pub fn meters_to_degrees_lat(_lat: f64) -> f64 {
    1.0 / METERS_PER_DEGREE
}

/// Degrees of longitude per metre at latitude `lat` (degrees).
pub fn meters_to_degrees_lng(lat: f64) -> f64 {
    let cos_lat = lat.to_radians().cos().abs().max(MIN_COS_LAT);
    1.0 / (METERS_PER_DEGREE * cos_lat)
}
