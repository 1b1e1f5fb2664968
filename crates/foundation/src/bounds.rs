use crate::math::LatLng;

/// Geographic bounding box in degrees (no antimeridian wrapping).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        GeoBounds {
            south_west,
            north_east,
        }
    }

    /// Smallest box containing every point; `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = GeoBounds::new(first, first);
        for p in iter {
            out.south_west.lat = out.south_west.lat.min(p.lat);
            out.south_west.lng = out.south_west.lng.min(p.lng);
            out.north_east.lat = out.north_east.lat.max(p.lat);
            out.north_east.lng = out.north_east.lng.max(p.lng);
        }
        Some(out)
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }
}
