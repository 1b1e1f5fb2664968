//! Angle normalization used by orientation math.

/// Normalize an angle in degrees into the half-open interval `(-180, 180]`.
pub fn normalize_signed_degrees(deg: f64) -> f64 {
    180.0 - (180.0 - deg).rem_euclid(360.0)
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}
