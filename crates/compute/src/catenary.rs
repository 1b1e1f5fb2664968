//! Catenary sag for conductors hung between two attachment points.
//!
//! All inputs are in a local metric frame (x east, y north, z up). The
//! catenary constant `C` is the conductor's horizontal tension divided by its
//! weight per metre; larger values give flatter curves.

use foundation::math::Vec3;

/// Catenary constant used when a phase carries no usable tension.
pub const DEFAULT_CATENARY_CONSTANT: f64 = 1200.0;

/// Horizontal spans shorter than this are treated as vertical/degenerate.
const MIN_HORIZONTAL_SPAN_M: f64 = 1e-6;

const MIN_LOD_SEGMENTS: usize = 8;
const MAX_LOD_SEGMENTS: usize = 120;

fn effective_constant(c: f64) -> f64 {
    if c.is_finite() && c > 0.0 {
        c
    } else {
        DEFAULT_CATENARY_CONSTANT
    }
}

/// Catenary constant from horizontal tension (N) and weight per metre (N/m).
pub fn catenary_constant(tension: f64, weight_per_metre: f64) -> f64 {
    if !(weight_per_metre.is_finite() && weight_per_metre > 0.0) {
        return DEFAULT_CATENARY_CONSTANT;
    }
    effective_constant(tension / weight_per_metre)
}

/// Drop below the chord at horizontal distance `x` into a span of length `span`,
/// before the slope correction.
///
/// `C (cosh(L/2C) - cosh((L-2x)/2C))` rewritten as a product of sinh terms so
/// large `L/C` ratios do not cancel catastrophically.
fn level_sag_at(x: f64, span: f64, c: f64) -> f64 {
    2.0 * c * ((span - x) / (2.0 * c)).sinh() * (x / (2.0 * c)).sinh()
}

/// Midspan sag of a level span.
pub fn sag(span: f64, c: f64) -> f64 {
    let c = effective_constant(c);
    level_sag_at(span / 2.0, span, c)
}

/// Conductor length of a level span.
pub fn arc_length(span: f64, c: f64) -> f64 {
    let c = effective_constant(c);
    2.0 * c * (span / (2.0 * c)).sinh()
}

/// Radius of curvature at horizontal distance `x` from the lowest point.
pub fn radius_of_curvature(x: f64, c: f64) -> f64 {
    let c = effective_constant(c);
    let ch = (x / c).cosh();
    c * ch * ch
}

/// Segment count for a span when adaptive level of detail is on.
///
/// Short spans get fewer points, very long spans more; the result always
/// lies in `[8, 120]`.
pub fn lod_segments(span: f64, requested: usize) -> usize {
    let n = if span < 50.0 {
        12
    } else if span < 150.0 {
        24
    } else if span > 600.0 {
        100
    } else {
        requested
    };
    n.clamp(MIN_LOD_SEGMENTS, MAX_LOD_SEGMENTS)
}

/// Samples the catenary between `p1` and `p2`.
///
/// Returns `segments + 1` points; the first is exactly `p1` and the last
/// exactly `p2`. A non-positive tension uses [`DEFAULT_CATENARY_CONSTANT`].
///
/// # Panics
///
/// Panics if `segments` is zero.
pub fn solve(p1: Vec3, p2: Vec3, tension: f64, segments: usize) -> Vec<Vec3> {
    assert!(segments > 0, "catenary needs at least one segment");

    let c = effective_constant(tension);
    let delta = p2 - p1;
    let span = delta.horizontal_length();
    let n = segments as f64;

    let mut out = Vec::with_capacity(segments + 1);
    out.push(p1);

    if span.is_nan() || span <= MIN_HORIZONTAL_SPAN_M {
        for i in 1..segments {
            out.push(p1.lerp(p2, i as f64 / n));
        }
        out.push(p2);
        return out;
    }

    // Chord slope correction: sag is measured vertically on an inclined span.
    let cos_theta = span / span.hypot(delta.z);

    for i in 1..segments {
        let t = i as f64 / n;
        let chord = p1.lerp(p2, t);
        let mut drop = level_sag_at(t * span, span, c) / cos_theta;
        if !drop.is_finite() {
            drop = 0.0;
        }
        out.push(chord.with_z(chord.z - drop));
    }
    out.push(p2);
    out
}

/// Cumulative 3D arc length at each vertex; `table[0] == 0`.
pub fn cumulative_lengths(points: &[Vec3]) -> Vec<f64> {
    let mut table = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            acc += points[i - 1].distance(*p);
        }
        table.push(acc);
    }
    table
}
