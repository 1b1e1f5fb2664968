//! Geometry for one phase across one span.
//!
//! Everything is computed in a [`LocalFrame`] anchored at the start tower and
//! converted to `[lng, lat, alt]` only when emitted.

use std::f64::consts::FRAC_PI_2;

use foundation::ids::TowerId;
use foundation::math::{GeoPosition, LocalFrame, Vec3, bearing, heading_vector};
use scene::SceneSettings;
use scene::components::{CablePath, HardwareSegment, SignalSphere};
use scene::phase::{PhaseConfig, scale_factor};
use tracing::debug;

use crate::bundle::{BundleOffset, pattern};
use crate::catenary::{cumulative_lengths, lod_segments, solve};
use crate::hardware::{
    LocalSegment, SpacerStyle, anchor_drop, anchor_structure, spacer_structure,
};

/// Gap between the anchor hardware and where the conductor starts (metres).
pub const TERMINAL_CLEARANCE_M: f64 = 0.6;
/// Spacers are kept at least this far from either tower (metres along the curve).
pub const SPACER_SAFETY_MARGIN_M: f64 = 25.0;

const CENTERLINE_SEGMENTS: usize = 30;
const CONDUCTOR_SEGMENTS: usize = 20;
/// Outward push applied to the horizontal offset at nominal scale (metres).
const RECEDE_M: f64 = 0.3;
const SPHERE_LIFT_M: f64 = 0.22;
/// Centrelines longer than this carry three signal spheres instead of two.
const LONG_SPAN_M: f64 = 400.0;

/// Everything the builder needs for one (span, phase) pair.
#[derive(Debug, Clone, Copy)]
pub struct SpanInput<'a> {
    pub from: TowerId,
    pub to: TowerId,
    /// Start position with any altitude override already applied.
    pub start: GeoPosition,
    pub end: GeoPosition,
    pub phase: &'a PhaseConfig,
    /// Position of the phase in the full phase list, disabled phases included.
    pub phase_index: usize,
    pub settings: SceneSettings,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanGeometry {
    pub cables: Vec<CablePath>,
    pub hardware: Vec<HardwareSegment>,
    pub spheres: Vec<SignalSphere>,
    pub spacers: usize,
    /// Arc length of the phase centreline (metres).
    pub centerline_length: f64,
}

/// Initial spacer cursor for a phase at the start of a rebuild.
///
/// Staggers neighbouring phases by a third of the interval so their spacers
/// do not line up.
pub fn initial_spacer_cursor(phase: &PhaseConfig, phase_index: usize) -> f64 {
    if !(phase.spacer_interval.is_finite() && phase.spacer_interval > 0.0) {
        return 0.0;
    }
    phase.spacer_interval * ((phase_index % 3) as f64 / 3.0)
}

/// Fractions of the centreline at which signal spheres hang.
pub fn sphere_ratios(total_length: f64, phase_index: usize) -> Vec<f64> {
    let jitter = ((phase_index % 3) as f64 - 1.0) * 0.05;
    let base: &[f64] = if total_length > LONG_SPAN_M {
        &[0.25, 0.5, 0.75]
    } else {
        &[0.33, 0.66]
    };
    base.iter().map(|r| r + jitter).collect()
}

/// Point at arc length `target` along `points`, given their cumulative lengths.
fn point_at_distance(points: &[Vec3], table: &[f64], target: f64) -> Option<Vec3> {
    let j = (1..points.len()).find(|&j| table[j] >= target)?;
    let seg = table[j] - table[j - 1];
    let t = if seg > 0.0 {
        (target - table[j - 1]) / seg
    } else {
        0.0
    };
    Some(points[j - 1].lerp(points[j], t))
}

/// Builds cables, hardware and markers for one phase across one span.
///
/// `cursor` is the phase's running spacer distance. It carries over from span
/// to span within one rebuild and is reset whenever a spacer is placed.
///
/// Returns `None` for spans too short to hang a conductor.
pub fn build_span(input: &SpanInput<'_>, cursor: &mut f64) -> Option<SpanGeometry> {
    let SpanInput {
        from,
        to,
        start,
        end,
        phase,
        phase_index,
        settings,
    } = *input;

    let frame = LocalFrame::new(start.lat_lng());
    let s = frame.to_local(start);
    let e = frame.to_local(end);
    let run = (e - s).with_z(0.0);
    let span = run.horizontal_length();
    if !span.is_finite() || span < 2.0 * TERMINAL_CLEARANCE_M {
        debug!("span {from} -> {to} too short ({span:.3} m), skipped");
        return None;
    }
    let unit = run.scale(1.0 / span);

    let perp = heading_vector(bearing(start.lat_lng(), end.lat_lng()) + FRAC_PI_2);
    let k = scale_factor(settings.scale);
    let h = phase.horizontal_offset * k;
    let recede = RECEDE_M * k;
    let h_adj = if h > 0.0 { h + recede } else { h - recede };
    let lift = Vec3::UP.scale(phase.vertical_offset * k + settings.tower_elevation);
    let across = perp.scale(h_adj);

    let cp1 = s + across + lift;
    let cp2 = e + across + lift;

    let count = phase.conductor_count();
    let spacing = phase.effective_bundle_spacing() * k;
    let offsets = pattern(count, spacing);
    let drop = Vec3::UP.scale(anchor_drop(count));
    let clearance = unit.scale(TERMINAL_CLEARANCE_M);

    let mut local_hw: Vec<LocalSegment> = Vec::new();
    for anchor in [cp1 + drop, cp2 + drop] {
        local_hw.extend(anchor_structure(
            anchor,
            perp,
            count,
            spacing,
            phase.effective_spacer_size(),
        ));
    }

    let c1 = cp1 + clearance + drop;
    let c2 = cp2 - clearance + drop;

    let (center_n, conductor_n) = if settings.adaptive_lod {
        (
            lod_segments(span, CENTERLINE_SEGMENTS),
            lod_segments(span, CONDUCTOR_SEGMENTS),
        )
    } else {
        (CENTERLINE_SEGMENTS, CONDUCTOR_SEGMENTS)
    };

    let center = solve(c1, c2, phase.tension, center_n);
    let table = cumulative_lengths(&center);
    let total = table.last().copied().unwrap_or(0.0);

    let mut spacers = 0;
    if phase.has_spacers() && center.len() >= 3 {
        let style = SpacerStyle {
            size: phase.effective_spacer_size(),
            thickness: phase.effective_spacer_thickness(),
            color: phase.spacer_color,
        };
        spacers = place_spacers(
            &center,
            &table,
            perp,
            &offsets,
            style,
            phase,
            phase_index,
            cursor,
            &mut local_hw,
        );
    }

    let mut out = SpanGeometry {
        centerline_length: total,
        spacers,
        ..SpanGeometry::default()
    };

    let emit = |p: Vec3| frame.to_geo(p).to_lng_lat_alt();

    out.hardware = local_hw
        .into_iter()
        .map(|seg| HardwareSegment {
            path: [emit(seg.a), emit(seg.b)],
            color: seg.color,
            thickness: seg.thickness,
            phase_id: phase.id.clone(),
            kind: seg.kind,
        })
        .filter(HardwareSegment::is_finite)
        .collect();

    if phase.signal_spheres_enabled {
        out.spheres = sphere_ratios(total, phase_index)
            .into_iter()
            .filter_map(|r| point_at_distance(&center, &table, total * r))
            .map(|p| SignalSphere {
                position: emit(p + Vec3::UP.scale(SPHERE_LIFT_M)),
                color: phase.signal_sphere_color,
                radius: phase.effective_signal_sphere_size(),
                phase_id: phase.id.clone(),
            })
            .filter(SignalSphere::is_finite)
            .collect();
    }

    for (i, o) in offsets.iter().enumerate() {
        let shift = perp.scale(o.h) + Vec3::UP.scale(o.v);
        let path = solve(c1 + shift, c2 + shift, phase.tension, conductor_n);
        let cable = CablePath {
            from,
            to,
            phase_id: phase.id.clone(),
            conductor: i,
            path: path.into_iter().map(emit).collect(),
            color: phase.color,
            width: phase.effective_width(),
        };
        if cable.is_finite() {
            out.cables.push(cable);
        } else {
            debug!("non-finite conductor {} on {from} -> {to} dropped", cable.key());
        }
    }

    Some(out)
}

#[allow(clippy::too_many_arguments)]
fn place_spacers(
    center: &[Vec3],
    table: &[f64],
    perp: Vec3,
    offsets: &[BundleOffset],
    style: SpacerStyle,
    phase: &PhaseConfig,
    phase_index: usize,
    cursor: &mut f64,
    out: &mut Vec<LocalSegment>,
) -> usize {
    let interval = phase.spacer_interval;
    let total = table.last().copied().unwrap_or(0.0);
    let last = center.len() - 1;
    let mut placed = 0;

    for j in 1..last {
        *cursor += table[j] - table[j - 1];
        let dist = table[j];
        if *cursor >= interval
            && dist >= SPACER_SAFETY_MARGIN_M
            && dist <= total - SPACER_SAFETY_MARGIN_M
        {
            out.extend(spacer_structure(center[j], perp, offsets, style));
            *cursor = 0.0;
            placed += 1;
        }
    }

    // Every bundled span carries at least one spacer.
    if placed == 0 {
        let stagger = ((phase_index % 5) as isize - 2) * 2;
        let idx = (center.len() / 2) as isize + stagger;
        let idx = idx.clamp(1, last as isize - 1) as usize;
        out.extend(spacer_structure(center[idx], perp, offsets, style));
        placed = 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::{
        SpanInput, build_span, initial_spacer_cursor, point_at_distance, sphere_ratios,
    };
    use foundation::ids::TowerId;
    use foundation::math::{GeoPosition, LocalFrame, Vec3};
    use scene::SceneSettings;
    use scene::components::HardwareKind;
    use scene::phase::PhaseConfig;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn quad_phase() -> PhaseConfig {
        PhaseConfig {
            tension: 1800.0,
            cable_count: 4,
            spacer_interval: 30.0,
            ..PhaseConfig::new("P", "Quad")
        }
    }

    fn input(phase: &PhaseConfig, end: GeoPosition) -> SpanInput<'_> {
        SpanInput {
            from: TowerId(0),
            to: TowerId(1),
            start: GeoPosition::new(0.0, 0.0, 0.0),
            end,
            phase,
            phase_index: 0,
            settings: SceneSettings::default(),
        }
    }

    #[test]
    fn quad_span_on_the_equator() {
        let phase = quad_phase();
        let mut cursor = 0.0;
        let g = build_span(&input(&phase, GeoPosition::new(0.0, 0.01, 0.0)), &mut cursor)
            .expect("span");

        assert_eq!(g.cables.len(), 4);
        assert!(g.cables.iter().all(|c| c.path.len() == 21));
        assert!(g.spacers >= 1);
        // 1109.9 m chord sagging at C = 1800.
        assert!(g.centerline_length > 1120.0 && g.centerline_length < 1135.0);

        let frames = g
            .hardware
            .iter()
            .filter(|s| s.kind == HardwareKind::AnchorFrame)
            .count();
        assert_eq!(frames, 12);

        // Conductors start at tower elevation minus the anchor drop plus the bundle offset.
        let first = g.cables[0].path[0];
        assert_close(first[2], 4.0 - 1.5 + 0.2, 1e-9);
        let keys: Vec<String> = g.cables.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["P-0", "P-1", "P-2", "P-3"]);
    }

    #[test]
    fn conductors_start_inside_the_clearance() {
        let phase = PhaseConfig::new("S", "Single");
        let mut cursor = 0.0;
        let g = build_span(&input(&phase, GeoPosition::new(0.0, 0.005, 0.0)), &mut cursor)
            .expect("span");
        let frame = LocalFrame::new(Default::default());
        let p = g.cables[0].path[0];
        let local = frame.to_local(GeoPosition::new(p[1], p[0], p[2]));
        assert_close(local.x, 0.6, 1e-6);
        // An eastward span's perpendicular points south; a zero offset recedes north.
        assert_close(local.y, 0.3, 1e-6);
        assert_eq!(g.spacers, 0);
    }

    #[test]
    fn short_span_is_skipped() {
        let phase = quad_phase();
        let mut cursor = 0.0;
        let end = GeoPosition::new(0.0, 0.000_005, 0.0);
        assert!(build_span(&input(&phase, end), &mut cursor).is_none());
        assert_eq!(cursor, 0.0);
    }

    #[test]
    fn fallback_spacer_when_interval_exceeds_span() {
        let phase = PhaseConfig {
            spacer_interval: 10_000.0,
            cable_count: 2,
            ..PhaseConfig::new("P", "Pair")
        };
        let mut cursor = 0.0;
        let g = build_span(&input(&phase, GeoPosition::new(0.0, 0.002, 0.0)), &mut cursor)
            .expect("span");
        assert_eq!(g.spacers, 1);
        assert!(cursor > 0.0);
        let arms = g
            .hardware
            .iter()
            .filter(|s| s.kind == HardwareKind::SpacerArm)
            .count();
        assert_eq!(arms, 1);
    }

    #[test]
    fn cursor_carries_between_spans() {
        let phase = PhaseConfig {
            spacer_interval: 100.0,
            ..quad_phase()
        };
        let end = GeoPosition::new(0.0, 0.01, 0.0);
        let mut a = 0.0;
        let mut b = 60.0;
        let ga = build_span(&input(&phase, end), &mut a).expect("span");
        let gb = build_span(&input(&phase, end), &mut b).expect("span");
        assert_ne!(ga.hardware, gb.hardware);
    }

    #[test]
    fn spheres_follow_span_length() {
        let phase = PhaseConfig {
            signal_spheres_enabled: true,
            signal_sphere_color: [255, 200, 200],
            ..PhaseConfig::new("OPGW", "Shield")
        };
        let mut cursor = 0.0;
        let long = build_span(&input(&phase, GeoPosition::new(0.0, 0.01, 0.0)), &mut cursor)
            .expect("span");
        assert_eq!(long.spheres.len(), 3);
        let short = build_span(&input(&phase, GeoPosition::new(0.0, 0.002, 0.0)), &mut cursor)
            .expect("span");
        assert_eq!(short.spheres.len(), 2);
        assert!(short.spheres.iter().all(|s| s.radius == 0.6));
    }

    #[test]
    fn sphere_ratio_jitter() {
        assert_eq!(sphere_ratios(100.0, 1), vec![0.33, 0.66]);
        let r = sphere_ratios(500.0, 0);
        assert_close(r[0], 0.2, 1e-12);
        assert_close(r[2], 0.7, 1e-12);
    }

    #[test]
    fn point_lookup_interpolates() {
        let pts = [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0)];
        let table = [0.0, 10.0, 20.0];
        let p = point_at_distance(&pts, &table, 15.0).expect("point");
        assert_close(p.x, 15.0, 1e-12);
        assert!(point_at_distance(&pts, &table, 25.0).is_none());
    }

    #[test]
    fn cursor_seed_staggers_by_thirds() {
        let phase = quad_phase();
        assert_eq!(initial_spacer_cursor(&phase, 0), 0.0);
        assert_close(initial_spacer_cursor(&phase, 4), 10.0, 1e-12);
        assert_close(initial_spacer_cursor(&phase, 5), 20.0, 1e-12);
        assert_eq!(initial_spacer_cursor(&PhaseConfig::default(), 2), 0.0);
    }
}
