//! Anchor and spacer hardware, built in a span's local metric frame.

use foundation::math::Vec3;
use scene::components::{
    ANCHOR_ROD_COLOR, ANCHOR_TIP_COLOR, CLAMP_COLOR, HARDWARE_BLACK, HardwareKind, darken,
};
use scene::phase::Rgb;

use crate::bundle::{BundleOffset, pattern};

/// Anchor frames are drawn slightly larger than line spacers.
const ANCHOR_SIZE_FACTOR: f64 = 1.2;
const ANCHOR_FRAME_THICKNESS: f64 = 0.25;
const ANCHOR_ROD_LENGTH: f64 = 2.0;
const ANCHOR_ROD_THICKNESS: f64 = 0.6;
const ANCHOR_TIP_THICKNESS: f64 = 0.4;
const ANCHOR_BAR_HALF_LENGTH: f64 = 0.5;
const ANCHOR_BAR_THICKNESS: f64 = 0.3;

/// Height of short marker segments (anchor tips, clamps, sheds).
const MARKER_RISE: f64 = 0.05;

const SHEDS_PER_ARM: usize = 3;
const SHED_DARKEN: u8 = 40;
const SHED_THICKNESS_FACTOR: f64 = 2.5;
const CLAMP_THICKNESS_FACTOR: f64 = 3.0;

/// Drop applied to four-conductor attachment points (insulator string length).
pub fn anchor_drop(conductor_count: usize) -> f64 {
    if conductor_count == 4 { -1.5 } else { 0.0 }
}

/// Two-point hardware piece in local coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalSegment {
    pub a: Vec3,
    pub b: Vec3,
    pub color: Rgb,
    pub thickness: f64,
    pub kind: HardwareKind,
}

impl LocalSegment {
    fn new(a: Vec3, b: Vec3, color: Rgb, thickness: f64, kind: HardwareKind) -> Self {
        Self {
            a,
            b,
            color,
            thickness,
            kind,
        }
    }

    fn rising(p: Vec3, color: Rgb, thickness: f64, kind: HardwareKind) -> Self {
        Self::new(p, p + Vec3::UP.scale(MARKER_RISE), color, thickness, kind)
    }
}

/// Places each bundle offset around `center`, `perp` being the horizontal unit
/// vector across the span.
pub fn bundle_points(center: Vec3, perp: Vec3, offsets: &[BundleOffset], size: f64) -> Vec<Vec3> {
    offsets
        .iter()
        .map(|o| center + perp.scale(o.h * size) + Vec3::UP.scale(o.v * size))
        .collect()
}

/// Attachment hardware at one end of a span.
///
/// Four-conductor bundles get a square frame with both diagonals, a rod up to
/// the tower arm and a red tip on every corner. Other bundles get a short
/// vertical bar.
pub fn anchor_structure(
    center: Vec3,
    perp: Vec3,
    conductor_count: usize,
    spacing: f64,
    spacer_size: f64,
) -> Vec<LocalSegment> {
    if conductor_count != 4 {
        let half = Vec3::UP.scale(ANCHOR_BAR_HALF_LENGTH);
        return vec![LocalSegment::new(
            center - half,
            center + half,
            HARDWARE_BLACK,
            ANCHOR_BAR_THICKNESS,
            HardwareKind::AnchorBar,
        )];
    }

    let size = spacer_size * ANCHOR_SIZE_FACTOR;
    let c = bundle_points(center, perp, &pattern(4, spacing), size);

    let frame = |a: Vec3, b: Vec3| {
        LocalSegment::new(
            a,
            b,
            HARDWARE_BLACK,
            ANCHOR_FRAME_THICKNESS,
            HardwareKind::AnchorFrame,
        )
    };

    let mut out = vec![
        frame(c[0], c[3]),
        frame(c[1], c[2]),
        frame(c[0], c[1]),
        frame(c[1], c[2]),
        frame(c[2], c[3]),
        frame(c[3], c[0]),
        LocalSegment::new(
            center,
            center + Vec3::UP.scale(ANCHOR_ROD_LENGTH),
            ANCHOR_ROD_COLOR,
            ANCHOR_ROD_THICKNESS,
            HardwareKind::AnchorRod,
        ),
    ];
    out.extend(
        c.iter()
            .map(|&p| LocalSegment::rising(p, ANCHOR_TIP_COLOR, ANCHOR_TIP_THICKNESS, HardwareKind::AnchorTip)),
    );
    out
}

/// Visual parameters of an in-span spacer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpacerStyle {
    pub size: f64,
    pub thickness: f64,
    pub color: Rgb,
}

/// Spacer damper at `center`.
///
/// Bundles of three or more get a closed ring of arms, each carrying darker
/// insulator sheds; a pair gets a single arm. Every conductor gets a clamp.
pub fn spacer_structure(
    center: Vec3,
    perp: Vec3,
    offsets: &[BundleOffset],
    style: SpacerStyle,
) -> Vec<LocalSegment> {
    let points = bundle_points(center, perp, offsets, style.size);
    let n = points.len();
    let mut out = Vec::new();

    if n > 2 {
        let shed_color = darken(style.color, SHED_DARKEN);
        let shed_thickness = style.thickness * SHED_THICKNESS_FACTOR;
        for k in 0..n {
            let a = points[k];
            let b = points[(k + 1) % n];
            out.push(LocalSegment::new(
                a,
                b,
                style.color,
                style.thickness,
                HardwareKind::SpacerArm,
            ));
            for s in 1..=SHEDS_PER_ARM {
                let at = a.lerp(b, s as f64 / (SHEDS_PER_ARM + 1) as f64);
                let rise = Vec3::UP.scale(MARKER_RISE);
                out.push(LocalSegment::new(
                    at - rise,
                    at + rise,
                    shed_color,
                    shed_thickness,
                    HardwareKind::SpacerShed,
                ));
            }
        }
    } else if n == 2 {
        out.push(LocalSegment::new(
            points[0],
            points[1],
            style.color,
            style.thickness,
            HardwareKind::SpacerArm,
        ));
    }

    let clamp_thickness = style.thickness * CLAMP_THICKNESS_FACTOR;
    out.extend(
        points
            .iter()
            .map(|&p| LocalSegment::rising(p, CLAMP_COLOR, clamp_thickness, HardwareKind::SpacerClamp)),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{SpacerStyle, anchor_drop, anchor_structure, spacer_structure};
    use crate::bundle::pattern;
    use foundation::math::Vec3;
    use scene::components::HardwareKind;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn count(segs: &[super::LocalSegment], kind: HardwareKind) -> usize {
        segs.iter().filter(|s| s.kind == kind).count()
    }

    const EAST: Vec3 = Vec3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    #[test]
    fn quad_anchor_layout() {
        let center = Vec3::new(0.0, 0.0, 30.0);
        let segs = anchor_structure(center, EAST, 4, 0.4, 1.1);
        assert_eq!(segs.len(), 11);
        assert_eq!(count(&segs, HardwareKind::AnchorFrame), 6);
        assert_eq!(count(&segs, HardwareKind::AnchorRod), 1);
        assert_eq!(count(&segs, HardwareKind::AnchorTip), 4);

        let rod = segs
            .iter()
            .find(|s| s.kind == HardwareKind::AnchorRod)
            .expect("rod");
        assert_eq!(rod.a, center);
        assert_close(rod.b.z, 32.0, 1e-12);

        // First diagonal joins corner 0 (left, up) to corner 3 (right, down).
        let half = 0.2 * 1.1 * 1.2;
        assert_close(segs[0].a.x, -half, 1e-12);
        assert_close(segs[0].a.z, 30.0 + half, 1e-12);
        assert_close(segs[0].b.x, half, 1e-12);
        assert_close(segs[0].b.z, 30.0 - half, 1e-12);
    }

    #[test]
    fn other_bundles_get_a_bar() {
        let segs = anchor_structure(Vec3::ZERO, EAST, 2, 0.4, 1.1);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, HardwareKind::AnchorBar);
        assert_close(segs[0].b.z - segs[0].a.z, 1.0, 1e-12);
        assert_eq!(anchor_drop(2), 0.0);
        assert_eq!(anchor_drop(4), -1.5);
    }

    #[test]
    fn quad_spacer_has_arms_sheds_and_clamps() {
        let style = SpacerStyle {
            size: 1.1,
            thickness: 0.2,
            color: [20, 100, 20],
        };
        let segs = spacer_structure(Vec3::ZERO, EAST, &pattern(4, 0.4), style);
        assert_eq!(count(&segs, HardwareKind::SpacerArm), 4);
        assert_eq!(count(&segs, HardwareKind::SpacerShed), 12);
        assert_eq!(count(&segs, HardwareKind::SpacerClamp), 4);

        let shed = segs
            .iter()
            .find(|s| s.kind == HardwareKind::SpacerShed)
            .expect("shed");
        assert_eq!(shed.color, [0, 60, 0]);
        assert_close(shed.thickness, 0.5, 1e-12);
        let clamp = segs
            .iter()
            .find(|s| s.kind == HardwareKind::SpacerClamp)
            .expect("clamp");
        assert_close(clamp.thickness, 0.6, 1e-12);
    }

    #[test]
    fn pair_spacer_is_single_arm() {
        let style = SpacerStyle {
            size: 1.0,
            thickness: 0.2,
            color: [1, 1, 1],
        };
        let segs = spacer_structure(Vec3::ZERO, EAST, &pattern(2, 0.4), style);
        assert_eq!(count(&segs, HardwareKind::SpacerArm), 1);
        assert_eq!(count(&segs, HardwareKind::SpacerShed), 0);
        assert_eq!(count(&segs, HardwareKind::SpacerClamp), 2);
    }
}
