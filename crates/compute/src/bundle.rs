/// Offset of one sub-conductor inside a bundle, as (horizontal, vertical)
/// in the plane perpendicular to the span.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BundleOffset {
    pub h: f64,
    pub v: f64,
}

impl BundleOffset {
    const fn new(h: f64, v: f64) -> Self {
        Self { h, v }
    }
}

/// Sub-conductor layout for a bundle of `count` conductors with the given spacing.
///
/// Square for four, triangle (apex up) for three, horizontal pair for two.
/// Counts outside 1..=4 are clamped.
pub fn pattern(count: usize, spacing: f64) -> Vec<BundleOffset> {
    let s = spacing;
    match count.clamp(1, 4) {
        4 => vec![
            BundleOffset::new(-s / 2.0, s / 2.0),
            BundleOffset::new(s / 2.0, s / 2.0),
            BundleOffset::new(-s / 2.0, -s / 2.0),
            BundleOffset::new(s / 2.0, -s / 2.0),
        ],
        3 => vec![
            BundleOffset::new(0.0, s * 0.577),
            BundleOffset::new(-s / 2.0, -s * 0.288),
            BundleOffset::new(s / 2.0, -s * 0.288),
        ],
        2 => vec![
            BundleOffset::new(-s / 2.0, 0.0),
            BundleOffset::new(s / 2.0, 0.0),
        ],
        _ => vec![BundleOffset::new(0.0, 0.0)],
    }
}

#[cfg(test)]
mod tests {
    use super::{BundleOffset, pattern};
    use pretty_assertions::assert_eq;

    #[test]
    fn quad_is_square() {
        assert_eq!(
            pattern(4, 0.4),
            vec![
                BundleOffset { h: -0.2, v: 0.2 },
                BundleOffset { h: 0.2, v: 0.2 },
                BundleOffset { h: -0.2, v: -0.2 },
                BundleOffset { h: 0.2, v: -0.2 },
            ]
        );
    }

    #[test]
    fn counts_are_clamped() {
        assert_eq!(pattern(0, 1.0).len(), 1);
        assert_eq!(pattern(7, 1.0).len(), 4);
        assert_eq!(pattern(3, 1.0)[0], BundleOffset { h: 0.0, v: 0.577 });
    }
}
