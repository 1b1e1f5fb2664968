//! Phase offsets from the attachment points of a tower model.
//!
//! Reads the node translations of a glTF JSON document. The highest point
//! feeds the first phase, then every second point below it feeds the next.

use serde::Deserialize;
use tracing::{debug, warn};

use scene::phase::PhaseConfig;

use crate::error::FormatError;

/// Candidate indices (after sorting top to bottom) assigned to phases 0, 1, 2.
const PHASE_SLOTS: [usize; 3] = [0, 2, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpAxis {
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AttachmentPoint {
    pub fn height(&self, up: UpAxis) -> f64 {
        match up {
            UpAxis::Y => self.y,
            UpAxis::Z => self.z,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GltfDocument {
    #[serde(default)]
    nodes: Vec<GltfNode>,
}

#[derive(Debug, Deserialize)]
struct GltfNode {
    #[serde(default)]
    translation: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelScan {
    pub up: UpAxis,
    /// Sorted top to bottom.
    pub points: Vec<AttachmentPoint>,
}

impl ModelScan {
    /// Writes offsets into the first three phases. Returns how many were set.
    pub fn apply(&self, phases: &mut [PhaseConfig]) -> usize {
        let mut applied = 0;
        for (phase, slot) in phases.iter_mut().zip(PHASE_SLOTS) {
            let Some(point) = self.points.get(slot) else {
                break;
            };
            phase.vertical_offset = point.height(self.up);
            phase.horizontal_offset = point.x.abs();
            applied += 1;
        }
        applied
    }
}

fn range(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo.is_finite() { hi - lo } else { 0.0 }
}

/// Guesses the up axis for models that do not declare one.
pub fn infer_up_axis(points: &[AttachmentPoint]) -> UpAxis {
    let y_range = range(points.iter().map(|p| p.y));
    let z_range = range(points.iter().map(|p| p.z));
    if z_range > 2.0 * y_range {
        UpAxis::Z
    } else {
        UpAxis::Y
    }
}

pub fn attachment_points(gltf_json: &str) -> Result<Vec<AttachmentPoint>, FormatError> {
    let doc: GltfDocument = serde_json::from_str(gltf_json)?;
    let points: Vec<AttachmentPoint> = doc
        .nodes
        .iter()
        .filter_map(|node| match node.translation.as_deref()? {
            [x, y] => Some(AttachmentPoint { x: *x, y: *y, z: 0.0 }),
            [x, y, z, ..] => Some(AttachmentPoint { x: *x, y: *y, z: *z }),
            _ => None,
        })
        .filter(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
        .collect();
    if points.is_empty() {
        return Err(FormatError::Invalid(
            "model nodes carry no translation".to_string(),
        ));
    }
    Ok(points)
}

/// Scans a glTF document. `up` wins over the range heuristic when given.
pub fn scan_model(gltf_json: &str, up: Option<UpAxis>) -> Result<ModelScan, FormatError> {
    let mut points = attachment_points(gltf_json)?;
    let up = match up {
        Some(axis) => axis,
        None => {
            let guess = infer_up_axis(&points);
            warn!("model up axis not given, guessed {guess:?}");
            guess
        }
    };
    points.sort_by(|a, b| b.height(up).total_cmp(&a.height(up)));
    debug!("{} attachment points", points.len());
    Ok(ModelScan { up, points })
}

#[cfg(test)]
mod tests {
    use super::{UpAxis, attachment_points, infer_up_axis, scan_model};
    use crate::error::FormatError;
    use scene::phase::default_phases;

    const Y_UP: &str = r#"{"nodes":[
        {"translation":[-7.5, 20.0, 0.0]},
        {"name":"root"},
        {"translation":[6.0, 33.0, 0.1]},
        {"translation":[-6.0, 33.0, 0.0]},
        {"translation":[8.0, 27.0, 0.0]},
        {"translation":[-8.0, 27.0, 0.0]},
        {"translation":[7.5, 20.0, 0.0]}
    ]}"#;

    #[test]
    fn highest_points_feed_phases_in_order() {
        let scan = scan_model(Y_UP, None).expect("scan");
        assert_eq!(scan.up, UpAxis::Y);
        assert_eq!(scan.points.len(), 6);

        let mut phases = default_phases();
        assert_eq!(scan.apply(&mut phases), 3);
        assert_eq!(phases[0].vertical_offset, 33.0);
        assert_eq!(phases[1].vertical_offset, 27.0);
        assert_eq!(phases[1].horizontal_offset, 8.0);
        assert_eq!(phases[2].vertical_offset, 20.0);
        assert_eq!(phases[2].horizontal_offset, 7.5);
    }

    #[test]
    fn explicit_axis_overrides_heuristic() {
        let scan = scan_model(Y_UP, Some(UpAxis::Z)).expect("scan");
        assert_eq!(scan.up, UpAxis::Z);
        assert_eq!(scan.points[0].z, 0.1);
    }

    #[test]
    fn z_up_detected_from_ranges() {
        let points = attachment_points(
            r#"{"nodes":[{"translation":[1,0.2,30]},{"translation":[2,0.1,10]}]}"#,
        )
        .expect("points");
        assert_eq!(infer_up_axis(&points), UpAxis::Z);
    }

    #[test]
    fn few_points_fill_fewer_phases() {
        let scan = scan_model(r#"{"nodes":[{"translation":[3,40]}]}"#, None).expect("scan");
        let mut phases = default_phases();
        let before = phases[1].clone();
        assert_eq!(scan.apply(&mut phases), 1);
        assert_eq!(phases[0].horizontal_offset, 3.0);
        assert_eq!(phases[1], before);
    }

    #[test]
    fn no_translations_is_invalid() {
        let err = scan_model(r#"{"nodes":[{"name":"a"}]}"#, None).expect_err("scan");
        assert!(matches!(err, FormatError::Invalid(_)));
    }
}
