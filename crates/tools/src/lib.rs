//! Batch operations behind the `linework` binary.

use std::path::Path;

use compute::catenary;
use compute::orientation::auto_rotate;
use formats::model_scan::{UpAxis, scan_model};
use formats::{FormatError, ImportReport, ProjectFile};
use foundation::math::{LocalFrame, bearing_deg, normalize_degrees};
use layers::{LineScene, SceneRebuilder};
use scene::{ProjectState, SceneSettings};
use serde::Serialize;
use tracing::{info, warn};

/// Command-line settings that win over the ones stored in the project.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsOverride {
    pub scale: Option<f64>,
    pub tower_elevation: Option<f64>,
    pub adaptive_lod: bool,
}

impl SettingsOverride {
    pub fn apply(&self, settings: SceneSettings) -> SceneSettings {
        SceneSettings {
            scale: self.scale.filter(|s| *s > 0.0).unwrap_or(settings.scale),
            tower_elevation: self.tower_elevation.unwrap_or(settings.tower_elevation),
            adaptive_lod: settings.adaptive_lod || self.adaptive_lod,
        }
    }
}

pub fn load_project(
    path: &Path,
    overrides: &SettingsOverride,
) -> Result<(ProjectState, ImportReport), FormatError> {
    let (mut project, report) = ProjectFile::load(path)?.into_project()?;
    for named in &report.unresolved {
        warn!("connection {} -> {} dropped: unknown tower", named.from, named.to);
    }
    let settings = overrides.apply(project.settings());
    project.set_settings(settings);
    Ok((project, report))
}

pub fn build_scene(project: &ProjectState) -> LineScene {
    let scene = SceneRebuilder::new().build(project, None);
    info!(
        spans = scene.stats.spans_built,
        cables = scene.cables.len(),
        hardware = scene.hardware.len(),
        "scene built"
    );
    scene
}

/// Re-orients every connected tower. Returns the number of towers turned.
pub fn orient_project(project: &mut ProjectState) -> usize {
    let rotations = auto_rotate(project);
    project.apply_rotations(&rotations)
}

/// Replaces the first three phase offsets with a tower model's attachment points.
pub fn scan_into_project(
    project: &mut ProjectState,
    gltf_json: &str,
    up: Option<UpAxis>,
) -> Result<usize, FormatError> {
    let scan = scan_model(gltf_json, up)?;
    let mut phases = project.phases().to_vec();
    let applied = scan.apply(&mut phases);
    project.set_phases(phases);
    Ok(applied)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSag {
    pub phase_id: String,
    pub sag_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanSummary {
    pub from: String,
    pub to: String,
    pub length_m: f64,
    /// Clockwise from north, in `[0, 360)`.
    pub bearing_deg: f64,
    pub sags: Vec<PhaseSag>,
}

/// Horizontal length, bearing and midspan sag per enabled phase, per connection.
pub fn span_summaries(project: &ProjectState) -> Vec<SpanSummary> {
    project
        .connections()
        .iter()
        .filter_map(|conn| {
            let from = project.tower(conn.from)?;
            let to = project.tower(conn.to)?;
            let frame = LocalFrame::new(from.position.lat_lng());
            let length_m = frame.to_local(to.position).horizontal_length();
            let sags = project
                .phases()
                .iter()
                .filter(|p| p.enabled)
                .map(|p| PhaseSag {
                    phase_id: p.id.clone(),
                    sag_m: catenary::sag(length_m, p.tension),
                })
                .collect();
            Some(SpanSummary {
                from: from.name.clone(),
                to: to.name.clone(),
                length_m,
                bearing_deg: normalize_degrees(bearing_deg(
                    from.position.lat_lng(),
                    to.position.lat_lng(),
                )),
                sags,
            })
        })
        .collect()
}
