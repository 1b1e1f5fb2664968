use foundation::ids::TowerId;
use runtime::revision::{Revision, RevisionGate};
use scene::ProjectState;
use scene::components::{CablePath, HardwareSegment, SignalSphere, TowerLabel, TowerTransform};
use serde::Serialize;
use tracing::debug;

use crate::labels::{LabelsConfig, LabelsLayer};
use crate::lines::{LinesLayer, SceneStats};
use crate::towers::TowersLayer;

/// Everything the renderer draws for one project revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineScene {
    pub revision: u64,
    pub cables: Vec<CablePath>,
    pub hardware: Vec<HardwareSegment>,
    pub spheres: Vec<SignalSphere>,
    pub towers: Vec<TowerTransform>,
    pub labels: Vec<TowerLabel>,
    pub stats: SceneStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SceneKey {
    revision: Revision,
    pending_start: Option<TowerId>,
}

#[derive(Debug, Clone, PartialEq)]
struct Cached {
    key: SceneKey,
    scene: LineScene,
}

/// Memoized scene assembly keyed by project revision.
///
/// Synchronous callers use [`SceneRebuilder::rebuild`]. Callers that build
/// elsewhere use [`SceneRebuilder::begin`], [`SceneRebuilder::build`] and
/// [`SceneRebuilder::complete`]; a result for a superseded revision is
/// dropped whole.
#[derive(Debug, Clone)]
pub struct SceneRebuilder {
    lines: LinesLayer,
    towers: TowersLayer,
    labels: LabelsLayer,
    gate: RevisionGate,
    current: Option<Cached>,
}

impl Default for SceneRebuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRebuilder {
    pub fn new() -> Self {
        Self {
            lines: LinesLayer::new(1),
            towers: TowersLayer::new(2),
            labels: LabelsLayer::new(3, LabelsConfig::default()),
            gate: RevisionGate::new(),
            current: None,
        }
    }

    /// Pure assembly of every layer.
    pub fn build(&self, project: &ProjectState, pending_start: Option<TowerId>) -> LineScene {
        assemble(&self.lines, &self.towers, &self.labels, project, pending_start)
    }

    /// Returns the scene for `project`, rebuilding only if the revision or the
    /// highlighted tower changed.
    pub fn rebuild(&mut self, project: &ProjectState, pending_start: Option<TowerId>) -> &LineScene {
        let key = SceneKey {
            revision: project.revision(),
            pending_start,
        };
        if self.current.as_ref().is_some_and(|c| c.key != key) {
            self.current = None;
        }

        let cached = self.current.get_or_insert_with(|| {
            let ticket = self.gate.begin(key.revision);
            let scene = assemble(&self.lines, &self.towers, &self.labels, project, pending_start);
            self.gate.accept(ticket);
            debug!(revision = key.revision.0, "scene rebuilt");
            Cached { key, scene }
        });
        &cached.scene
    }

    /// Registers a rebuild for the project's current revision.
    pub fn begin(&mut self, project: &ProjectState) -> Revision {
        self.gate.begin(project.revision())
    }

    /// Installs a finished scene unless a newer rebuild has begun since `ticket`.
    pub fn complete(
        &mut self,
        ticket: Revision,
        pending_start: Option<TowerId>,
        scene: LineScene,
    ) -> bool {
        if !self.gate.accept(ticket) {
            debug!(revision = ticket.0, "stale scene dropped");
            return false;
        }
        self.current = Some(Cached {
            key: SceneKey {
                revision: ticket,
                pending_start,
            },
            scene,
        });
        true
    }

    pub fn current(&self) -> Option<&LineScene> {
        self.current.as_ref().map(|c| &c.scene)
    }
}

fn assemble(
    lines: &LinesLayer,
    towers: &TowersLayer,
    labels: &LabelsLayer,
    project: &ProjectState,
    pending_start: Option<TowerId>,
) -> LineScene {
    let lines = lines.extract(project);
    LineScene {
        revision: project.revision().0,
        cables: lines.cables,
        hardware: lines.hardware,
        spheres: lines.spheres,
        towers: towers.extract(project, pending_start).towers,
        labels: labels.extract(project).labels,
        stats: lines.stats,
    }
}
