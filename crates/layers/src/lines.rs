use compute::span::{SpanInput, build_span, initial_spacer_cursor};
use scene::ProjectState;
use scene::components::{CablePath, HardwareSegment, SignalSphere};
use serde::Serialize;
use tracing::debug;

use crate::layer::{Layer, LayerId};

/// Counters for one assembly pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStats {
    /// (span, phase) pairs that produced geometry.
    pub spans_built: usize,
    pub skipped_missing_tower: usize,
    pub skipped_hidden: usize,
    pub skipped_degenerate: usize,
    pub cables: usize,
    pub hardware_segments: usize,
    pub spacers: usize,
    pub spheres: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LinesLayerSnapshot {
    pub cables: Vec<CablePath>,
    pub hardware: Vec<HardwareSegment>,
    pub spheres: Vec<SignalSphere>,
    pub stats: SceneStats,
}

/// Conductors, hardware and markers for every connection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinesLayer {
    id: LayerId,
}

impl LinesLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    /// Assembles the whole line scene.
    ///
    /// Connections are visited in order and, inside each, enabled phases in
    /// list order. Spacer cursors are seeded fresh on every call, so the output
    /// depends on nothing but `project`.
    pub fn extract(&self, project: &ProjectState) -> LinesLayerSnapshot {
        let phases = project.phases();
        let settings = project.settings();
        let mut cursors: Vec<f64> = phases
            .iter()
            .enumerate()
            .map(|(idx, p)| initial_spacer_cursor(p, idx))
            .collect();

        let mut out = LinesLayerSnapshot::default();
        let stats = &mut out.stats;

        for conn in project.connections().iter() {
            let (Some(start), Some(end)) = (
                project.resolved_position(conn.from),
                project.resolved_position(conn.to),
            ) else {
                debug!("span {} -> {} skipped: unknown tower", conn.from, conn.to);
                stats.skipped_missing_tower += 1;
                continue;
            };
            if !project.is_visible(conn.from) || !project.is_visible(conn.to) {
                stats.skipped_hidden += 1;
                continue;
            }

            for (idx, phase) in phases.iter().enumerate() {
                if !phase.enabled {
                    continue;
                }
                let input = SpanInput {
                    from: conn.from,
                    to: conn.to,
                    start,
                    end,
                    phase,
                    phase_index: idx,
                    settings,
                };
                let Some(geometry) = build_span(&input, &mut cursors[idx]) else {
                    stats.skipped_degenerate += 1;
                    continue;
                };
                stats.spans_built += 1;
                stats.spacers += geometry.spacers;
                out.cables.extend(geometry.cables);
                out.hardware.extend(geometry.hardware);
                out.spheres.extend(geometry.spheres);
            }
        }

        stats.cables = out.cables.len();
        stats.hardware_segments = out.hardware.len();
        stats.spheres = out.spheres.len();
        debug!(
            spans = stats.spans_built,
            cables = stats.cables,
            hardware = stats.hardware_segments,
            spheres = stats.spheres,
            "line scene assembled"
        );
        out
    }
}

impl Layer for LinesLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "lines"
    }
}

#[cfg(test)]
mod tests {
    use super::LinesLayer;
    use foundation::ids::TowerId;
    use foundation::math::{GeoPosition, LatLng, LocalFrame};
    use pretty_assertions::assert_eq;
    use scene::ProjectState;
    use scene::components::HardwareKind;
    use scene::connection::Connection;
    use scene::phase::PhaseConfig;
    use scene::tower::TowerDraft;

    fn quad_phase(id: &str) -> PhaseConfig {
        PhaseConfig {
            tension: 1800.0,
            cable_count: 4,
            spacer_interval: 30.0,
            ..PhaseConfig::new(id, id)
        }
    }

    fn two_tower_project(phases: Vec<PhaseConfig>) -> (ProjectState, TowerId, TowerId) {
        let mut p = ProjectState::with_phases(phases);
        let a = p.upsert_tower(TowerDraft::new("A", GeoPosition::new(0.0, 0.0, 0.0)));
        // B sits roughly 1.1 km due north of A.
        let b = p.upsert_tower(TowerDraft::new("B", GeoPosition::new(0.01, 0.0, 0.0)));
        p.connect(Connection::new(a, b));
        (p, a, b)
    }

    #[test]
    fn single_quad_span_scenario() {
        let (p, a, b) = two_tower_project(vec![quad_phase("A_L")]);
        let snap = LinesLayer::new(1).extract(&p);

        assert_eq!(snap.cables.len(), 4);
        assert_eq!(snap.stats.spans_built, 1);
        assert!(snap.stats.spacers >= 1);
        for cable in &snap.cables {
            assert_eq!(cable.path.len(), 21);
            let lowest = cable
                .path
                .iter()
                .map(|q| q[2])
                .fold(f64::INFINITY, f64::min);
            assert!(lowest < cable.path[0][2] - 50.0, "conductor should sag");
        }
        let rods: Vec<[f64; 3]> = snap
            .hardware
            .iter()
            .filter(|s| s.kind == HardwareKind::AnchorRod)
            .map(|s| s.path[0])
            .collect();
        assert_eq!(rods.len(), 2);

        let frame = LocalFrame::new(LatLng::new(0.0, 0.0));
        for tower in [a, b] {
            let at = frame.to_local(p.resolved_position(tower).expect("tower"));
            let nearest = rods
                .iter()
                .map(|r| {
                    let base = frame.to_local(GeoPosition::new(r[1], r[0], r[2]));
                    base.with_z(0.0).distance(at.with_z(0.0))
                })
                .fold(f64::INFINITY, f64::min);
            assert!(nearest < 3.0, "no anchor rod near tower {tower}: {nearest} m");
        }
    }

    #[test]
    fn disabled_and_hidden_produce_nothing() {
        let mut phase = quad_phase("A_L");
        phase.enabled = false;
        let (p, _, _) = two_tower_project(vec![phase]);
        assert!(LinesLayer::new(1).extract(&p).cables.is_empty());

        let (mut p, a, _) = two_tower_project(vec![quad_phase("A_L")]);
        p.set_hidden(a, true);
        let snap = LinesLayer::new(1).extract(&p);
        assert!(snap.cables.is_empty());
        assert_eq!(snap.stats.skipped_hidden, 1);
    }

    #[test]
    fn unknown_tower_is_skipped() {
        let (mut p, a, _) = two_tower_project(vec![quad_phase("A_L")]);
        p.connect(Connection::new(TowerId(77), a));
        let snap = LinesLayer::new(1).extract(&p);
        assert_eq!(snap.stats.skipped_missing_tower, 1);
        assert_eq!(snap.stats.spans_built, 1);
    }

    #[test]
    fn every_bundled_span_has_a_spacer() {
        let mut p = ProjectState::with_phases(vec![PhaseConfig {
            spacer_interval: 500.0,
            cable_count: 3,
            ..PhaseConfig::new("T", "Tri")
        }]);
        let ids: Vec<TowerId> = (0..4)
            .map(|i| {
                p.upsert_tower(TowerDraft::new(
                    format!("T{i}"),
                    GeoPosition::new(0.0, i as f64 * 0.0006, 0.0),
                ))
            })
            .collect();
        for w in ids.windows(2) {
            p.connect(Connection::new(w[0], w[1]));
        }
        let snap = LinesLayer::new(1).extract(&p);
        assert_eq!(snap.stats.spans_built, 3);
        assert_eq!(snap.stats.spacers, 3);
    }

    #[test]
    fn extraction_is_deterministic() {
        let (mut p, _, b) = two_tower_project(scene::default_phases());
        let c = p.upsert_tower(TowerDraft::new("C", GeoPosition::new(0.004, 0.018, 12.0)));
        p.connect(Connection::new(b, c));

        let layer = LinesLayer::new(1);
        let first = layer.extract(&p);
        let second = layer.extract(&p);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
        assert!(first.spheres.len() >= 4);
    }
}
