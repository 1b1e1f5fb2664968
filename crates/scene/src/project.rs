use std::collections::BTreeMap;

use foundation::ids::TowerId;
use foundation::math::GeoPosition;
use runtime::revision::Revision;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::{Connection, ConnectionChange, ConnectionSet};
use crate::phase::{NOMINAL_SCALE, PhaseConfig, default_phases};
use crate::tower::{Tower, TowerDraft, TowerRegistry};
use crate::visibility::HiddenSet;

/// Global synthesis settings.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSettings {
    /// Phase offsets and sizes are multiplied by `scale / 50`.
    pub scale: f64,
    /// Added to every tower's base altitude (metres).
    pub tower_elevation: f64,
    /// Pick catenary segment counts from span length instead of fixed counts.
    pub adaptive_lod: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            scale: NOMINAL_SCALE,
            tower_elevation: 4.0,
            adaptive_lod: false,
        }
    }
}

/// Complete editable state of one project.
///
/// Every mutation bumps [`ProjectState::revision`], which is what rebuilds key on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectState {
    towers: TowerRegistry,
    connections: ConnectionSet,
    phases: Vec<PhaseConfig>,
    settings: SceneSettings,
    altitude_overrides: BTreeMap<TowerId, f64>,
    hidden: HiddenSet,
    revision: Revision,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::with_phases(default_phases())
    }
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phases(phases: Vec<PhaseConfig>) -> Self {
        Self {
            towers: TowerRegistry::new(),
            connections: ConnectionSet::new(),
            phases,
            settings: SceneSettings::default(),
            altitude_overrides: BTreeMap::new(),
            hidden: HiddenSet::new(),
            revision: Revision::fresh(),
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = Revision::fresh();
    }

    pub fn towers(&self) -> &TowerRegistry {
        &self.towers
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(id)
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn phases(&self) -> &[PhaseConfig] {
        &self.phases
    }

    pub fn settings(&self) -> SceneSettings {
        self.settings
    }

    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn altitude_overrides(&self) -> &BTreeMap<TowerId, f64> {
        &self.altitude_overrides
    }

    pub fn altitude_override(&self, id: TowerId) -> Option<f64> {
        self.altitude_overrides.get(&id).copied()
    }

    pub fn is_visible(&self, id: TowerId) -> bool {
        !self.hidden.contains(id)
    }

    /// Tower position with its altitude override applied.
    pub fn resolved_position(&self, id: TowerId) -> Option<GeoPosition> {
        let tower = self.towers.get(id)?;
        let alt = self
            .altitude_override(id)
            .unwrap_or(tower.position.alt);
        Some(tower.position.with_alt(alt))
    }

    pub fn upsert_tower(&mut self, draft: TowerDraft) -> TowerId {
        let (id, replaced) = self.towers.upsert(draft);
        if replaced {
            debug!("tower {id} replaced by a same-named record");
        }
        self.touch();
        id
    }

    pub fn connect(&mut self, conn: Connection) -> ConnectionChange {
        if self.towers.get(conn.from).is_none() || self.towers.get(conn.to).is_none() {
            debug!("connection {} -> {} references an unknown tower", conn.from, conn.to);
        }
        let change = self.connections.insert(conn);
        if change != ConnectionChange::Ignored {
            self.touch();
        }
        change
    }

    pub fn set_connections(&mut self, connections: ConnectionSet) {
        self.connections = connections;
        self.touch();
    }

    pub fn set_phases(&mut self, phases: Vec<PhaseConfig>) {
        self.phases = phases;
        self.touch();
    }

    /// Edits one phase in place by id. Returns `false` if no phase has that id.
    pub fn update_phase(&mut self, id: &str, edit: impl FnOnce(&mut PhaseConfig)) -> bool {
        let Some(phase) = self.phases.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        edit(phase);
        self.touch();
        true
    }

    pub fn set_settings(&mut self, settings: SceneSettings) {
        if self.settings != settings {
            self.settings = settings;
            self.touch();
        }
    }

    pub fn set_altitude_override(&mut self, id: TowerId, alt: f64) {
        if !alt.is_finite() {
            return;
        }
        self.altitude_overrides.insert(id, alt);
        self.touch();
    }

    pub fn replace_altitude_overrides(&mut self, overrides: BTreeMap<TowerId, f64>) {
        if self.altitude_overrides != overrides {
            self.altitude_overrides = overrides;
            self.touch();
        }
    }

    pub fn set_hidden(&mut self, id: TowerId, hidden: bool) {
        let changed = if hidden {
            self.hidden.hide(id)
        } else {
            self.hidden.show(id)
        };
        if changed {
            self.touch();
        }
    }

    /// Flips a tower's visibility; returns `true` if it is now hidden.
    pub fn toggle_hidden(&mut self, id: TowerId) -> bool {
        let now_hidden = self.hidden.toggle(id);
        self.touch();
        now_hidden
    }

    /// Folds computed rotations (degrees) into the tower records.
    pub fn apply_rotations(&mut self, rotations: &[(TowerId, f64)]) -> usize {
        let mut applied = 0;
        for &(id, deg) in rotations {
            if let Some(tower) = self.towers.get_mut(id) {
                tower.rotation_deg = Some(deg);
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectState, SceneSettings};
    use crate::connection::{Connection, ConnectionChange};
    use crate::tower::TowerDraft;
    use foundation::ids::TowerId;
    use foundation::math::GeoPosition;

    #[test]
    fn override_replaces_base_altitude() {
        let mut p = ProjectState::new();
        let id = p.upsert_tower(TowerDraft::new("A", GeoPosition::new(0.0, 0.0, 100.0)));
        assert_eq!(p.resolved_position(id).map(|g| g.alt), Some(100.0));
        p.set_altitude_override(id, 87.5);
        assert_eq!(p.resolved_position(id).map(|g| g.alt), Some(87.5));
        p.set_altitude_override(id, f64::NAN);
        assert_eq!(p.altitude_override(id), Some(87.5));
        assert_eq!(p.resolved_position(TowerId(99)), None);
    }

    #[test]
    fn mutations_bump_revision() {
        let mut p = ProjectState::new();
        let r0 = p.revision();
        let a = p.upsert_tower(TowerDraft::new("A", GeoPosition::default()));
        let b = p.upsert_tower(TowerDraft::new("B", GeoPosition::new(0.01, 0.0, 0.0)));
        assert!(p.revision() > r0);

        let r1 = p.revision();
        assert_eq!(p.connect(Connection::new(a, a)), ConnectionChange::Ignored);
        assert_eq!(p.revision(), r1);
        assert_eq!(p.connect(Connection::new(a, b)), ConnectionChange::Added);
        assert!(p.revision() > r1);

        let r2 = p.revision();
        p.set_settings(SceneSettings::default());
        assert_eq!(p.revision(), r2);
        p.set_hidden(a, true);
        assert!(p.revision() > r2);
        assert!(!p.is_visible(a));
    }

    #[test]
    fn update_phase_by_id() {
        let mut p = ProjectState::new();
        assert!(p.update_phase("A_L", |ph| ph.enabled = false));
        assert!(!p.phases().iter().any(|ph| ph.id == "A_L" && ph.enabled));
        assert!(!p.update_phase("missing", |_| {}));
    }

    #[test]
    fn rotations_apply_to_known_towers() {
        let mut p = ProjectState::new();
        let a = p.upsert_tower(TowerDraft::new("A", GeoPosition::default()));
        let applied = p.apply_rotations(&[(a, 45.0), (TowerId(42), 10.0)]);
        assert_eq!(applied, 1);
        assert_eq!(p.tower(a).and_then(|t| t.rotation_deg), Some(45.0));
    }
}
