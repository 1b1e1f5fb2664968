use std::collections::BTreeMap;

use foundation::ids::TowerId;
use foundation::math::GeoPosition;
use serde::{Deserialize, Serialize};

/// Structure height used when a tower record carries none (metres).
pub const DEFAULT_TOWER_HEIGHT_M: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub name: String,
    pub position: GeoPosition,
    pub rotation_deg: Option<f64>,
    pub height_m: Option<f64>,
    /// Production/activity tags. Only used to colour the tower.
    pub status_tags: Vec<String>,
}

impl Tower {
    pub fn height_or_default(&self) -> f64 {
        match self.height_m {
            Some(h) if h.is_finite() && h > 0.0 => h,
            _ => DEFAULT_TOWER_HEIGHT_M,
        }
    }
}

/// Tower data before an id is assigned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TowerDraft {
    pub name: String,
    pub position: GeoPosition,
    pub rotation_deg: Option<f64>,
    pub height_m: Option<f64>,
    pub status_tags: Vec<String>,
}

impl TowerDraft {
    pub fn new(name: impl Into<String>, position: GeoPosition) -> Self {
        Self {
            name: name.into(),
            position,
            ..Self::default()
        }
    }
}

/// Name key used for case-insensitive uniqueness.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Ordered tower collection with stable ids and case-insensitive unique names.
///
/// Ordering contract:
/// - Iteration yields towers in first-insertion order.
/// - Upserting an existing name replaces the data in place and keeps the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TowerRegistry {
    next_id: u64,
    towers: Vec<Tower>,
    by_id: BTreeMap<TowerId, usize>,
    by_name: BTreeMap<String, TowerId>,
}

impl TowerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tower> + '_ {
        self.towers.iter()
    }

    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.by_id.get(&id).map(|&idx| &self.towers[idx])
    }

    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        let idx = *self.by_id.get(&id)?;
        self.towers.get_mut(idx)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tower> {
        let id = self.by_name.get(&normalize_name(name))?;
        self.get(*id)
    }

    pub fn id_for_name(&self, name: &str) -> Option<TowerId> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    /// Inserts or replaces (by normalized name) a tower.
    ///
    /// Returns the tower's id and whether an existing tower was replaced.
    pub fn upsert(&mut self, draft: TowerDraft) -> (TowerId, bool) {
        let key = normalize_name(&draft.name);
        if let Some(&id) = self.by_name.get(&key) {
            let idx = self.by_id[&id];
            self.towers[idx] = Tower {
                id,
                name: draft.name,
                position: draft.position,
                rotation_deg: draft.rotation_deg,
                height_m: draft.height_m,
                status_tags: draft.status_tags,
            };
            return (id, true);
        }

        let id = TowerId::new(self.next_id);
        self.next_id += 1;
        self.by_id.insert(id, self.towers.len());
        self.by_name.insert(key, id);
        self.towers.push(Tower {
            id,
            name: draft.name,
            position: draft.position,
            rotation_deg: draft.rotation_deg,
            height_m: draft.height_m,
            status_tags: draft.status_tags,
        });
        (id, false)
    }

    pub fn clear(&mut self) {
        self.towers.clear();
        self.by_id.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerDraft, TowerRegistry, normalize_name};
    use foundation::math::GeoPosition;

    #[test]
    fn names_normalize_trim_upper() {
        assert_eq!(normalize_name("  t-01a "), "T-01A");
    }

    #[test]
    fn upsert_is_case_insensitive_last_write_wins() {
        let mut reg = TowerRegistry::new();
        let (a, replaced) = reg.upsert(TowerDraft::new("T-1", GeoPosition::new(0.0, 0.0, 10.0)));
        assert!(!replaced);
        let (b, _) = reg.upsert(TowerDraft::new("T-2", GeoPosition::new(0.01, 0.0, 12.0)));
        let (a2, replaced) =
            reg.upsert(TowerDraft::new(" t-1 ", GeoPosition::new(0.0, 0.001, 11.0)));

        assert!(replaced);
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
        let t = reg.get(a).expect("tower");
        assert_eq!(t.name, " t-1 ");
        assert_eq!(t.position.alt, 11.0);
        assert_eq!(reg.find_by_name("T-1").map(|t| t.id), Some(a));

        let order: Vec<_> = reg.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn default_height() {
        let mut reg = TowerRegistry::new();
        let (id, _) = reg.upsert(TowerDraft::new("X", GeoPosition::default()));
        assert_eq!(reg.get(id).map(|t| t.height_or_default()), Some(30.0));
    }
}
