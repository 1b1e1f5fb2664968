use std::collections::BTreeSet;

use foundation::ids::TowerId;

/// Towers the user has hidden. Spans touching a hidden tower are not drawn.
///
/// Ordering contract:
/// - Iteration yields ids in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenSet {
    ids: BTreeSet<TowerId>,
}

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, tower: TowerId) -> bool {
        self.ids.contains(&tower)
    }

    /// Returns `true` if the set changed.
    pub fn hide(&mut self, tower: TowerId) -> bool {
        self.ids.insert(tower)
    }

    /// Returns `true` if the set changed.
    pub fn show(&mut self, tower: TowerId) -> bool {
        self.ids.remove(&tower)
    }

    /// Flips visibility; returns `true` if the tower is now hidden.
    pub fn toggle(&mut self, tower: TowerId) -> bool {
        if self.ids.remove(&tower) {
            false
        } else {
            self.ids.insert(tower);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TowerId> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<TowerId> for HiddenSet {
    fn from_iter<I: IntoIterator<Item = TowerId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
