use foundation::ids::TowerId;
use serde::{Deserialize, Serialize};

/// One electrical span, directed `from -> to`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: TowerId,
    pub to: TowerId,
}

impl Connection {
    pub fn new(from: TowerId, to: TowerId) -> Self {
        Self { from, to }
    }

    pub fn touches(&self, tower: TowerId) -> bool {
        self.from == tower || self.to == tower
    }

    /// The endpoint opposite to `tower`, if `tower` is an endpoint.
    pub fn other(&self, tower: TowerId) -> Option<TowerId> {
        if self.from == tower {
            Some(self.to)
        } else if self.to == tower {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionChange {
    Added,
    Replaced(Connection),
    /// Self-connections are not spans.
    Ignored,
}

/// Single-next-span topology: at most one outgoing connection per tower.
///
/// Ordering contract:
/// - Iteration yields connections in insertion order.
/// - Replacing a tower's outgoing connection removes the old one and appends
///   the new one at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    items: Vec<Connection>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.items.iter()
    }

    pub fn outgoing(&self, from: TowerId) -> Option<&Connection> {
        self.items.iter().find(|c| c.from == from)
    }

    pub fn insert(&mut self, conn: Connection) -> ConnectionChange {
        if conn.from == conn.to {
            return ConnectionChange::Ignored;
        }
        let replaced = self
            .items
            .iter()
            .position(|c| c.from == conn.from)
            .map(|idx| self.items.remove(idx));
        self.items.push(conn);
        match replaced {
            Some(old) => ConnectionChange::Replaced(old),
            None => ConnectionChange::Added,
        }
    }

    /// Towers connected to `tower` in either direction, in connection order.
    pub fn neighbors(&self, tower: TowerId) -> Vec<TowerId> {
        self.items.iter().filter_map(|c| c.other(tower)).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<Connection> for ConnectionSet {
    fn from_iter<I: IntoIterator<Item = Connection>>(iter: I) -> Self {
        let mut set = ConnectionSet::new();
        for conn in iter {
            set.insert(conn);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::{Connection, ConnectionChange, ConnectionSet};
    use foundation::ids::TowerId;
    use pretty_assertions::assert_eq;

    fn t(n: u64) -> TowerId {
        TowerId::new(n)
    }

    #[test]
    fn same_from_replaces_and_moves_to_end() {
        let mut set = ConnectionSet::new();
        assert_eq!(set.insert(Connection::new(t(1), t(2))), ConnectionChange::Added);
        assert_eq!(set.insert(Connection::new(t(2), t(3))), ConnectionChange::Added);
        assert_eq!(
            set.insert(Connection::new(t(1), t(4))),
            ConnectionChange::Replaced(Connection::new(t(1), t(2)))
        );

        let got: Vec<_> = set.iter().copied().collect();
        assert_eq!(
            got,
            vec![Connection::new(t(2), t(3)), Connection::new(t(1), t(4))]
        );
        assert_eq!(set.outgoing(t(1)).map(|c| c.to), Some(t(4)));
    }

    #[test]
    fn self_connection_is_ignored() {
        let mut set = ConnectionSet::new();
        assert_eq!(set.insert(Connection::new(t(5), t(5))), ConnectionChange::Ignored);
        assert!(set.is_empty());
    }

    #[test]
    fn neighbors_follow_connection_order_both_directions() {
        let set: ConnectionSet = [
            Connection::new(t(1), t(2)),
            Connection::new(t(2), t(3)),
            Connection::new(t(4), t(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.neighbors(t(2)), vec![t(1), t(3), t(4)]);
        assert_eq!(set.neighbors(t(9)), Vec::<TowerId>::new());
    }
}
