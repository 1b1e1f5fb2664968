use foundation::ids::TowerId;
use foundation::math::{LatLng, bearing_deg, normalize_signed_degrees};
use scene::ProjectState;
use tracing::debug;

/// Rotations that differ from the stored value by this much or less are not reported.
pub const ROTATION_EPSILON_DEG: f64 = 0.1;

/// Yaw (degrees) that makes a tower face along its line.
///
/// With one neighbour the tower points at it. With two or more, only the first
/// two are used and the tower bisects the angle between them. Without
/// neighbours there is nothing to align to.
pub fn orient(tower: LatLng, neighbours: &[LatLng]) -> Option<f64> {
    match neighbours {
        [] => None,
        [only] => Some(bearing_deg(tower, *only)),
        [first, second, ..] => {
            let b1 = bearing_deg(tower, *first);
            let b2 = bearing_deg(tower, *second);
            let diff = normalize_signed_degrees(b2 - b1);
            Some(b1 + diff / 2.0)
        }
    }
}

/// Computes new rotations for every tower with at least one connected neighbour.
///
/// Neighbours are found through connections in either direction, in connection
/// order. Only towers whose rotation changes by more than
/// [`ROTATION_EPSILON_DEG`] (compared modulo 360°) are returned; a missing
/// rotation counts as zero.
pub fn auto_rotate(project: &ProjectState) -> Vec<(TowerId, f64)> {
    let mut updates = Vec::new();
    for tower in project.towers().iter() {
        let neighbours: Vec<LatLng> = project
            .connections()
            .neighbors(tower.id)
            .into_iter()
            .filter_map(|id| project.tower(id))
            .map(|t| t.position.lat_lng())
            .collect();

        let Some(rotation) = orient(tower.position.lat_lng(), &neighbours) else {
            continue;
        };
        if !rotation.is_finite() {
            continue;
        }
        let current = tower.rotation_deg.unwrap_or(0.0);
        if normalize_signed_degrees(rotation - current).abs() > ROTATION_EPSILON_DEG {
            updates.push((tower.id, rotation));
        }
    }
    debug!("auto-rotate: {} tower(s) changed", updates.len());
    updates
}
