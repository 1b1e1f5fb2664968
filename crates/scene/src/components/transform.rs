use foundation::ids::TowerId;
use serde::Serialize;

use super::LngLatAlt;

/// Placement of one tower model instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerTransform {
    pub tower: TowerId,
    pub position: LngLatAlt,
    /// Yaw in degrees clockwise from north.
    pub rotation_deg: f64,
    /// Uniform model scale.
    pub scale: f64,
    /// Set while the tower is the pending start of a connection edit.
    pub highlighted: bool,
    pub status_tags: Vec<String>,
}
