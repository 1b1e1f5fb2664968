use foundation::ids::TowerId;
use serde::Serialize;

use super::LngLatAlt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerLabel {
    pub tower: TowerId,
    pub text: String,
    pub position: LngLatAlt,
}
