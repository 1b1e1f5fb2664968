use serde::Serialize;

use super::{LngLatAlt, all_finite};
use crate::phase::Rgb;

/// Aircraft-warning marker ball hung on a conductor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSphere {
    pub position: LngLatAlt,
    pub color: Rgb,
    pub radius: f64,
    pub phase_id: String,
}

impl SignalSphere {
    pub fn is_finite(&self) -> bool {
        self.radius.is_finite() && all_finite(&self.position)
    }
}
