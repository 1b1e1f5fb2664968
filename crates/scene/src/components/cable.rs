use foundation::ids::TowerId;
use serde::Serialize;

use super::{LngLatAlt, all_finite};
use crate::phase::Rgb;

/// One rendered conductor of a bundle across a single span.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CablePath {
    pub from: TowerId,
    pub to: TowerId,
    pub phase_id: String,
    /// Index inside the bundle, `0..conductor_count`.
    pub conductor: usize,
    pub path: Vec<LngLatAlt>,
    pub color: Rgb,
    pub width: f64,
}

impl CablePath {
    /// Stable key unique per span, `"{phase}-{conductor}"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.phase_id, self.conductor)
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.path.iter().all(all_finite)
    }
}
