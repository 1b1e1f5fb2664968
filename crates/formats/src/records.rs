use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use foundation::math::GeoPosition;
use scene::tower::TowerDraft;

use crate::error::FormatError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Terrain-aligned base altitude saved from a previous session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Renderer-specific keys we carry through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One tower as exchanged with storage and importers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerRecord {
    #[serde(default, alias = "externalId", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[serde(default, alias = "altitude")]
    pub elevation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_tags: Vec<String>,
    #[serde(default)]
    pub display_settings: DisplaySettings,
}

impl TowerRecord {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            name: Some(name.into()),
            latitude,
            longitude,
            elevation,
            ..Self::default()
        }
    }

    /// Record name, or `T-{n}` (1-based) for unnamed records.
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("T-{}", index + 1),
        }
    }

    /// Saved ground elevation. Zero means "never aligned".
    pub fn ground_elevation(&self) -> Option<f64> {
        self.display_settings
            .ground_elevation
            .filter(|e| e.is_finite() && *e != 0.0)
    }

    pub fn is_hidden(&self) -> bool {
        self.display_settings.hidden.unwrap_or(false)
    }

    pub fn to_draft(&self, index: usize) -> TowerDraft {
        TowerDraft {
            name: self.display_name(index),
            position: GeoPosition::new(self.latitude, self.longitude, self.elevation),
            rotation_deg: self.rotation.filter(|r| r.is_finite()),
            height_m: self.height,
            status_tags: self.status_tags.clone(),
        }
    }
}

/// Parses a JSON array of tower records.
pub fn parse_records(payload: &str) -> Result<Vec<TowerRecord>, FormatError> {
    Ok(serde_json::from_str(payload)?)
}
