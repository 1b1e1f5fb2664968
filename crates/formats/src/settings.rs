use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use scene::phase::{PhaseConfig, default_phases};
use scene::{ProjectState, SceneSettings};

use crate::error::FormatError;

pub const SETTINGS_VERSION: u32 = 1;

fn settings_version() -> u32 {
    SETTINGS_VERSION
}

/// Connection as persisted: tower names, not ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedConnection {
    pub from: String,
    pub to: String,
}

/// Project-wide line settings blob.
///
/// Phases are stored as loose JSON objects so a saved phase may carry only the
/// fields that differ from its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default = "settings_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tower_elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_lod: Option<bool>,
    #[serde(default)]
    pub phases: Vec<Value>,
    #[serde(default)]
    pub connections: Vec<NamedConnection>,
    #[serde(default)]
    pub hidden_tower_ids: Vec<String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            scale: None,
            tower_elevation: None,
            adaptive_lod: None,
            phases: Vec::new(),
            connections: Vec::new(),
            hidden_tower_ids: Vec::new(),
        }
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

impl ProjectSettings {
    pub fn from_json(payload: &str) -> Result<Self, FormatError> {
        let settings: ProjectSettings = serde_json::from_str(payload)?;
        settings.check_version()?;
        Ok(settings)
    }

    pub fn check_version(&self) -> Result<(), FormatError> {
        if self.version > SETTINGS_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: self.version,
            });
        }
        Ok(())
    }

    /// Scene settings with defaults for anything missing.
    ///
    /// A zero or negative scale falls back to the default; the tower elevation
    /// keeps any finite value, negative offsets included.
    pub fn scene_settings(&self) -> SceneSettings {
        let defaults = SceneSettings::default();
        SceneSettings {
            scale: positive(self.scale).unwrap_or(defaults.scale),
            tower_elevation: self
                .tower_elevation
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.tower_elevation),
            adaptive_lod: self.adaptive_lod.unwrap_or(defaults.adaptive_lod),
        }
    }

    /// Saved phases merged field by field over the default phase set.
    ///
    /// Defaults keep their order; saved phases with unknown ids follow them.
    pub fn resolved_phases(&self) -> Result<Vec<PhaseConfig>, FormatError> {
        merge_phases(default_phases(), &self.phases)
    }

    /// Snapshot of `project`'s settings, connections and hidden set.
    pub fn from_project(project: &ProjectState) -> Result<Self, FormatError> {
        let name_of = |id| project.tower(id).map(|t| t.name.clone());
        let connections = project
            .connections()
            .iter()
            .filter_map(|c| {
                Some(NamedConnection {
                    from: name_of(c.from)?,
                    to: name_of(c.to)?,
                })
            })
            .collect();
        let hidden_tower_ids = project.hidden().iter().filter_map(name_of).collect();
        let phases = project
            .phases()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        let settings = project.settings();
        Ok(Self {
            version: SETTINGS_VERSION,
            scale: Some(settings.scale),
            tower_elevation: Some(settings.tower_elevation),
            adaptive_lod: Some(settings.adaptive_lod),
            phases,
            connections,
            hidden_tower_ids,
        })
    }
}

fn phase_id(v: &Value) -> Option<&str> {
    v.get("id").and_then(Value::as_str)
}

fn overlay(base: &mut Map<String, Value>, patch: &Value) {
    if let Value::Object(fields) = patch {
        for (k, v) in fields {
            base.insert(k.clone(), v.clone());
        }
    }
}

pub fn merge_phases(defaults: Vec<PhaseConfig>, saved: &[Value]) -> Result<Vec<PhaseConfig>, FormatError> {
    let mut out = Vec::with_capacity(defaults.len());

    for def in defaults {
        let Some(patch) = saved.iter().find(|v| phase_id(v) == Some(def.id.as_str())) else {
            out.push(def);
            continue;
        };
        let Value::Object(mut base) = serde_json::to_value(&def)? else {
            return Err(FormatError::Invalid(format!("phase {} is not an object", def.id)));
        };
        overlay(&mut base, patch);
        out.push(serde_json::from_value(Value::Object(base))?);
    }

    for extra in saved {
        let Some(id) = phase_id(extra) else {
            return Err(FormatError::Invalid("saved phase without an id".to_string()));
        };
        if out.iter().any(|p| p.id == id) {
            continue;
        }
        out.push(serde_json::from_value(extra.clone())?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FormatError, ProjectSettings, SETTINGS_VERSION};
    use pretty_assertions::assert_eq;
    use scene::{ProjectState, SceneSettings};

    #[test]
    fn partial_phase_overrides_only_given_fields() {
        let s = ProjectSettings::from_json(
            r#"{"scale":100,"phases":[{"id":"A_L","tension":2500,"cableCount":2}]}"#,
        )
        .expect("settings");
        let phases = s.resolved_phases().expect("phases");
        assert_eq!(phases.len(), 9);
        let a = phases.iter().find(|p| p.id == "A_L").expect("A_L");
        assert_eq!(a.tension, 2500.0);
        assert_eq!(a.cable_count, 2);
        assert_eq!(a.vertical_offset, 33.0);
        assert_eq!(a.spacer_interval, 30.0);
        assert_eq!(s.scene_settings().scale, 100.0);
    }

    #[test]
    fn unknown_phase_ids_are_appended() {
        let s = ProjectSettings::from_json(r#"{"phases":[{"id":"X","name":"Extra"}]}"#)
            .expect("settings");
        let phases = s.resolved_phases().expect("phases");
        assert_eq!(phases.len(), 10);
        assert_eq!(phases[9].id, "X");
        assert!(phases[9].enabled);
    }

    #[test]
    fn zero_and_missing_fall_back_to_defaults() {
        let s = ProjectSettings::from_json(r#"{"scale":0}"#).expect("settings");
        assert_eq!(s.scene_settings(), SceneSettings::default());
        assert_eq!(s.version, SETTINGS_VERSION);
    }

    #[test]
    fn negative_and_zero_tower_elevation_survive_a_save() {
        for elevation in [-2.0, 0.0] {
            let mut project = ProjectState::new();
            project.set_settings(SceneSettings {
                tower_elevation: elevation,
                ..SceneSettings::default()
            });
            let saved = ProjectSettings::from_project(&project).expect("snapshot");
            let json = serde_json::to_string(&saved).expect("json");
            let restored = ProjectSettings::from_json(&json).expect("settings");
            assert_eq!(restored.scene_settings().tower_elevation, elevation);
        }
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = ProjectSettings::from_json(r#"{"version":7}"#).expect_err("version");
        match err {
            FormatError::UnsupportedVersion { found } => assert_eq!(found, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn phase_without_id_is_invalid() {
        let s = ProjectSettings::from_json(r#"{"phases":[{"tension":5}]}"#).expect("settings");
        assert!(matches!(s.resolved_phases(), Err(FormatError::Invalid(_))));
    }
}
