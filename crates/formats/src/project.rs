use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use scene::ProjectState;

use crate::error::FormatError;
use crate::import::{ImportReport, import_project};
use crate::records::{DisplaySettings, TowerRecord};
use crate::settings::ProjectSettings;

/// On-disk project: the settings blob plus every tower record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub towers: Vec<TowerRecord>,
}

impl ProjectFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)?;
        let file: ProjectFile = serde_json::from_str(&payload)?;
        file.settings.check_version()?;
        info!("loaded {} towers from {}", file.towers.len(), path.display());
        Ok(file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FormatError> {
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Snapshot of `project` with aligned altitudes saved as ground elevations.
    pub fn from_project(project: &ProjectState) -> Result<Self, FormatError> {
        let towers = project
            .towers()
            .iter()
            .enumerate()
            .map(|(index, tower)| TowerRecord {
                name: Some(tower.name.clone()),
                latitude: tower.position.lat,
                longitude: tower.position.lng,
                elevation: tower.position.alt,
                rotation: tower.rotation_deg,
                height: tower.height_m,
                sequence: u32::try_from(index + 1).ok(),
                status_tags: tower.status_tags.clone(),
                display_settings: DisplaySettings {
                    ground_elevation: project.altitude_override(tower.id),
                    hidden: (!project.is_visible(tower.id)).then_some(true),
                    ..DisplaySettings::default()
                },
            })
            .collect();

        Ok(Self {
            settings: ProjectSettings::from_project(project)?,
            towers,
        })
    }

    pub fn into_project(&self) -> Result<(ProjectState, ImportReport), FormatError> {
        let mut project = ProjectState::new();
        let report = import_project(&mut project, &self.settings, &self.towers)?;
        Ok((project, report))
    }
}
