use scene::ProjectState;
use scene::components::TowerLabel;
use serde::Serialize;

use crate::layer::{Layer, LayerId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelsConfig {
    /// Height of the label above the tower's elevated base (metres).
    pub lift_m: f64,
    pub max_text_len: usize,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            lift_m: 2.0,
            max_text_len: 256,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LabelsLayerSnapshot {
    pub labels: Vec<TowerLabel>,
}

/// Tower name labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsLayer {
    id: LayerId,
    pub config: LabelsConfig,
}

impl LabelsLayer {
    pub fn new(id: u64, config: LabelsConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn extract(&self, project: &ProjectState) -> LabelsLayerSnapshot {
        let elevation = project.settings().tower_elevation;
        let mut out = Vec::new();

        for tower in project.towers().iter() {
            if !project.is_visible(tower.id) {
                continue;
            }
            let text = tower.name.trim();
            if text.is_empty() || text.len() > self.config.max_text_len {
                continue;
            }
            let Some(pos) = project.resolved_position(tower.id) else {
                continue;
            };
            out.push(TowerLabel {
                tower: tower.id,
                text: text.to_string(),
                position: pos
                    .with_alt(pos.alt + elevation + self.config.lift_m)
                    .to_lng_lat_alt(),
            });
        }

        LabelsLayerSnapshot { labels: out }
    }
}

impl Layer for LabelsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "labels"
    }
}
