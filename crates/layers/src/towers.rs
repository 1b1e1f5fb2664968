use foundation::ids::TowerId;
use scene::ProjectState;
use scene::components::TowerTransform;
use serde::Serialize;

use crate::layer::{Layer, LayerId};

/// Scene scale at which tower models are authored.
pub const MODEL_REFERENCE_SCALE: f64 = 30.0;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TowersLayerSnapshot {
    pub towers: Vec<TowerTransform>,
}

/// One model instance per visible tower.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TowersLayer {
    id: LayerId,
}

impl TowersLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    /// `pending_start` is highlighted while a connection edit is in progress.
    pub fn extract(&self, project: &ProjectState, pending_start: Option<TowerId>) -> TowersLayerSnapshot {
        let settings = project.settings();
        let towers = project
            .towers()
            .iter()
            .filter(|t| project.is_visible(t.id))
            .filter_map(|t| {
                let pos = project.resolved_position(t.id)?;
                let pos = pos.with_alt(pos.alt + settings.tower_elevation);
                Some(TowerTransform {
                    tower: t.id,
                    position: pos.to_lng_lat_alt(),
                    rotation_deg: t.rotation_deg.unwrap_or(0.0),
                    scale: t.height_or_default() * (settings.scale / MODEL_REFERENCE_SCALE),
                    highlighted: pending_start == Some(t.id),
                    status_tags: t.status_tags.clone(),
                })
            })
            .collect();
        TowersLayerSnapshot { towers }
    }
}

impl Layer for TowersLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "towers"
    }
}
