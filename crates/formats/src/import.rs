//! Ingestion boundary: the only place towers are matched by name.
//!
//! Names are trimmed and uppercased for matching; everything past this point
//! works on stable [`TowerId`]s.

use foundation::ids::TowerId;
use scene::connection::{Connection, ConnectionChange};
use scene::tower::normalize_name;
use scene::ProjectState;
use tracing::{debug, info, warn};

use crate::error::FormatError;
use crate::records::TowerRecord;
use crate::settings::{NamedConnection, ProjectSettings};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub towers_added: usize,
    pub towers_replaced: usize,
    pub altitude_overrides: usize,
    pub connections_added: usize,
    pub connections_replaced: usize,
    pub self_connections: usize,
    /// Connections naming a tower that does not exist.
    pub unresolved: Vec<NamedConnection>,
    /// Hidden-tower names that match no tower.
    pub unknown_hidden: Vec<String>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.unknown_hidden.is_empty()
    }
}

/// Loads towers and their saved altitudes into `project`.
///
/// Towers whose name already exists (case-insensitive) are replaced in place.
pub fn import_towers(project: &mut ProjectState, records: &[TowerRecord], report: &mut ImportReport) {
    for (index, record) in records.iter().enumerate() {
        let existed = project.towers().id_for_name(&record.display_name(index)).is_some();
        let id = project.upsert_tower(record.to_draft(index));
        if existed {
            report.towers_replaced += 1;
        } else {
            report.towers_added += 1;
        }
        if let Some(ground) = record.ground_elevation() {
            project.set_altitude_override(id, ground);
            report.altitude_overrides += 1;
        }
        if record.is_hidden() {
            project.set_hidden(id, true);
        }
    }
}

/// Resolves name-based connections against the towers already in `project`.
pub fn import_connections(
    project: &mut ProjectState,
    connections: &[NamedConnection],
    report: &mut ImportReport,
) {
    for named in connections {
        let from = project.towers().id_for_name(&named.from);
        let to = project.towers().id_for_name(&named.to);
        let (Some(from), Some(to)) = (from, to) else {
            debug!(
                "unresolved connection {} -> {}",
                normalize_name(&named.from),
                normalize_name(&named.to)
            );
            report.unresolved.push(named.clone());
            continue;
        };
        match project.connect(Connection::new(from, to)) {
            ConnectionChange::Added => report.connections_added += 1,
            ConnectionChange::Replaced(_) => report.connections_replaced += 1,
            ConnectionChange::Ignored => report.self_connections += 1,
        }
    }
}

/// Builds project state from a settings blob and tower records.
///
/// Settings are applied first, then towers, then connections and the hidden
/// set, which both need tower ids.
pub fn import_project(
    project: &mut ProjectState,
    settings: &ProjectSettings,
    records: &[TowerRecord],
) -> Result<ImportReport, FormatError> {
    settings.check_version()?;
    let mut report = ImportReport::default();

    project.set_settings(settings.scene_settings());
    project.set_phases(settings.resolved_phases()?);
    import_towers(project, records, &mut report);
    import_connections(project, &settings.connections, &mut report);

    for name in &settings.hidden_tower_ids {
        match project.towers().id_for_name(name) {
            Some(id) => project.set_hidden(id, true),
            None => report.unknown_hidden.push(name.clone()),
        }
    }

    if !report.unresolved.is_empty() {
        warn!("{} connection(s) reference unknown towers", report.unresolved.len());
    }
    info!(
        towers = report.towers_added + report.towers_replaced,
        connections = report.connections_added + report.connections_replaced,
        "project imported"
    );
    Ok(report)
}

/// Id lookup by (case-insensitive) tower name.
pub fn resolve_name(project: &ProjectState, name: &str) -> Option<TowerId> {
    project.towers().id_for_name(name)
}
