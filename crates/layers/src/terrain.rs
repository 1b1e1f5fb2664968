//! Snaps tower base altitudes to a terrain model.
//!
//! The terrain query itself is a black box behind [`ElevationSource`]. Results
//! come back as a plain altitude-override map which the caller folds into the
//! project; nothing here mutates project state.

use std::collections::BTreeMap;
use std::fmt;

use foundation::bounds::GeoBounds;
use foundation::ids::TowerId;
use foundation::math::LatLng;
use foundation::time::Time;
use runtime::cooldown::Cooldown;
use scene::ProjectState;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainQueryError {
    message: String,
}

impl TerrainQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TerrainQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terrain query failed: {}", self.message)
    }
}

impl std::error::Error for TerrainQueryError {}

/// Terrain height lookup. `Ok(None)` means the terrain is not loaded there.
pub trait ElevationSource {
    fn query_elevation(&self, at: LatLng) -> Result<Option<f64>, TerrainQueryError>;
}

impl<F> ElevationSource for F
where
    F: Fn(LatLng) -> Result<Option<f64>, TerrainQueryError>,
{
    fn query_elevation(&self, at: LatLng) -> Result<Option<f64>, TerrainQueryError> {
        self(at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainAlignConfig {
    /// Terrain is too coarse below this zoom to be trusted.
    pub min_zoom: f64,
    pub cooldown_s: f64,
    /// Altitude changes at or below this are ignored (metres).
    pub epsilon_m: f64,
}

impl Default for TerrainAlignConfig {
    fn default() -> Self {
        Self {
            min_zoom: 14.0,
            cooldown_s: 3.0,
            epsilon_m: 1e-3,
        }
    }
}

/// What the map currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub zoom: f64,
    pub bounds: GeoBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignSkip {
    ZoomTooLow,
    CoolingDown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentReport {
    /// Full override map: the previous overrides with the new readings applied.
    pub overrides: BTreeMap<TowerId, f64>,
    /// Towers whose override was added or moved, in tower order.
    pub changed: Vec<TowerId>,
    pub queried: usize,
    pub no_data: usize,
}

impl AlignmentReport {
    /// Folds the new overrides into `project`. Returns the number of towers moved.
    pub fn apply(self, project: &mut ProjectState) -> usize {
        if self.changed.is_empty() {
            return 0;
        }
        project.replace_altitude_overrides(self.overrides);
        self.changed.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlignOutcome {
    Skipped(AlignSkip),
    Aligned(AlignmentReport),
}

/// Debounced terrain alignment for towers in view.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainAligner {
    config: TerrainAlignConfig,
    cooldown: Cooldown,
}

impl Default for TerrainAligner {
    fn default() -> Self {
        Self::new(TerrainAlignConfig::default())
    }
}

impl TerrainAligner {
    pub fn new(config: TerrainAlignConfig) -> Self {
        Self {
            config,
            cooldown: Cooldown::new(config.cooldown_s),
        }
    }

    pub fn config(&self) -> TerrainAlignConfig {
        self.config
    }

    /// Aligns towers inside `view.bounds`.
    ///
    /// Skipped below the minimum zoom and while cooling down. The cooldown
    /// window restarts as soon as a scan starts, whatever it finds.
    pub fn align<S: ElevationSource + ?Sized>(
        &mut self,
        now: Time,
        view: &MapView,
        project: &ProjectState,
        source: &S,
    ) -> AlignOutcome {
        if view.zoom < self.config.min_zoom {
            return AlignOutcome::Skipped(AlignSkip::ZoomTooLow);
        }
        if !self.cooldown.try_fire(now) {
            return AlignOutcome::Skipped(AlignSkip::CoolingDown);
        }
        AlignOutcome::Aligned(self.scan(project, source, Some(&view.bounds)))
    }

    /// Aligns every tower regardless of zoom, view or cooldown.
    pub fn align_all<S: ElevationSource + ?Sized>(
        &mut self,
        now: Time,
        project: &ProjectState,
        source: &S,
    ) -> AlignmentReport {
        self.cooldown.try_fire(now);
        self.scan(project, source, None)
    }

    fn scan<S: ElevationSource + ?Sized>(
        &self,
        project: &ProjectState,
        source: &S,
        bounds: Option<&GeoBounds>,
    ) -> AlignmentReport {
        let mut report = AlignmentReport {
            overrides: project.altitude_overrides().clone(),
            ..AlignmentReport::default()
        };

        for tower in project.towers().iter() {
            let at = tower.position.lat_lng();
            if let Some(b) = bounds
                && !b.contains(at)
            {
                continue;
            }
            report.queried += 1;

            let elevation = match source.query_elevation(at) {
                Ok(Some(e)) if e.is_finite() => e,
                Ok(_) => {
                    report.no_data += 1;
                    continue;
                }
                Err(err) => {
                    warn!("tower {}: {err}", tower.id);
                    report.no_data += 1;
                    continue;
                }
            };

            let moved = match report.overrides.get(&tower.id) {
                Some(current) => (current - elevation).abs() > self.config.epsilon_m,
                None => true,
            };
            if moved {
                report.overrides.insert(tower.id, elevation);
                report.changed.push(tower.id);
            }
        }

        debug!(
            queried = report.queried,
            changed = report.changed.len(),
            no_data = report.no_data,
            "terrain alignment scan"
        );
        report
    }
}
