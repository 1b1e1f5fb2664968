use serde::{Deserialize, Serialize};

/// Scale at which phase offsets and sizes are authored.
pub const NOMINAL_SCALE: f64 = 50.0;

/// Largest supported conductor bundle.
pub const MAX_BUNDLE_CONDUCTORS: usize = 4;

pub type Rgb = [u8; 3];

/// Multiplier applied to phase offsets and sizes for a global scene scale.
pub fn scale_factor(scale: f64) -> f64 {
    scale / NOMINAL_SCALE
}

/// One conductor bundle (electrical phase) and its hardware.
///
/// Offsets, spacing and sizes are expressed at [`NOMINAL_SCALE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseConfig {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub color: Rgb,
    /// Catenary constant; larger is flatter.
    pub tension: f64,
    pub vertical_offset: f64,
    pub horizontal_offset: f64,
    /// Percentage; informational.
    pub relative_height: f64,
    pub cable_count: u32,
    pub bundle_spacing: f64,
    pub width: f64,
    pub spacer_interval: f64,
    pub spacer_size: f64,
    pub spacer_thickness: f64,
    pub spacer_color: Rgb,
    pub cable_type: String,
    pub signal_spheres_enabled: bool,
    pub signal_sphere_interval: f64,
    pub signal_sphere_size: f64,
    pub signal_sphere_color: Rgb,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            enabled: true,
            color: [203, 213, 225],
            tension: 1200.0,
            vertical_offset: 0.0,
            horizontal_offset: 0.0,
            relative_height: 100.0,
            cable_count: 1,
            bundle_spacing: 0.4,
            width: 0.15,
            spacer_interval: 0.0,
            spacer_size: 1.1,
            spacer_thickness: 0.2,
            spacer_color: [180, 180, 185],
            cable_type: String::new(),
            signal_spheres_enabled: false,
            signal_sphere_interval: 0.0,
            signal_sphere_size: 0.6,
            signal_sphere_color: [255, 140, 0],
        }
    }
}

fn positive_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

impl PhaseConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Conductors per bundle, clamped to the supported 1..=4 patterns.
    pub fn conductor_count(&self) -> usize {
        (self.cable_count as usize).clamp(1, MAX_BUNDLE_CONDUCTORS)
    }

    pub fn effective_bundle_spacing(&self) -> f64 {
        positive_or(self.bundle_spacing, 0.4)
    }

    pub fn effective_width(&self) -> f64 {
        positive_or(self.width, 0.15)
    }

    pub fn effective_spacer_size(&self) -> f64 {
        positive_or(self.spacer_size, 1.1)
    }

    pub fn effective_spacer_thickness(&self) -> f64 {
        positive_or(self.spacer_thickness, 0.2)
    }

    pub fn effective_signal_sphere_size(&self) -> f64 {
        positive_or(self.signal_sphere_size, 0.6)
    }

    /// Spacers are placed only on multi-conductor bundles with a positive interval.
    pub fn has_spacers(&self) -> bool {
        self.spacer_interval.is_finite() && self.spacer_interval > 0.0 && self.conductor_count() > 1
    }
}

struct Preset {
    id: &'static str,
    name: &'static str,
    enabled: bool,
    color: Rgb,
    tension: f64,
    vertical_offset: f64,
    horizontal_offset: f64,
    cable_count: u32,
    width: f64,
}

const SHIELD_WIRE: [Preset; 2] = [
    Preset {
        id: "OPGW_L",
        name: "OPGW (Left)",
        enabled: true,
        color: [203, 213, 225],
        tension: 1200.0,
        vertical_offset: 40.0,
        horizontal_offset: -4.0,
        cable_count: 1,
        width: 0.1,
    },
    Preset {
        id: "OPGW_R",
        name: "OPGW (Right)",
        enabled: true,
        color: [203, 213, 225],
        tension: 1200.0,
        vertical_offset: 40.0,
        horizontal_offset: 4.0,
        cable_count: 1,
        width: 0.1,
    },
];

const CIRCUITS: [Preset; 6] = [
    Preset {
        id: "A_L",
        name: "Phase A (Left Upper)",
        enabled: true,
        color: [148, 163, 184],
        tension: 1800.0,
        vertical_offset: 33.0,
        horizontal_offset: -6.0,
        cable_count: 4,
        width: 0.15,
    },
    Preset {
        id: "B_L",
        name: "Phase B (Left Middle)",
        enabled: true,
        color: [203, 213, 225],
        tension: 1800.0,
        vertical_offset: 25.0,
        horizontal_offset: -6.0,
        cable_count: 4,
        width: 0.15,
    },
    Preset {
        id: "C_L",
        name: "Phase C (Left Lower)",
        enabled: true,
        color: [71, 85, 105],
        tension: 1800.0,
        vertical_offset: 17.0,
        horizontal_offset: -6.0,
        cable_count: 4,
        width: 0.15,
    },
    Preset {
        id: "A_R",
        name: "Phase A (Right Upper)",
        enabled: true,
        color: [148, 163, 184],
        tension: 1800.0,
        vertical_offset: 33.0,
        horizontal_offset: 6.0,
        cable_count: 4,
        width: 0.15,
    },
    Preset {
        id: "B_R",
        name: "Phase B (Right Middle)",
        enabled: true,
        color: [203, 213, 225],
        tension: 1800.0,
        vertical_offset: 25.0,
        horizontal_offset: 6.0,
        cable_count: 4,
        width: 0.15,
    },
    Preset {
        id: "C_R",
        name: "Phase C (Right Lower)",
        enabled: true,
        color: [71, 85, 105],
        tension: 1800.0,
        vertical_offset: 17.0,
        horizontal_offset: 6.0,
        cable_count: 4,
        width: 0.15,
    },
];

const NEUTRAL: Preset = Preset {
    id: "N",
    name: "Neutral / Aux",
    enabled: false,
    color: [203, 213, 225],
    tension: 1000.0,
    vertical_offset: 12.0,
    horizontal_offset: 0.0,
    cable_count: 1,
    width: 0.1,
};

fn from_preset(p: &Preset) -> PhaseConfig {
    PhaseConfig {
        id: p.id.to_string(),
        name: p.name.to_string(),
        enabled: p.enabled,
        color: p.color,
        tension: p.tension,
        vertical_offset: p.vertical_offset,
        horizontal_offset: p.horizontal_offset,
        cable_count: p.cable_count,
        width: p.width,
        ..PhaseConfig::default()
    }
}

/// Standard double-circuit lattice tower layout: two shield wires, six
/// quad-bundle phases and a disabled neutral.
pub fn default_phases() -> Vec<PhaseConfig> {
    let mut out = Vec::with_capacity(SHIELD_WIRE.len() + CIRCUITS.len() + 1);

    for p in &SHIELD_WIRE {
        out.push(PhaseConfig {
            spacer_interval: 40.0,
            spacer_size: 0.6,
            spacer_thickness: 0.15,
            spacer_color: [255, 80, 0],
            signal_spheres_enabled: true,
            signal_sphere_interval: 40.0,
            signal_sphere_size: 0.6,
            signal_sphere_color: [255, 200, 200],
            ..from_preset(p)
        });
    }
    for p in &CIRCUITS {
        out.push(PhaseConfig {
            spacer_interval: 30.0,
            spacer_size: 1.1,
            spacer_thickness: 0.2,
            spacer_color: [20, 20, 20],
            ..from_preset(p)
        });
    }
    out.push(PhaseConfig {
        spacer_color: [20, 20, 20],
        ..from_preset(&NEUTRAL)
    });
    out
}
