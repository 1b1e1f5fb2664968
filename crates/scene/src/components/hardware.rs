use serde::Serialize;

use super::{LngLatAlt, all_finite};
use crate::phase::Rgb;

pub const HARDWARE_BLACK: Rgb = [0, 0, 0];
pub const ANCHOR_ROD_COLOR: Rgb = [255, 140, 0];
pub const ANCHOR_TIP_COLOR: Rgb = [200, 0, 0];
pub const CLAMP_COLOR: Rgb = [40, 40, 40];

/// What a hardware segment belongs to. Renderers may style by kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HardwareKind {
    AnchorFrame,
    AnchorRod,
    AnchorTip,
    AnchorBar,
    SpacerArm,
    SpacerShed,
    SpacerClamp,
}

impl HardwareKind {
    pub fn is_spacer(self) -> bool {
        matches!(
            self,
            HardwareKind::SpacerArm | HardwareKind::SpacerShed | HardwareKind::SpacerClamp
        )
    }
}

/// Straight two-point hardware piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSegment {
    pub path: [LngLatAlt; 2],
    pub color: Rgb,
    pub thickness: f64,
    pub phase_id: String,
    pub kind: HardwareKind,
}

impl HardwareSegment {
    pub fn is_finite(&self) -> bool {
        self.thickness.is_finite() && self.path.iter().all(all_finite)
    }
}

/// Darkens each channel by `amount`, saturating at zero.
pub fn darken(color: Rgb, amount: u8) -> Rgb {
    color.map(|c| c.saturating_sub(amount))
}
