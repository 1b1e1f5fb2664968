pub mod cable;
pub mod hardware;
pub mod label;
pub mod marker;
pub mod transform;

pub use cable::*;
pub use hardware::*;
pub use label::*;
pub use marker::*;
pub use transform::*;

/// `[lng, lat, alt]` in degrees and metres.
pub type LngLatAlt = [f64; 3];

pub(crate) fn all_finite(p: &LngLatAlt) -> bool {
    p.iter().all(|v| v.is_finite())
}
