pub mod components;
pub mod connection;
pub mod phase;
pub mod project;
pub mod selection;
pub mod tower;
pub mod visibility;

pub use connection::{Connection, ConnectionChange, ConnectionSet};
pub use phase::{PhaseConfig, Rgb, default_phases};
pub use project::*;
pub use tower::{Tower, TowerDraft, TowerRegistry};
