pub mod cooldown;
pub mod revision;

pub use cooldown::*;
pub use revision::*;
