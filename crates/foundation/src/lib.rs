pub mod bounds;
pub mod ids;
pub mod math;
pub mod time;

pub use bounds::*;
pub use ids::*;
pub use time::*;
