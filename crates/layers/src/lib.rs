pub mod labels;
pub mod layer;
pub mod lines;
pub mod rebuild;
pub mod terrain;
pub mod towers;

pub use layer::*;
pub use rebuild::{LineScene, SceneRebuilder};
