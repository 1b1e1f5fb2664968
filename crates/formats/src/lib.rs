pub mod error;
pub mod import;
pub mod model_scan;
pub mod project;
pub mod records;
pub mod settings;

pub use error::FormatError;
pub use import::*;
pub use project::*;
pub use records::*;
pub use settings::*;
