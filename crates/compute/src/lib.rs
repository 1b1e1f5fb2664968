pub mod bundle;
pub mod catenary;
pub mod hardware;
pub mod orientation;
pub mod span;

pub use orientation::{auto_rotate, orient};
pub use span::{SpanGeometry, SpanInput, build_span};
