#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// A pure view of project state. Layers hold configuration only; all output
/// comes from their `extract` methods.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
