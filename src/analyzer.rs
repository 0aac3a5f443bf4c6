//! Seam for the deeper, platform-scoped semantic analysis.

use crate::consumer::Consumer;
use crate::models::Recorder;

/// Cross-attribute, platform-specific analysis run once per
/// (subspec, platform) pair, after the attribute hooks for that pair.
///
/// Implementations append further issues into the recorder; the linter
/// never filters or reorders what an analyzer adds.
pub trait Analyzer {
    fn analyze(&self, consumer: &Consumer<'_>, results: &mut Recorder<'_>);
}

/// Default analyzer performing no additional checks.
pub struct NoopAnalyzer;

impl Analyzer for NoopAnalyzer {
    fn analyze(&self, _consumer: &Consumer<'_>, _results: &mut Recorder<'_>) {}
}
