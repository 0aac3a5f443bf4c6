//! Linter orchestrator.
//!
//! One `lint()` pass builds a fresh `Results` and runs, in order: the
//! root-name check, the required-attribute sweep, the `requires_arc`
//! string-literal guard, the root-only hook dispatch, and finally the
//! multi-platform traversal that visits every (subspec, platform) pair
//! exactly once. The pass is fully synchronous; every caught fault becomes
//! a visible issue instead of aborting the remaining checks.

use crate::analyzer::{Analyzer, NoopAnalyzer};
use crate::checks::CheckRegistry;
use crate::consumer::Consumer;
use crate::loader;
use crate::models::schema::Schema;
use crate::models::spec::{is_empty_value, Platform, Specification};
use crate::models::{Issue, Results};
use once_cell::sync::OnceCell;
use serde_json::Value as Json;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Validates one specification against the attribute schema and rule set.
///
/// An instance is reusable across sequential passes; `lint` takes `&mut
/// self`, so concurrent reentry on one instance is ruled out at compile
/// time. Distinct instances share nothing.
pub struct Linter {
    spec: Option<Specification>,
    file: Option<PathBuf>,
    load_failure: Option<String>,
    schema: Schema,
    registry: CheckRegistry,
    analyzer: Box<dyn Analyzer>,
    results: Results,
    errors: OnceCell<Vec<Issue>>,
    warnings: OnceCell<Vec<Issue>>,
}

impl Linter {
    /// A linter over an already-built specification.
    pub fn new(spec: Specification) -> Self {
        Self::build(Some(spec), None, None)
    }

    /// A linter over a manifest file. A load failure is retained for
    /// reporting; construction itself never fails.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match loader::load(&path) {
            Ok(spec) => Self::build(Some(spec), Some(path), None),
            Err(fault) => Self::build(None, Some(path), Some(fault.to_string())),
        }
    }

    fn build(
        spec: Option<Specification>,
        file: Option<PathBuf>,
        load_failure: Option<String>,
    ) -> Self {
        Linter {
            spec,
            file,
            load_failure,
            schema: Schema::default(),
            registry: CheckRegistry::standard(),
            analyzer: Box::new(NoopAnalyzer),
            results: Results::default(),
            errors: OnceCell::new(),
            warnings: OnceCell::new(),
        }
    }

    /// Replace the attribute schema driving the pass.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Install the deep analyzer invoked per (subspec, platform) pair.
    pub fn with_analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn spec(&self) -> Option<&Specification> {
        self.spec.as_ref()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Run one lint pass. Returns `true` iff no issues at all were
    /// recorded, errors and warnings alike.
    pub fn lint(&mut self) -> bool {
        debug!(file = ?self.file, "starting lint pass");
        self.errors = OnceCell::new();
        self.warnings = OnceCell::new();
        let mut results = Results::default();
        match &self.spec {
            None => {
                let file = self
                    .file
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                let message = self.load_failure.clone().unwrap_or_default();
                results.recorder().error(
                    "spec",
                    format!(
                        "The specification defined in `{file}` could not be loaded.\n\n{message}"
                    ),
                );
            }
            Some(spec) => {
                self.validate_root_name(spec, &mut results);
                self.validate_required_attributes(spec, &mut results);
                self.validate_requires_arc_literal(spec, &mut results);
                self.run_root_validation_hooks(spec, &mut results);
                self.perform_multi_platform_analysis(spec, &mut results);
            }
        }
        let valid = results.is_empty();
        debug!(issues = results.len(), valid, "lint pass finished");
        self.results = results;
        valid
    }

    /// All issues from the last pass.
    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Errors from the last pass. Memoized until the next `lint()`.
    pub fn errors(&self) -> &[Issue] {
        self.errors
            .get_or_init(|| self.results.errors().cloned().collect())
    }

    /// Warnings from the last pass. Memoized until the next `lint()`.
    pub fn warnings(&self) -> &[Issue] {
        self.warnings
            .get_or_init(|| self.results.warnings().cloned().collect())
    }

    // Applies only when both the root name and the linted file are known.
    fn validate_root_name(&self, spec: &Specification, results: &mut Results) {
        let (Some(name), Some(file)) = (spec.name(), self.file.as_deref()) else {
            return;
        };
        let Some(file_name) = file.file_name().and_then(|f| f.to_str()) else {
            return;
        };
        let acceptable = [format!("{name}.podspec"), format!("{name}.podspec.json")];
        if !acceptable.iter().any(|a| a == file_name) {
            results
                .recorder()
                .error("name", "The name of the spec should match the name of the file.");
        }
    }

    fn validate_required_attributes(&self, spec: &Specification, results: &mut Results) {
        let mut rec = results.recorder();
        for attribute in self.schema.required() {
            match spec.effective_value(attribute.name) {
                Ok(value) => {
                    if value.is_none_or(is_empty_value) {
                        let message = format!("Missing required attribute `{}`.", attribute.name);
                        // License omission is common and non-fatal.
                        if attribute.name == "license" {
                            rec.warning(attribute.name, message);
                        } else {
                            rec.error(attribute.name, message);
                        }
                    }
                }
                Err(fault) => rec.error(
                    attribute.name,
                    format!("Unable to validate `{}` ({fault}).", attribute.name),
                ),
            }
        }
    }

    // An author writing `requires_arc = "true"` almost certainly meant a
    // boolean, not the file list the string form selects.
    fn validate_requires_arc_literal(&self, spec: &Specification, results: &mut Results) {
        if !self.schema.contains("requires_arc") {
            return;
        }
        let mut rec = results.recorder();
        match spec.effective_value("requires_arc") {
            Ok(Some(Json::String(s))) if s == "true" || s == "false" => {
                rec.warning(
                    "requires_arc",
                    format!("`{s}` is considered to be the name of a file."),
                );
            }
            Ok(_) => {}
            Err(fault) => rec.error(
                "requires_arc",
                format!("Unable to validate `requires_arc` ({fault})."),
            ),
        }
    }

    fn run_root_validation_hooks(&self, spec: &Specification, results: &mut Results) {
        let consumer = Consumer::root(spec);
        self.registry
            .dispatch(self.schema.root_only(), &consumer, &mut results.recorder());
    }

    fn perform_multi_platform_analysis(&self, spec: &Specification, results: &mut Results) {
        let mut chain = Vec::new();
        self.analyze_spec(&mut chain, spec, &Specification::default_platforms(), results);
    }

    // Depth-first in declaration order; each (subspec, platform) pair is
    // visited exactly once and results accumulate across the whole walk.
    fn analyze_spec<'s>(
        &'s self,
        chain: &mut Vec<&'s Specification>,
        spec: &'s Specification,
        inherited: &[Platform],
        results: &mut Results,
    ) {
        chain.insert(0, spec);
        let platforms = spec
            .declared_platforms()
            .unwrap_or_else(|| inherited.to_vec());
        for platform in &platforms {
            trace!(
                spec = spec.name().unwrap_or("unnamed"),
                platform = platform.name(),
                "analyzing pair"
            );
            let consumer = Consumer::new(chain.clone(), platform.clone());
            let mut recorder = results.scoped(platform);
            self.registry
                .dispatch(self.schema.non_root(), &consumer, &mut recorder);
            self.analyzer.analyze(&consumer, &mut recorder);
        }
        for subspec in &spec.subspecs {
            self.analyze_spec(chain, subspec, &platforms, results);
        }
        chain.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recorder, Severity};
    use serde_json::json;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    fn base_manifest() -> serde_json::Value {
        json!({
            "name": "Foo",
            "version": "1.0.0",
            "authors": {"Me": "me@example.com"},
            "license": {"type": "MIT", "file": "LICENSE.txt"},
            "homepage": "https://foo.dev",
            "source": {"git": "https://github.com/me/Foo.git", "tag": "1.0.0"},
            "summary": "Networking helpers for Foo.",
            "platforms": {"ios": "12.0"}
        })
    }

    fn linter_for(manifest: serde_json::Value) -> Linter {
        Linter::new(loader::from_value(manifest).unwrap())
    }

    #[test]
    fn test_clean_spec_lints_valid() {
        let mut linter = linter_for(base_manifest());
        assert!(linter.lint());
        assert!(linter.results().is_empty());
        assert!(linter.errors().is_empty());
        assert!(linter.warnings().is_empty());
    }

    #[test]
    fn test_valid_iff_results_empty() {
        let mut manifest = base_manifest();
        manifest["license"] = json!(null);
        let mut linter = linter_for(manifest);
        // A lone warning still makes the pass invalid.
        assert!(!linter.lint());
        assert!(linter.errors().is_empty());
        assert_eq!(linter.warnings().len(), 1);
    }

    #[test]
    fn test_missing_required_attribute_is_one_error() {
        let mut manifest = base_manifest();
        manifest.as_object_mut().unwrap().remove("version");
        let mut linter = linter_for(manifest);
        assert!(!linter.lint());
        let errors = linter.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, "version");
        assert_eq!(errors[0].message, "Missing required attribute `version`.");
    }

    #[test]
    fn test_missing_license_downgrades_to_warning() {
        let mut manifest = base_manifest();
        manifest.as_object_mut().unwrap().remove("license");
        let mut linter = linter_for(manifest);
        linter.lint();
        assert!(linter.errors().is_empty());
        assert_eq!(linter.warnings()[0].attribute, "license");
        assert_eq!(linter.warnings()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_required_value_counts_as_missing() {
        let mut manifest = base_manifest();
        manifest["summary"] = json!("");
        let mut linter = linter_for(manifest);
        linter.lint();
        assert!(linter
            .errors()
            .iter()
            .any(|i| i.attribute == "summary" && i.message.contains("Missing required")));
    }

    #[test]
    fn test_requires_arc_string_literal_guard() {
        let mut manifest = base_manifest();
        manifest["requires_arc"] = json!("true");
        let mut linter = linter_for(manifest);
        linter.lint();
        let warning = linter
            .warnings()
            .iter()
            .find(|i| i.attribute == "requires_arc")
            .unwrap();
        assert_eq!(
            warning.message,
            "`true` is considered to be the name of a file."
        );
        // A real boolean is fine.
        let mut manifest = base_manifest();
        manifest["requires_arc"] = json!(true);
        let mut linter = linter_for(manifest);
        assert!(linter.lint());
    }

    #[test]
    fn test_two_passes_are_identical_and_views_reset() {
        let mut manifest = base_manifest();
        manifest["compiler_flags"] = json!(["-Wno-unused"]);
        manifest.as_object_mut().unwrap().remove("license");
        let mut linter = linter_for(manifest);
        linter.lint();
        let first: Vec<Issue> = linter.results().iter().cloned().collect();
        let first_warnings = linter.warnings().to_vec();
        linter.lint();
        let second: Vec<Issue> = linter.results().iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first_warnings, linter.warnings());
    }

    #[test]
    fn test_platform_context_is_stamped_on_traversal_issues() {
        let mut manifest = base_manifest();
        manifest["compiler_flags"] = json!(["-Wno-unused"]);
        let mut linter = linter_for(manifest);
        linter.lint();
        let warning = linter
            .warnings()
            .iter()
            .find(|i| i.attribute == "compiler_flags")
            .unwrap();
        assert_eq!(warning.platform.as_deref(), Some("ios"));
    }

    #[test]
    fn test_access_fault_surfaces_without_aborting_the_pass() {
        let mut manifest = base_manifest();
        // A platform section that is not a table of attributes.
        manifest["ios"] = json!("broken");
        manifest["module_name"] = json!("1abc");
        let mut linter = linter_for(manifest);
        linter.lint();
        let errors = linter.errors();
        assert!(errors
            .iter()
            .any(|i| i.attribute == "description" && i.message.contains("Unable to validate")));
        // Later checks still ran.
        assert!(errors
            .iter()
            .any(|i| i.attribute == "module_name" && i.message.contains("C99 identifier")));
    }

    struct PairProbe {
        seen: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl Analyzer for PairProbe {
        fn analyze(&self, consumer: &Consumer<'_>, _results: &mut Recorder<'_>) {
            self.seen.borrow_mut().push((
                consumer.spec().name().unwrap_or_default().to_string(),
                consumer.platform().unwrap().name().to_string(),
            ));
        }
    }

    #[test]
    fn test_every_pair_is_analyzed_exactly_once_in_order() {
        let mut manifest = base_manifest();
        manifest["platforms"] = json!({"ios": "12.0", "osx": "10.13"});
        manifest["subspecs"] = json!([{"name": "Core"}, {"name": "Extras"}]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut linter = linter_for(manifest).with_analyzer(Box::new(PairProbe {
            seen: Rc::clone(&seen),
        }));
        linter.lint();
        assert_eq!(
            *seen.borrow(),
            vec![
                ("Foo".to_string(), "ios".to_string()),
                ("Foo".to_string(), "osx".to_string()),
                ("Core".to_string(), "ios".to_string()),
                ("Core".to_string(), "osx".to_string()),
                ("Extras".to_string(), "ios".to_string()),
                ("Extras".to_string(), "osx".to_string()),
            ]
        );
    }

    struct NoisyAnalyzer;

    impl Analyzer for NoisyAnalyzer {
        fn analyze(&self, _consumer: &Consumer<'_>, results: &mut Recorder<'_>) {
            results.warning("source_files", "No sources resolved.");
        }
    }

    #[test]
    fn test_analyzer_issues_accumulate_with_platform_context() {
        let mut linter = linter_for(base_manifest()).with_analyzer(Box::new(NoisyAnalyzer));
        assert!(!linter.lint());
        let warning = &linter.warnings()[0];
        assert_eq!(warning.attribute, "source_files");
        assert_eq!(warning.platform.as_deref(), Some("ios"));
    }

    #[test]
    fn test_subspec_rules_run_per_pair() {
        let mut manifest = base_manifest();
        manifest["subspecs"] = json!([{"name": "Core", "info_plist": {"CFBundleName": "Foo"}}]);
        let mut linter = linter_for(manifest);
        linter.lint();
        let errors = linter.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, "info_plist");
        assert_eq!(errors[0].platform.as_deref(), Some("ios"));
    }

    fn write_manifest(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_from_file_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "Foo.podspec.json", &base_manifest().to_string());
        let mut linter = Linter::from_file(path);
        assert!(linter.lint());
    }

    #[test]
    fn test_root_name_must_match_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "Bar.podspec.json", &base_manifest().to_string());
        let mut linter = Linter::from_file(path);
        assert!(!linter.lint());
        let errors = linter.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, "name");
        assert_eq!(
            errors[0].message,
            "The name of the spec should match the name of the file."
        );
    }

    #[test]
    fn test_load_failure_short_circuits_with_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(&dir, "Foo.podspec.json", "{broken");
        let mut linter = Linter::from_file(path.clone());
        assert!(!linter.lint());
        let errors = linter.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute, "spec");
        assert!(errors[0].message.contains("could not be loaded"));
        assert!(errors[0].message.contains(path.to_str().unwrap()));
        assert_eq!(linter.results().len(), 1);
    }

    #[test]
    fn test_missing_file_is_a_load_failure() {
        let mut linter = Linter::from_file("/no/such/Foo.podspec.json");
        assert!(!linter.lint());
        assert_eq!(linter.errors()[0].attribute, "spec");
    }
}
