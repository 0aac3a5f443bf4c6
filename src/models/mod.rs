//! Shared data models for lint results and the manifest itself.
//!
//! `Issue` is the immutable diagnostic record produced by the validators.
//! `Results` is the ordered collection built during one lint pass, and
//! `Recorder` is a scoped writer over it that stamps the current platform
//! context onto appended entries.

pub mod schema;
pub mod spec;

use crate::models::spec::Platform;
use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Severity of an issue. Errors fail the lint; warnings do not.
pub enum Severity {
    Error,
    Warning,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// A single lint issue tagged with the attribute that produced it.
///
/// Severity is fixed at creation. `representative` marks a warning that is
/// logically a single finding even when emitted once per platform; dedup on
/// that flag belongs to the rendering layer, not this crate.
pub struct Issue {
    pub severity: Severity,
    pub attribute: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub representative: bool,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
/// Aggregated severity counts for one pass.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Serialize, Debug, Default)]
#[serde(transparent)]
/// Ordered, appendable collection of issues for one lint pass.
///
/// Created fresh at the start of each pass and never reused across passes.
pub struct Results {
    issues: Vec<Issue>,
}

impl Results {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            errors: self.errors().count(),
            warnings: self.warnings().count(),
        }
    }

    /// A recorder with no platform context, for root-level checks.
    pub fn recorder(&mut self) -> Recorder<'_> {
        Recorder {
            results: self,
            platform: None,
        }
    }

    /// A recorder stamping `platform` onto every appended issue.
    pub fn scoped(&mut self, platform: &Platform) -> Recorder<'_> {
        Recorder {
            results: self,
            platform: Some(platform.name().to_string()),
        }
    }

    fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}

/// Scoped writer over `Results`.
///
/// The platform context lives here, on the stack of the traversal, so a
/// linter instance stays reusable across sequential passes.
pub struct Recorder<'a> {
    results: &'a mut Results,
    platform: Option<String>,
}

impl Recorder<'_> {
    pub fn error(&mut self, attribute: &str, message: impl Into<String>) {
        self.push(Severity::Error, attribute, message.into(), false);
    }

    pub fn warning(&mut self, attribute: &str, message: impl Into<String>) {
        self.push(Severity::Warning, attribute, message.into(), false);
    }

    /// A warning that is logically singular across platforms.
    pub fn representative_warning(&mut self, attribute: &str, message: impl Into<String>) {
        self.push(Severity::Warning, attribute, message.into(), true);
    }

    fn push(&mut self, severity: Severity, attribute: &str, message: String, representative: bool) {
        self.results.push(Issue {
            severity,
            attribute: attribute.to_string(),
            message,
            platform: self.platform.clone(),
            representative,
        });
    }
}
