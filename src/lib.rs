//! Podlint core library.
//!
//! This crate exposes programmatic APIs for validating a package manifest
//! (a CocoaPods-style podspec) before it is accepted into a package
//! ecosystem: a rule-based engine that walks a specification's attributes
//! and subspecs, dispatches per-attribute validators from an explicit
//! registry, and aggregates typed issues per (subspec, platform) pair.
//!
//! High-level modules:
//! - `lint`: The `Linter` orchestrator owning the pass and its results.
//! - `checks`: The check registry and the attribute validators.
//! - `models`: Data models for issues, results, the manifest, and the
//!   attribute schema.
//! - `consumer`: Platform-scoped attribute value resolution.
//! - `loader`: `.podspec.json` manifest loading.
//! - `analyzer`: Seam for the deeper platform-scoped analysis.
//! - `fault`: The closed set of caught fault kinds.
//!
//! Rendering of results to a user-facing report is not part of this crate;
//! every result type serializes to JSON for the surrounding tooling.
//!
//! Note: All documentation comments are written in English by convention.
pub mod analyzer;
pub mod checks;
pub mod consumer;
pub mod fault;
pub mod lint;
pub mod loader;
pub mod models;

pub use analyzer::{Analyzer, NoopAnalyzer};
pub use consumer::Consumer;
pub use fault::Fault;
pub use lint::Linter;
pub use models::schema::{AttributeDescriptor, Schema};
pub use models::spec::{Platform, SpecKind, Specification};
pub use models::{Issue, Recorder, Results, Severity, Summary};
