//! Attribute validators and the registry that dispatches them.
//!
//! The registry is an explicit map from attribute name to validator,
//! built once at linter construction. Dispatch skips attributes with no
//! registered validator and attributes whose resolved value is absent
//! (missing-required is already reported by the required sweep). A fault
//! raised while resolving a value or running a validator becomes an error
//! issue for that attribute and dispatch moves on to the next one.

use crate::consumer::Consumer;
use crate::fault::Fault;
use crate::models::schema::AttributeDescriptor;
use crate::models::spec::SpecKind;
use crate::models::Recorder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value as Json};
use std::collections::HashMap;

/// A single attribute validator. Runs only when the attribute has a
/// resolved value; faults are caught by the dispatcher.
pub type Validator = fn(&Consumer<'_>, &Json, &mut Recorder<'_>) -> Result<(), Fault>;

/// Explicit attribute-name to validator map.
pub struct CheckRegistry {
    hooks: HashMap<&'static str, Validator>,
}

impl CheckRegistry {
    /// The full standard rule set.
    pub fn standard() -> Self {
        let mut hooks: HashMap<&'static str, Validator> = HashMap::new();
        hooks.insert("name", check_name);
        hooks.insert("version", check_version);
        hooks.insert("authors", check_authors);
        hooks.insert("summary", check_summary);
        hooks.insert("description", check_description);
        hooks.insert("homepage", check_homepage);
        hooks.insert("license", check_license);
        hooks.insert("source", check_source);
        hooks.insert("module_name", check_module_name);
        hooks.insert("social_media_url", check_social_media_url);
        hooks.insert("readme", check_readme);
        hooks.insert("changelog", check_changelog);
        hooks.insert("deprecated_in_favor_of", check_deprecated_in_favor_of);
        hooks.insert("frameworks", check_frameworks);
        hooks.insert("weak_frameworks", check_weak_frameworks);
        hooks.insert("libraries", check_libraries);
        hooks.insert("vendored_libraries", check_vendored_libraries);
        hooks.insert("compiler_flags", check_compiler_flags);
        hooks.insert("script_phases", check_script_phases);
        hooks.insert("scheme", check_scheme);
        hooks.insert("info_plist", check_info_plist);
        hooks.insert("test_type", check_test_type);
        hooks.insert("app_host_name", check_app_host_name);
        CheckRegistry { hooks }
    }

    pub fn get(&self, attribute: &str) -> Option<Validator> {
        self.hooks.get(attribute).copied()
    }

    /// Run every registered validator among `attributes` against one
    /// consumer, converting caught faults into error issues.
    pub fn dispatch<'a>(
        &self,
        attributes: impl Iterator<Item = &'a AttributeDescriptor>,
        consumer: &Consumer<'_>,
        results: &mut Recorder<'_>,
    ) {
        for attribute in attributes {
            let Some(check) = self.get(attribute.name) else {
                continue;
            };
            let outcome = match consumer.value(attribute.name) {
                Ok(Some(value)) => check(consumer, value, results),
                Ok(None) => continue,
                Err(fault) => Err(fault),
            };
            if let Err(fault) = outcome {
                results.error(
                    attribute.name,
                    format!(
                        "Unable to validate `{}` due to exception: {fault}.",
                        attribute.name
                    ),
                );
            }
        }
    }
}

// Value helpers shared by the validators.

fn textual(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_list(value: &Json) -> Vec<&str> {
    match value {
        Json::String(s) => vec![s.as_str()],
        Json::Array(items) => items.iter().filter_map(Json::as_str).collect(),
        _ => Vec::new(),
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    }
}

fn check_name(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    let Some(name) = value.as_str() else {
        return Ok(());
    };
    if name.contains('/') {
        results.error("name", "The name of a spec should not contain a slash.");
    }
    if name.contains(char::is_whitespace) {
        results.error("name", "The name of a spec should not contain whitespace.");
    }
    if name.starts_with('.') {
        results.error("name", "The name of a spec should not begin with a period.");
    }
    Ok(())
}

fn check_version(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    if textual(value).is_empty() {
        results.error("version", "A version is required.");
    }
    Ok(())
}

fn check_authors(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    if *value == json!({"YOUR NAME HERE": "YOUR EMAIL HERE"}) {
        results.error("authors", "The authors have not been updated from default.");
    }
    Ok(())
}

fn check_summary(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    let Some(summary) = value.as_str() else {
        return Ok(());
    };
    if summary.chars().count() > 140 {
        results.warning(
            "summary",
            "The summary should be a short version of `description` (max 140 characters).",
        );
    }
    if summary.contains("A short description of") {
        results.warning("summary", "The summary is not meaningful.");
    }
    Ok(())
}

fn check_description(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(description) = value.as_str() else {
        return Ok(());
    };
    let summary = consumer.value("summary")?.and_then(Json::as_str);
    if summary == Some(description) {
        results.warning("description", "The description is equal to the summary.");
    }
    if description.trim().is_empty() {
        results.error("description", "The description is empty.");
    } else if summary.is_some_and(|s| description.chars().count() < s.chars().count()) {
        results.warning("description", "The description is shorter than the summary.");
    }
    Ok(())
}

fn check_homepage(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    if value.as_str().is_some_and(|url| url.contains("http://EXAMPLE")) {
        results.warning("homepage", "The homepage has not been updated from default.");
    }
    Ok(())
}

fn check_license(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    let (license_type, file) = match value {
        Json::String(s) => (Some(s.as_str()), None),
        Json::Object(table) => (
            table.get("type").and_then(Json::as_str),
            table.get("file").and_then(Json::as_str),
        ),
        _ => return Ok(()),
    };
    match license_type {
        None => results.warning("license", "Missing license type."),
        Some(t) => {
            if t.trim().is_empty() {
                results.warning("license", "Invalid license type.");
            }
            if t.contains("(example)") {
                results.error("license", "Sample license type.");
            }
        }
    }
    if let Some(file) = file {
        let ext = extension(file).to_lowercase();
        if !matches!(ext.as_str(), "" | ".txt" | ".md" | ".markdown") {
            results.error(
                "license",
                format!(
                    "Invalid license file type (`{ext}`). Only text files with extensions \
                     `.txt`, `.md` and `.markdown` are supported."
                ),
            );
        }
    }
    Ok(())
}

static SSH_SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+@[\w.]+:(?:/\w+)*").unwrap());
static URL_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*)://([^/?#]+)").unwrap());

fn check_source(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(source) = value.as_object() else {
        return Ok(());
    };
    let Some(git) = source.get("git").and_then(Json::as_str) else {
        return Ok(());
    };
    if git.contains("http://EXAMPLE") {
        results.error("source", "The Git source still contains the example URL.");
    }
    if let Some(commit) = source.get("commit").and_then(Json::as_str) {
        if commit.to_lowercase().contains("head") {
            results.error("source", "The commit of a Git source cannot be `HEAD`.");
        }
    }
    match source.get("tag") {
        Some(tag) => {
            let version = consumer
                .root_spec()
                .attribute("version")
                .map(textual)
                .unwrap_or_default();
            if !textual(tag).contains(&version) {
                results.warning("source", "The version should be included in the Git tag.");
            }
        }
        None => results.representative_warning("source", "Git sources should specify a tag."),
    }
    check_github_source(git, results);
    if SSH_SOURCE.is_match(git) {
        results.representative_warning(
            "source",
            "Git SSH URLs will NOT work for people behind firewalls, use HTTPS instead.",
        );
    }
    Ok(())
}

fn check_github_source(url: &str, results: &mut Recorder<'_>) {
    let Some(parts) = URL_PARTS.captures(url) else {
        return;
    };
    let scheme = parts.get(1).map_or("", |m| m.as_str());
    let authority = parts.get(2).map_or("", |m| m.as_str());
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if !host.ends_with("github.com") {
        return;
    }
    if host.starts_with("www.") {
        results.warning(
            "github_sources",
            "Github repositories should not use `www` in their URL.",
        );
    }
    if !url.ends_with(".git") {
        results.warning("github_sources", "Github repositories should end in `.git`.");
    }
    if scheme != "https" {
        results.representative_warning(
            "github_sources",
            "Github repositories should use `https` link.",
        );
    }
}

static C99_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][0-9a-zA-Z_]*$").unwrap());

fn check_module_name(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    if !C99_IDENTIFIER.is_match(&textual(value)) {
        results.error(
            "module_name",
            "The module name of a spec should be a valid C99 identifier.",
        );
    }
    Ok(())
}

fn check_social_media_url(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    if value
        .as_str()
        .is_some_and(|url| url.contains("https://twitter.com/EXAMPLE"))
    {
        results.warning(
            "social_media_url",
            "The social media URL has not been updated from the default.",
        );
    }
    Ok(())
}

fn check_readme(_c: &Consumer<'_>, value: &Json, results: &mut Recorder<'_>) -> Result<(), Fault> {
    if value
        .as_str()
        .is_some_and(|url| url.contains("https://www.example.com/README"))
    {
        results.warning("readme", "The readme has not been updated from the default.");
    }
    Ok(())
}

fn check_changelog(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    if value
        .as_str()
        .is_some_and(|url| url.contains("https://www.example.com/CHANGELOG"))
    {
        results.warning(
            "changelog",
            "The changelog has not been updated from the default.",
        );
    }
    Ok(())
}

fn check_deprecated_in_favor_of(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(successor) = value.as_str() else {
        return Ok(());
    };
    // `Foo/Sub` deprecates in favor of the root pod `Foo`.
    let successor_root = successor.split('/').next().unwrap_or(successor);
    if consumer.root_spec().name() == Some(successor_root) {
        results.error(
            "deprecated_in_favor_of",
            "A spec cannot be deprecated in favor of itself.",
        );
    }
    Ok(())
}

static FRAMEWORK_BAD_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w+-]").unwrap());

fn frameworks_invalid(value: &Json) -> bool {
    string_list(value)
        .iter()
        .any(|f| FRAMEWORK_BAD_CHAR.is_match(f))
}

fn check_frameworks(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    if frameworks_invalid(value) {
        results.error("frameworks", "A framework should only be specified by its name.");
    }
    Ok(())
}

fn check_weak_frameworks(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    if frameworks_invalid(value) {
        results.error(
            "weak_frameworks",
            "A weak framework should only be specified by its name.",
        );
    }
    Ok(())
}

fn check_libraries(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    for library in string_list(value) {
        let library = library.to_lowercase();
        if library.ends_with(".a") || library.ends_with(".dylib") {
            results.error(
                "libraries",
                format!("Libraries should not include the extension (`{library}`)."),
            );
        }
        if library.starts_with("lib") {
            results.error(
                "libraries",
                format!("Libraries should omit the `lib` prefix (`{library}`)."),
            );
        }
        if library.contains(',') {
            results.error(
                "libraries",
                format!("Libraries should not include commas (`{library}`)."),
            );
        }
    }
    Ok(())
}

fn check_vendored_libraries(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    for library in string_list(value) {
        let name = basename(library).to_lowercase();
        if !(name.starts_with("lib") && name.ends_with(".a")) {
            results.warning(
                "vendored_libraries",
                format!(
                    "`{}` does not match the expected static library name format `lib[name].a`.",
                    basename(library)
                ),
            );
        }
    }
    Ok(())
}

fn check_compiler_flags(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let disables_warnings = string_list(value)
        .iter()
        .flat_map(|flags| flags.split_whitespace())
        .any(|flag| flag.starts_with("-Wno"));
    if disables_warnings {
        results.warning(
            "compiler_flags",
            "Warnings must not be disabled (`-Wno` compiler flags).",
        );
    }
    Ok(())
}

const SCRIPT_PHASE_REQUIRED_KEYS: [&str; 2] = ["name", "script"];
const SCRIPT_PHASE_OPTIONAL_KEYS: [&str; 9] = [
    "shell_path",
    "input_files",
    "output_files",
    "input_file_lists",
    "output_file_lists",
    "show_env_vars_in_log",
    "execution_position",
    "dependency_file",
    "always_out_of_date",
];
const EXECUTION_POSITIONS: [&str; 5] = [
    "before_compile",
    "after_compile",
    "before_headers",
    "after_headers",
    "any",
];

fn check_script_phases(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let phases: Vec<&serde_json::Map<String, Json>> = match value {
        Json::Array(items) => items.iter().filter_map(Json::as_object).collect(),
        Json::Object(table) => vec![table],
        _ => return Ok(()),
    };
    for phase in phases {
        let name = phase.get("name").and_then(Json::as_str).unwrap_or("unnamed");
        let unknown: Vec<&str> = phase
            .keys()
            .map(String::as_str)
            .filter(|k| {
                !SCRIPT_PHASE_REQUIRED_KEYS.contains(k) && !SCRIPT_PHASE_OPTIONAL_KEYS.contains(k)
            })
            .collect();
        if !unknown.is_empty() {
            let available: Vec<&str> = SCRIPT_PHASE_REQUIRED_KEYS
                .iter()
                .chain(SCRIPT_PHASE_OPTIONAL_KEYS.iter())
                .copied()
                .collect();
            results.error(
                "script_phases",
                format!(
                    "Unrecognized option(s) `{}` in script phase `{name}`. Available options \
                     are `{}`.",
                    unknown.join(", "),
                    available.join(", ")
                ),
            );
        }
        let missing: Vec<&str> = SCRIPT_PHASE_REQUIRED_KEYS
            .iter()
            .filter(|k| !phase.contains_key(**k))
            .copied()
            .collect();
        if !missing.is_empty() {
            results.error(
                "script_phases",
                format!(
                    "Missing required shell script phase options `{}` in script phase `{name}`.",
                    missing.join(", ")
                ),
            );
        }
        if let Some(position) = phase.get("execution_position") {
            let valid = position
                .as_str()
                .is_some_and(|p| EXECUTION_POSITIONS.contains(&p));
            if !valid {
                results.error(
                    "script_phases",
                    format!(
                        "Invalid execution position value `{}` in shell script `{name}`. \
                         Available options are `{}`.",
                        textual(position),
                        EXECUTION_POSITIONS.join(", ")
                    ),
                );
            }
        }
    }
    Ok(())
}

fn check_scheme(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(scheme) = value.as_object() else {
        return Ok(());
    };
    if scheme.is_empty() {
        return Ok(());
    }
    if consumer.is_subspec() && consumer.spec().kind == SpecKind::Library {
        results.error(
            "scheme",
            "Scheme configuration is not currently supported for subspecs.",
        );
        return Ok(());
    }
    if scheme.get("launch_arguments").is_some_and(|v| !v.is_array()) {
        results.error("scheme", "Expected an array for key `launch_arguments`.");
    }
    if scheme
        .get("environment_variables")
        .is_some_and(|v| !v.is_object())
    {
        results.error("scheme", "Expected a hash for key `environment_variables`.");
    }
    if scheme.get("code_coverage").is_some_and(|v| !v.is_boolean()) {
        results.error("scheme", "Expected a boolean for key `code_coverage`.");
    }
    Ok(())
}

fn check_info_plist(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(plist) = value.as_object() else {
        return Ok(());
    };
    if plist.is_empty() {
        return Ok(());
    }
    if consumer.is_subspec() && consumer.spec().kind == SpecKind::Library {
        results.error(
            "info_plist",
            "Info.plist configuration is not currently supported for subspecs.",
        );
    }
    Ok(())
}

const TEST_TYPES: [&str; 2] = ["unit", "ui"];

fn check_test_type(
    _c: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let test_type = textual(value);
    if !TEST_TYPES.contains(&test_type.as_str()) {
        results.error(
            "test_type",
            format!(
                "The test type `{test_type}` is not supported. Supported test type values are \
                 `{}`.",
                TEST_TYPES.join("`, `")
            ),
        );
    }
    Ok(())
}

fn check_app_host_name(
    consumer: &Consumer<'_>,
    value: &Json,
    results: &mut Recorder<'_>,
) -> Result<(), Fault> {
    let Some(host_name) = value.as_str() else {
        return Ok(());
    };
    if !consumer.requires_app_host()? {
        results.error(
            "app_host_name",
            "`requires_app_host` must be set to `true` when `app_host_name` is specified.",
        );
    }
    if !consumer.dependency_names().iter().any(|d| d == host_name) {
        results.error(
            "app_host_name",
            format!(
                "The app host name (`{host_name}`) specified by `{}` could not be found. You \
                 must explicitly declare a dependency on that app spec.",
                consumer.spec().name().unwrap_or_default()
            ),
        );
    }
    Ok(())
}
