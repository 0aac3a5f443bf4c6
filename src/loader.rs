//! `.podspec.json` manifest loading.
//!
//! Only the JSON serialization of a podspec is loadable. The Ruby
//! `.podspec` DSL form is refused with a descriptive failure message;
//! parsing that syntax belongs to the surrounding tooling, not this crate.
//!
//! Nested specs come from the `subspecs`, `testspecs`, and `appspecs`
//! arrays. Top-level keys naming a known platform become raw platform
//! sections; everything else lands in the base attribute table. A platform
//! section that is not an object is kept as-is and surfaces as an access
//! fault when a value is first resolved through it.

use crate::fault::Fault;
use crate::models::spec::{SpecKind, Specification, KNOWN_PLATFORMS};
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a `.podspec.json` manifest into a `Specification`.
pub fn load(path: &Path) -> Result<Specification, Fault> {
    let file = path.display().to_string();
    let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if !basename.ends_with(".podspec.json") {
        let message = if basename.ends_with(".podspec") {
            "Ruby `.podspec` manifests are not supported; serialize the specification to \
             `.podspec.json` first."
                .to_string()
        } else {
            format!("`{basename}` is not a `.podspec.json` manifest.")
        };
        return Err(Fault::Load { file, message });
    }
    let data = fs::read_to_string(path).map_err(|e| Fault::Load {
        file: file.clone(),
        message: format!("Unable to read the file ({e})."),
    })?;
    let json: Json = serde_json::from_str(&data).map_err(|e| Fault::Load {
        file: file.clone(),
        message: format!("The file is not valid JSON ({e})."),
    })?;
    let spec = from_value(json).map_err(|message| Fault::Load {
        file: file.clone(),
        message,
    })?;
    debug!(file = %file, subspecs = spec.subspecs.len(), "loaded manifest");
    Ok(spec)
}

/// Build a `Specification` tree from an already-parsed JSON value.
pub fn from_value(value: Json) -> Result<Specification, String> {
    let Json::Object(table) = value else {
        return Err("The manifest root must be an object.".to_string());
    };
    build(table, SpecKind::Library)
}

fn build(table: Map<String, Json>, kind: SpecKind) -> Result<Specification, String> {
    let mut spec = Specification {
        kind,
        ..Default::default()
    };
    for (key, value) in table {
        match key.as_str() {
            "subspecs" | "testspecs" | "appspecs" => {
                let child_kind = match key.as_str() {
                    "testspecs" => SpecKind::Test,
                    "appspecs" => SpecKind::App,
                    _ => SpecKind::Library,
                };
                let entries = value
                    .as_array()
                    .ok_or_else(|| format!("`{key}` must be an array of specifications."))?;
                for entry in entries {
                    let child = entry
                        .as_object()
                        .ok_or_else(|| format!("Every `{key}` entry must be an object."))?;
                    spec.subspecs.push(build(child.clone(), child_kind)?);
                }
            }
            k if KNOWN_PLATFORMS.contains(&k) => {
                spec.platform_sections.insert(key, value);
            }
            _ => {
                spec.attributes.insert(key, value);
            }
        }
    }
    Ok(spec)
}
