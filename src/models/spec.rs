//! In-memory manifest data model.
//!
//! A `Specification` is the root of a manifest plus zero or more nested
//! subspecs. Each node carries a base attribute table, raw per-platform
//! attribute sections, and its kind (library, test, or app). Attribute
//! values are dynamic JSON; the linter only reads them.
//!
//! Platform sections are kept as raw values: a section that is present but
//! not an object surfaces as an `AttributeAccess` fault the first time a
//! value is resolved through it, never at load time.

use crate::fault::Fault;
use serde_json::{Map, Value as Json};

/// Platform names a manifest may carry sections and availability for.
pub const KNOWN_PLATFORMS: [&str; 4] = ["ios", "osx", "tvos", "watchos"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Whether a (sub)spec describes a library, a test bundle, or an app.
pub enum SpecKind {
    #[default]
    Library,
    Test,
    App,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A target platform a spec declares availability on.
pub struct Platform {
    pub name: String,
    pub deployment_target: Option<String>,
}

impl Platform {
    pub fn new(name: &str) -> Self {
        Platform {
            name: name.to_string(),
            deployment_target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, Default)]
/// One node of the manifest tree: the root spec or a nested subspec.
pub struct Specification {
    pub kind: SpecKind,
    pub attributes: Map<String, Json>,
    pub platform_sections: Map<String, Json>,
    pub subspecs: Vec<Specification>,
}

impl Specification {
    /// The spec's own name, when the `name` attribute is a string.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Json::as_str)
    }

    /// Base-table attribute lookup. Infallible.
    pub fn attribute(&self, name: &str) -> Option<&Json> {
        self.attributes.get(name)
    }

    /// Attribute lookup inside one platform section.
    ///
    /// A present-but-non-object section is the genuine access-fault source:
    /// the value cannot be resolved through it, so the caller gets an
    /// `AttributeAccess` fault tagged with the attribute.
    pub fn platform_value(&self, platform: &str, name: &str) -> Result<Option<&Json>, Fault> {
        let Some(section) = self.platform_sections.get(platform) else {
            return Ok(None);
        };
        let table = section.as_object().ok_or_else(|| Fault::AttributeAccess {
            attribute: name.to_string(),
            message: format!("the `{platform}` platform section is not a table of attributes"),
        })?;
        Ok(table.get(name))
    }

    /// Base value, else the first platform-section value, in section order.
    pub fn effective_value(&self, name: &str) -> Result<Option<&Json>, Fault> {
        if let Some(value) = self.attributes.get(name) {
            return Ok(Some(value));
        }
        for platform in self.platform_sections.keys() {
            if let Some(value) = self.platform_value(platform, name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Platforms this spec declares availability on, from the `platforms`
    /// attribute (map of platform name to optional deployment target).
    /// `None` when undeclared; the traversal then inherits the parent's set.
    pub fn declared_platforms(&self) -> Option<Vec<Platform>> {
        let table = self.attributes.get("platforms")?.as_object()?;
        if table.is_empty() {
            return None;
        }
        Some(
            table
                .iter()
                .map(|(name, target)| Platform {
                    name: name.clone(),
                    deployment_target: target.as_str().map(String::from),
                })
                .collect(),
        )
    }

    /// The fallback availability set for specs that declare nothing.
    pub fn default_platforms() -> Vec<Platform> {
        KNOWN_PLATFORMS.iter().map(|p| Platform::new(p)).collect()
    }
}

/// The manifest's emptiness notion: JSON null, `""`, `[]` and `{}` all
/// count as empty.
pub fn is_empty_value(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(table) => table.is_empty(),
        _ => false,
    }
}
