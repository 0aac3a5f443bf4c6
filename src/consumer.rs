//! Platform-scoped attribute resolution.
//!
//! A `Consumer` is a read-only view of one (subspec, platform) pair. Value
//! resolution walks the ancestor chain leaf-first: the leaf's platform
//! section wins over the leaf's base table, which wins over the same lookup
//! on each ancestor up to the root. Full CocoaPods inheritance semantics are
//! deliberately out of scope; this rule is the whole contract.

use crate::fault::Fault;
use crate::models::spec::{Platform, Specification};
use serde_json::Value as Json;

/// A resolved view of one subspec for one platform.
///
/// The root-only validation pass uses an unscoped consumer (no platform),
/// which resolves through `effective_value` instead of a platform section.
pub struct Consumer<'a> {
    // Leaf first, root last. Never empty.
    chain: Vec<&'a Specification>,
    platform: Option<Platform>,
}

impl<'a> Consumer<'a> {
    /// An unscoped consumer over the root specification itself.
    pub fn root(spec: &'a Specification) -> Self {
        Consumer {
            chain: vec![spec],
            platform: None,
        }
    }

    /// A consumer for one (subspec, platform) pair. `chain` runs from the
    /// subspec itself up to the root.
    pub fn new(chain: Vec<&'a Specification>, platform: Platform) -> Self {
        debug_assert!(!chain.is_empty());
        Consumer {
            chain,
            platform: Some(platform),
        }
    }

    /// The subspec this consumer is scoped to.
    pub fn spec(&self) -> &'a Specification {
        self.chain[0]
    }

    /// The root of the manifest tree.
    pub fn root_spec(&self) -> &'a Specification {
        self.chain[self.chain.len() - 1]
    }

    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    /// Whether the scoped spec is a nested subspec rather than the root.
    pub fn is_subspec(&self) -> bool {
        self.chain.len() > 1
    }

    /// Resolve an attribute's effective value for this pair.
    pub fn value(&self, name: &str) -> Result<Option<&'a Json>, Fault> {
        for spec in &self.chain {
            match &self.platform {
                Some(platform) => {
                    if let Some(value) = spec.platform_value(platform.name(), name)? {
                        return Ok(Some(value));
                    }
                    if let Some(value) = spec.attribute(name) {
                        return Ok(Some(value));
                    }
                }
                None => {
                    if let Some(value) = spec.effective_value(name)? {
                        return Ok(Some(value));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Names of every dependency declared along the chain, leaf first,
    /// deduplicated. Malformed platform sections are skipped here; they
    /// already surface as access faults during attribute resolution.
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for spec in &self.chain {
            let mut tables: Vec<&Json> = Vec::new();
            if let Some(platform) = &self.platform {
                if let Ok(Some(table)) = spec.platform_value(platform.name(), "dependencies") {
                    tables.push(table);
                }
            }
            if let Some(table) = spec.attribute("dependencies") {
                tables.push(table);
            }
            for table in tables {
                if let Some(entries) = table.as_object() {
                    for name in entries.keys() {
                        if !names.iter().any(|n| n == name) {
                            names.push(name.clone());
                        }
                    }
                }
            }
        }
        names
    }

    /// Whether this pair declares that it requires a companion app host.
    pub fn requires_app_host(&self) -> Result<bool, Fault> {
        Ok(matches!(
            self.value("requires_app_host")?,
            Some(Json::Bool(true))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use serde_json::json;

    fn tree() -> Specification {
        loader::from_value(json!({
            "name": "Foo",
            "summary": "root summary",
            "compiler_flags": "-root",
            "dependencies": {"RootDep": []},
            "ios": {"compiler_flags": "-ios-root"},
            "subspecs": [{
                "name": "Sub",
                "dependencies": {"SubDep": []},
                "ios": {"summary": "ios sub summary"}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_platform_section_wins_over_base() {
        let root = tree();
        let consumer = Consumer::new(vec![&root], Platform::new("ios"));
        let value = consumer.value("compiler_flags").unwrap();
        assert_eq!(value, Some(&json!("-ios-root")));
    }

    #[test]
    fn test_subspec_falls_back_to_root() {
        let root = tree();
        let sub = &root.subspecs[0];
        let consumer = Consumer::new(vec![sub, &root], Platform::new("osx"));
        assert_eq!(
            consumer.value("compiler_flags").unwrap(),
            Some(&json!("-root"))
        );
        // The leaf's own platform section still wins when present.
        let consumer = Consumer::new(vec![sub, &root], Platform::new("ios"));
        assert_eq!(
            consumer.value("summary").unwrap(),
            Some(&json!("ios sub summary"))
        );
    }

    #[test]
    fn test_dependency_names_aggregate_leaf_first() {
        let root = tree();
        let sub = &root.subspecs[0];
        let consumer = Consumer::new(vec![sub, &root], Platform::new("ios"));
        assert_eq!(consumer.dependency_names(), vec!["SubDep", "RootDep"]);
    }

    #[test]
    fn test_requires_app_host_only_on_literal_true() {
        let with_host = loader::from_value(json!({"requires_app_host": true})).unwrap();
        assert!(Consumer::root(&with_host).requires_app_host().unwrap());
        let stringly = loader::from_value(json!({"requires_app_host": "true"})).unwrap();
        assert!(!Consumer::root(&stringly).requires_app_host().unwrap());
        let absent = loader::from_value(json!({})).unwrap();
        assert!(!Consumer::root(&absent).requires_app_host().unwrap());
    }

    #[test]
    fn test_root_and_spec_accessors() {
        let root = tree();
        let sub = &root.subspecs[0];
        let consumer = Consumer::new(vec![sub, &root], Platform::new("ios"));
        assert!(consumer.is_subspec());
        assert_eq!(consumer.spec().name(), Some("Sub"));
        assert_eq!(consumer.root_spec().name(), Some("Foo"));
        assert!(!Consumer::root(&root).is_subspec());
    }
}
