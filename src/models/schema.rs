//! Attribute schema: the enumerable descriptor table driving the lint pass.
//!
//! The default table describes the podspec attribute set. Callers may inject
//! a custom `Schema` into the linter; the engine only ever queries the
//! required, root-only, and non-root subsets.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One attribute descriptor. Names are unique within a schema.
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub required: bool,
    pub root_only: bool,
}

impl AttributeDescriptor {
    pub const fn new(name: &'static str, required: bool, root_only: bool) -> Self {
        AttributeDescriptor {
            name,
            required,
            root_only,
        }
    }
}

const DEFAULT_ATTRIBUTES: &[AttributeDescriptor] = &[
    AttributeDescriptor::new("name", true, true),
    AttributeDescriptor::new("version", true, true),
    AttributeDescriptor::new("authors", true, true),
    AttributeDescriptor::new("license", true, true),
    AttributeDescriptor::new("homepage", true, true),
    AttributeDescriptor::new("source", true, true),
    AttributeDescriptor::new("summary", true, true),
    AttributeDescriptor::new("description", false, true),
    AttributeDescriptor::new("module_name", false, true),
    AttributeDescriptor::new("social_media_url", false, true),
    AttributeDescriptor::new("readme", false, true),
    AttributeDescriptor::new("changelog", false, true),
    AttributeDescriptor::new("deprecated_in_favor_of", false, true),
    AttributeDescriptor::new("swift_versions", false, true),
    AttributeDescriptor::new("cocoapods_version", false, true),
    AttributeDescriptor::new("requires_arc", false, false),
    AttributeDescriptor::new("frameworks", false, false),
    AttributeDescriptor::new("weak_frameworks", false, false),
    AttributeDescriptor::new("libraries", false, false),
    AttributeDescriptor::new("vendored_libraries", false, false),
    AttributeDescriptor::new("compiler_flags", false, false),
    AttributeDescriptor::new("script_phases", false, false),
    AttributeDescriptor::new("scheme", false, false),
    AttributeDescriptor::new("info_plist", false, false),
    AttributeDescriptor::new("test_type", false, false),
    AttributeDescriptor::new("app_host_name", false, false),
    AttributeDescriptor::new("requires_app_host", false, false),
    AttributeDescriptor::new("dependencies", false, false),
    AttributeDescriptor::new("source_files", false, false),
    AttributeDescriptor::new("platforms", false, false),
];

#[derive(Clone, Debug)]
/// An enumerable set of attribute descriptors.
pub struct Schema {
    descriptors: Vec<AttributeDescriptor>,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            descriptors: DEFAULT_ATTRIBUTES.to_vec(),
        }
    }
}

impl Schema {
    /// A schema over a custom descriptor set. Names must be unique.
    pub fn new(descriptors: Vec<AttributeDescriptor>) -> Self {
        debug_assert!(
            descriptors
                .iter()
                .enumerate()
                .all(|(i, d)| descriptors[..i].iter().all(|e| e.name != d.name)),
            "attribute names must be unique within a schema"
        );
        Schema { descriptors }
    }

    pub fn descriptors(&self) -> &[AttributeDescriptor] {
        &self.descriptors
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == name)
    }

    /// Attributes a specification must carry.
    pub fn required(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.descriptors.iter().filter(|d| d.required)
    }

    /// Attributes meaningful only at the manifest root.
    pub fn root_only(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.descriptors.iter().filter(|d| d.root_only)
    }

    /// Attributes resolved per (subspec, platform) pair.
    pub fn non_root(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.descriptors.iter().filter(|d| !d.root_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_subsets() {
        let schema = Schema::default();
        let required: Vec<_> = schema.required().map(|d| d.name).collect();
        assert_eq!(
            required,
            vec!["name", "version", "authors", "license", "homepage", "source", "summary"]
        );
        assert!(schema.root_only().any(|d| d.name == "deprecated_in_favor_of"));
        assert!(schema.non_root().any(|d| d.name == "script_phases"));
        assert!(!schema.non_root().any(|d| d.name == "name"));
    }

    #[test]
    fn test_default_schema_names_are_unique() {
        let schema = Schema::default();
        let descriptors = schema.descriptors();
        for (i, d) in descriptors.iter().enumerate() {
            assert!(
                descriptors[..i].iter().all(|e| e.name != d.name),
                "duplicate descriptor `{}`",
                d.name
            );
        }
    }

    #[test]
    fn test_contains() {
        let schema = Schema::default();
        assert!(schema.contains("requires_arc"));
        assert!(!schema.contains("no_such_attribute"));
    }
}
