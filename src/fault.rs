//! Closed set of fault kinds caught during a lint pass.
//!
//! Three channels exist: manifest loading, attribute value resolution, and
//! validation hook execution. Every caught fault is converted into a visible
//! `Issue`; none escape the pass as an uncaught error.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// A caught failure, tagged with the attribute (or file) it belongs to.
pub enum Fault {
    /// The manifest could not be loaded at all.
    #[error("{message}")]
    Load { file: String, message: String },
    /// Resolving an attribute value against the specification failed.
    #[error("{message}")]
    AttributeAccess { attribute: String, message: String },
    /// A validation hook failed while running.
    #[error("{message}")]
    Hook { attribute: String, message: String },
}

impl Fault {
    /// The attribute this fault is tagged with, when it has one.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Fault::Load { .. } => None,
            Fault::AttributeAccess { attribute, .. } | Fault::Hook { attribute, .. } => {
                Some(attribute)
            }
        }
    }
}
