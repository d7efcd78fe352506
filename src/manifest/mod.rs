// manifest/mod.rs

//! # Manifest Module
//!
//! Turns a chart render (concatenated multi-document YAML) into an immutable
//! [`ManifestMapping`] keyed by [`ResourceIdentity`].
//!
//! Identity is `(kind, namespace, name)` and deliberately ignores `apiVersion`
//! so that a resource migrated to a new API version is still matched
//! against its previous render. Matching across renders is always by
//! identity, never by document position.

pub mod parse;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use parse::{parse, split_documents};

/// Stable identity of a rendered resource.
///
/// Field order matters: the derived `Ord` sorts by kind, then namespace,
/// then name, which is the order reports are written in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResourceIdentity {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceIdentity {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// A single resource extracted from a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingResult {
    /// Resource type discriminator (`kind`).
    pub kind: String,
    pub name: String,
    /// Never empty: documents without a namespace get the ambient one.
    pub namespace: String,
    /// Diagnostics only, not part of the identity.
    pub api_version: String,
    /// Template path or hook path the document came from.
    pub source: Option<String>,
    /// Value of the `helm.sh/hook` annotation, when present.
    pub hook: Option<String>,
    /// Normalized YAML body of the document.
    pub content: String,
}

impl MappingResult {
    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(&self.kind, &self.namespace, &self.name)
    }

    /// Human readable provenance, falling back to the identity.
    pub fn origin(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| self.identity().to_string())
    }

    /// True for hooks bound to a `helm test` phase.
    pub fn is_test_hook(&self) -> bool {
        self.hook.as_deref().map_or(false, |phases| {
            phases
                .split(',')
                .any(|phase| phase.trim().starts_with("test"))
        })
    }
}

/// Immutable snapshot of one render, keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMapping {
    entries: BTreeMap<ResourceIdentity, MappingResult>,
}

impl ManifestMapping {
    /// The mapping of a release that does not exist yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: BTreeMap<ResourceIdentity, MappingResult>) -> Self {
        Self { entries }
    }

    pub fn get(&self, identity: &ResourceIdentity) -> Option<&MappingResult> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &ResourceIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &ResourceIdentity> {
        self.entries.keys()
    }

    /// Returns a new mapping without `helm test` hooks.
    pub fn without_test_hooks(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(_, result)| !result.is_test_hook())
            .map(|(identity, result)| (identity.clone(), result.clone()))
            .collect();
        Self { entries }
    }
}

/// Later items win on identity collisions, matching [`parse`].
impl FromIterator<MappingResult> for ManifestMapping {
    fn from_iter<T: IntoIterator<Item = MappingResult>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|result| (result.identity(), result))
            .collect();
        Self { entries }
    }
}

/// Non-fatal problems found while extracting a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    #[error("skipping malformed document #{index} ({origin}): {reason}")]
    Malformed {
        index: usize,
        origin: String,
        reason: String,
    },

    #[error("found duplicate resource {identity} in manifest ({first} and {second}), keeping the later one")]
    Duplicate {
        identity: ResourceIdentity,
        first: String,
        second: String,
    },
}

/// Result of extracting one render.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub mapping: ManifestMapping,
    pub warnings: Vec<ExtractWarning>,
}
