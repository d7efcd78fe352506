// helm/release.rs

//! # Rendered Release
//!
//! The part of a helm release the diff cares about: the rendered manifest
//! text and the hooks. Dry-run releases are decoded from helm's JSON output;
//! deployed releases are assembled from `helm get manifest` and
//! `helm get hooks` text.

use serde::Deserialize;

use crate::manifest::split_documents;

/// A hook as helm reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Hook {
    /// Template path the hook was rendered from.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub manifest: String,
}

/// Rendered state of a release, before or after an upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderedRelease {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub manifest: String,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

impl RenderedRelease {
    /// Decodes the release object printed by `helm install|upgrade --output json`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builds a release from `helm get manifest` and `helm get hooks` output.
    pub fn from_text(name: &str, namespace: &str, manifest: String, hooks_text: &str) -> Self {
        let hooks = split_documents(hooks_text)
            .into_iter()
            .filter(|segment| !segment.is_blank())
            .map(|segment| Hook {
                path: segment.source.unwrap_or_default(),
                manifest: segment.body,
                ..Hook::default()
            })
            .collect();

        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            manifest,
            hooks,
        }
    }

    /// The manifest followed by every hook as its own document, each tagged
    /// with a `# Source:` comment so hooks extract like any other template.
    pub fn combined_manifest(&self) -> String {
        let mut combined = self.manifest.clone();
        for hook in &self.hooks {
            combined.push_str("\n---\n");
            if !hook.path.is_empty() {
                combined.push_str(&format!("# Source: {}\n", hook.path));
            }
            combined.push_str(&hook.manifest);
        }
        combined
    }
}
