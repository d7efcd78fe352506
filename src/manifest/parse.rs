// manifest/parse.rs

//! # Manifest Parsing
//!
//! Splits rendered helm output into documents and extracts one
//! [`MappingResult`] per resource. Parsing is total: a broken document
//! becomes an [`ExtractWarning`] and the rest of the render still counts.
//!
//! ## Example Usage
//! ```rust
//! use crate::manifest::parse;
//!
//! let extraction = parse("---\n# Source: chart/templates/cm.yaml\nkind: ConfigMap\nmetadata:\n  name: cfg\n", "default");
//! assert_eq!(extraction.mapping.len(), 1);
//! ```

use std::collections::BTreeMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

use super::{ExtractWarning, Extraction, ManifestMapping, MappingResult, ResourceIdentity};
use crate::app::HOOK_ANNOTATION;

/// A `---` line, optionally followed by a comment.
static DOCUMENT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^---[ \t]*(?:#.*)?$").expect("valid separator regex"));

/// The provenance comment helm writes above every rendered template.
static SOURCE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*Source:\s*(\S.*?)\s*$").expect("valid source regex"));

/// One raw document of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of the document in the render, starting at 1.
    pub index: usize,
    /// Path from the leading `# Source:` comment, if any.
    pub source: Option<String>,
    /// Document text without the provenance comment.
    pub body: String,
}

impl Segment {
    /// True when the segment holds nothing but blank lines and comments.
    pub fn is_blank(&self) -> bool {
        self.body.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        })
    }

    fn origin(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(|| format!("document #{}", self.index))
    }
}

/// Shape of a parsed document.
enum Document {
    /// Renders to nothing usable (no `kind`): skipped silently.
    Empty,
    Plain(Value),
    /// A `*List` container; only its items are resources.
    List(Vec<Value>),
}

impl Document {
    fn classify(value: Value) -> Self {
        let is_list = match value.get("kind").and_then(Value::as_str) {
            None | Some("") => return Self::Empty,
            Some(kind) => kind.ends_with("List"),
        };

        if is_list {
            if let Some(Value::Sequence(items)) = value.get("items") {
                return Self::List(items.clone());
            }
        }

        Self::Plain(value)
    }
}

/// Splits a render into documents on `---` boundaries.
///
/// Line endings are normalized to `\n` first. Chunks that are entirely
/// whitespace (e.g. before a leading separator) are dropped.
pub fn split_documents(raw: &str) -> Vec<Segment> {
    let normalized = raw.replace("\r\n", "\n");

    DOCUMENT_SEPARATOR
        .split(&normalized)
        .filter(|chunk| !chunk.trim().is_empty())
        .enumerate()
        .map(|(position, chunk)| {
            let mut source = None;
            let mut body_lines = Vec::new();
            let mut in_preamble = true;

            for line in chunk.lines() {
                if in_preamble {
                    let trimmed = line.trim();
                    if source.is_none() {
                        if let Some(caps) = SOURCE_COMMENT.captures(trimmed) {
                            source = Some(caps[1].to_string());
                            continue;
                        }
                    }
                    in_preamble = trimmed.is_empty() || trimmed.starts_with('#');
                }
                body_lines.push(line);
            }

            Segment {
                index: position + 1,
                source,
                body: body_lines.join("\n").trim_matches('\n').to_string(),
            }
        })
        .collect()
}

/// Normalizes document text so formatting noise never shows up as a change.
pub(crate) fn normalize_content(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |last| last + 1);

    lines[start..end].join("\n")
}

/// Extracts every resource in `raw`, defaulting namespaces to `ambient_namespace`.
pub fn parse(raw: &str, ambient_namespace: &str) -> Extraction {
    let mut entries: BTreeMap<ResourceIdentity, MappingResult> = BTreeMap::new();
    let mut warnings = Vec::new();

    for segment in split_documents(raw) {
        if segment.is_blank() {
            debug!("Skipping empty document #{} ({})", segment.index, segment.origin());
            continue;
        }

        let value: Value = match serde_yaml::from_str(&segment.body) {
            Ok(value) => value,
            Err(e) => {
                record_warning(
                    &mut warnings,
                    ExtractWarning::Malformed {
                        index: segment.index,
                        origin: segment.origin(),
                        reason: e.to_string(),
                    },
                );
                continue;
            }
        };

        let candidates = match Document::classify(value) {
            Document::Empty => {
                debug!(
                    "Document #{} ({}) has no kind, skipping",
                    segment.index,
                    segment.origin()
                );
                continue;
            }
            Document::Plain(value) => vec![Ok((value, normalize_content(&segment.body)))],
            Document::List(items) => expand_list(items),
        };

        for candidate in candidates {
            let built = candidate.and_then(|(value, content)| {
                build_result(&value, content, segment.source.as_deref(), ambient_namespace)
            });

            match built {
                Ok(result) => {
                    let identity = result.identity();
                    let incoming_origin = result.origin();
                    if let Some(previous) = entries.insert(identity.clone(), result) {
                        record_warning(
                            &mut warnings,
                            ExtractWarning::Duplicate {
                                identity,
                                first: previous.origin(),
                                second: incoming_origin,
                            },
                        );
                    }
                }
                Err(reason) => record_warning(
                    &mut warnings,
                    ExtractWarning::Malformed {
                        index: segment.index,
                        origin: segment.origin(),
                        reason,
                    },
                ),
            }
        }
    }

    debug!(
        "Extracted {} resources ({} warnings)",
        entries.len(),
        warnings.len()
    );

    Extraction {
        mapping: ManifestMapping::from_entries(entries),
        warnings,
    }
}

/// Re-serializes list items so each carries its own content.
fn expand_list(items: Vec<Value>) -> Vec<Result<(Value, String), String>> {
    items
        .into_iter()
        .enumerate()
        .flat_map(|(position, item)| match Document::classify(item) {
            Document::Empty => vec![Err(format!("list item {} has no kind", position))],
            Document::List(nested) => expand_list(nested),
            Document::Plain(value) => {
                let serialized = serde_yaml::to_string(&value)
                    .map(|text| normalize_content(&text))
                    .map_err(|e| format!("list item {} could not be serialized: {}", position, e));
                vec![serialized.map(|content| (value, content))]
            }
        })
        .collect()
}

fn build_result(
    value: &Value,
    content: String,
    source: Option<&str>,
    ambient_namespace: &str,
) -> Result<MappingResult, String> {
    let kind = string_field(value, "kind").ok_or_else(|| "document has no kind".to_string())?;
    let metadata = value.get("metadata");

    let name = metadata
        .and_then(|m| string_field(m, "name"))
        .ok_or_else(|| format!("{} has no metadata.name", kind))?;

    let namespace = metadata
        .and_then(|m| string_field(m, "namespace"))
        .unwrap_or(ambient_namespace);

    let hook = metadata
        .and_then(|m| m.get("annotations"))
        .and_then(|annotations| annotations.get(HOOK_ANNOTATION))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(MappingResult {
        kind: kind.to_string(),
        name: name.to_string(),
        namespace: namespace.to_string(),
        api_version: string_field(value, "apiVersion").unwrap_or_default().to_string(),
        source: source.map(str::to_string),
        hook,
        content,
    })
}

/// Non-empty string field of a mapping.
fn string_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn record_warning(warnings: &mut Vec<ExtractWarning>, warning: ExtractWarning) {
    warn!("{}", warning);
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDER: &str = "\
---
# Source: app/templates/configmap.yaml
apiVersion: v1
kind: ConfigMap
metadata:
  name: cfg
data:
  a: \"1\"
---
# Source: app/templates/deployment.yaml
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
spec:
  replicas: 2
";

    fn id(kind: &str, namespace: &str, name: &str) -> ResourceIdentity {
        ResourceIdentity::new(kind, namespace, name)
    }

    #[test]
    fn test_empty_render_yields_empty_mapping() {
        let extraction = parse("", "default");
        assert!(extraction.mapping.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_parse_captures_identity_source_and_content() {
        let extraction = parse(RENDER, "default");
        let mapping = &extraction.mapping;
        assert_eq!(mapping.len(), 2);

        let cm = mapping.get(&id("ConfigMap", "default", "cfg")).unwrap();
        assert_eq!(cm.api_version, "v1");
        assert_eq!(cm.source.as_deref(), Some("app/templates/configmap.yaml"));
        assert!(cm.content.starts_with("apiVersion: v1"));
        assert!(!cm.content.contains("# Source:"));

        let deploy = mapping.get(&id("Deployment", "prod", "web")).unwrap();
        assert_eq!(deploy.namespace, "prod");
        assert!(deploy.content.ends_with("replicas: 2"));
    }

    #[test]
    fn test_missing_namespace_uses_ambient() {
        let extraction = parse(RENDER, "staging");
        assert!(extraction
            .mapping
            .contains(&id("ConfigMap", "staging", "cfg")));
        assert!(extraction.mapping.contains(&id("Deployment", "prod", "web")));
    }

    #[test]
    fn test_reparse_is_deterministic() {
        assert_eq!(
            parse(RENDER, "default").mapping,
            parse(RENDER, "default").mapping
        );
    }

    #[test]
    fn test_document_order_does_not_matter() {
        let segments = split_documents(RENDER);
        let reversed: String = segments
            .iter()
            .rev()
            .map(|s| {
                format!(
                    "---\n# Source: {}\n{}\n",
                    s.source.as_deref().unwrap_or_default(),
                    s.body
                )
            })
            .collect();

        assert_eq!(
            parse(RENDER, "default").mapping,
            parse(&reversed, "default").mapping
        );
    }

    #[test]
    fn test_comment_only_and_empty_templates_are_skipped_silently() {
        let raw = "---\n# Source: app/templates/NOTES.txt\n---\n# just a comment\n\n---\n\n";
        let extraction = parse(raw, "default");
        assert!(extraction.mapping.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_documents_without_kind_are_skipped() {
        let raw = "---\nfoo: bar\n---\n- a\n- b\n";
        let extraction = parse(raw, "default");
        assert!(extraction.mapping.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_malformed_document_is_skipped_with_warning() {
        let raw = "\
---
# Source: app/templates/broken.yaml
kind: ConfigMap
metadata: [unclosed
---
kind: ConfigMap
metadata:
  name: ok
";
        let extraction = parse(raw, "default");
        assert_eq!(extraction.mapping.len(), 1);
        assert_eq!(extraction.warnings.len(), 1);
        match &extraction.warnings[0] {
            ExtractWarning::Malformed { origin, .. } => {
                assert_eq!(origin, "app/templates/broken.yaml")
            }
            other => panic!("unexpected warning: {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_is_reported() {
        let raw = "kind: ConfigMap\nmetadata:\n  namespace: x\n";
        let extraction = parse(raw, "default");
        assert!(extraction.mapping.is_empty());
        assert!(extraction.warnings[0]
            .to_string()
            .contains("ConfigMap has no metadata.name"));
    }

    #[test]
    fn test_duplicate_identity_keeps_later_document() {
        let raw = "\
---
# Source: app/templates/a.yaml
kind: ConfigMap
metadata:
  name: cfg
data:
  v: first
---
# Source: app/templates/b.yaml
kind: ConfigMap
metadata:
  name: cfg
data:
  v: second
";
        let extraction = parse(raw, "default");
        let cm = extraction
            .mapping
            .get(&id("ConfigMap", "default", "cfg"))
            .unwrap();
        assert!(cm.content.contains("second"));
        assert_eq!(cm.source.as_deref(), Some("app/templates/b.yaml"));
        assert_eq!(
            extraction.warnings,
            vec![ExtractWarning::Duplicate {
                identity: id("ConfigMap", "default", "cfg"),
                first: "app/templates/a.yaml".to_string(),
                second: "app/templates/b.yaml".to_string(),
            }]
        );
    }

    #[test]
    fn test_list_expands_into_items() {
        let raw = "\
apiVersion: v1
kind: List
items:
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: one
  - apiVersion: v1
    kind: Secret
    metadata:
      name: two
      namespace: other
";
        let extraction = parse(raw, "default");
        let mapping = &extraction.mapping;
        assert_eq!(mapping.len(), 2);
        assert!(!mapping.identities().any(|i| i.kind == "List"));
        let secret = mapping.get(&id("Secret", "other", "two")).unwrap();
        assert!(secret.content.contains("name: two"));
        assert!(!secret.content.contains("name: one"));
    }

    #[test]
    fn test_line_endings_and_trailing_whitespace_are_normalized() {
        let unix = "kind: ConfigMap\nmetadata:\n  name: cfg\ndata:\n  a: b\n";
        let windows = "kind: ConfigMap  \r\nmetadata:\r\n  name: cfg\r\ndata:\r\n  a: b\t\r\n\r\n\r\n";
        assert_eq!(
            parse(unix, "default").mapping,
            parse(windows, "default").mapping
        );
    }

    #[test]
    fn test_hook_annotation_is_captured() {
        let raw = "\
kind: Pod
metadata:
  name: smoke
  annotations:
    helm.sh/hook: test-success
";
        let extraction = parse(raw, "default");
        let pod = extraction.mapping.get(&id("Pod", "default", "smoke")).unwrap();
        assert_eq!(pod.hook.as_deref(), Some("test-success"));
        assert!(pod.is_test_hook());
    }

    #[test]
    fn test_split_documents_handles_separator_comments() {
        let raw = "a: 1\n--- # second\nb: 2\n";
        let segments = split_documents(raw);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].body, "a: 1");
        assert_eq!(segments[1].index, 2);
        assert_eq!(segments[1].body, "b: 2");
    }

    #[test]
    fn test_normalize_content() {
        assert_eq!(normalize_content("\n\na: 1  \nb: 2\n\n\n"), "a: 1\nb: 2");
        assert_eq!(normalize_content("   \n"), "");
    }
}
