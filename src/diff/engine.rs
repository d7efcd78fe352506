// diff/engine.rs

//! Manifest comparison.
//!
//! The core entry point is [`compare`], a pure function of the two mappings
//! and a [`DiffOptions`] value. It never fails: every identity in the union
//! of both mappings yields exactly one [`DiffRecord`].

use std::collections::BTreeSet;

use log::debug;

use super::lcs::{diff_lines, tag_all};
use super::model::{Classification, DiffLine, DiffOptions, DiffRecord, DiffReport, LineTag};
use super::render::render;
use crate::manifest::{ManifestMapping, MappingResult, ResourceIdentity};

/// Compares two renders resource by resource.
pub fn compare(
    before: &ManifestMapping,
    after: &ManifestMapping,
    options: &DiffOptions,
) -> DiffReport {
    let identities: BTreeSet<&ResourceIdentity> =
        before.identities().chain(after.identities()).collect();

    let records: Vec<DiffRecord> = identities
        .into_iter()
        .map(|identity| {
            compare_resource(identity, before.get(identity), after.get(identity), options)
        })
        .collect();

    let changed = records
        .iter()
        .any(|record| record.classification.is_change());

    debug!(
        "Compared {} resources: {} added, {} removed, {} changed",
        records.len(),
        records
            .iter()
            .filter(|r| r.classification == Classification::Added)
            .count(),
        records
            .iter()
            .filter(|r| r.classification == Classification::Removed)
            .count(),
        records
            .iter()
            .filter(|r| r.classification == Classification::Changed)
            .count(),
    );

    DiffReport { records, changed }
}

/// Compares and renders in one step, returning the report text and whether
/// anything changed.
pub fn diff_manifests(
    before: &ManifestMapping,
    after: &ManifestMapping,
    options: &DiffOptions,
) -> (String, bool) {
    let report = compare(before, after, options);
    (render(&report, options), report.changed)
}

fn compare_resource(
    identity: &ResourceIdentity,
    old: Option<&MappingResult>,
    new: Option<&MappingResult>,
    options: &DiffOptions,
) -> DiffRecord {
    let (classification, lines, api_version) = match (old, new) {
        (None, Some(new)) => (
            Classification::Added,
            tag_all(&new.content, LineTag::Added),
            new.api_version.clone(),
        ),
        (Some(old), None) => (
            Classification::Removed,
            tag_all(&old.content, LineTag::Removed),
            old.api_version.clone(),
        ),
        (Some(old), Some(new)) => {
            let lines = diff_lines(&old.content, &new.content);
            let classification = if lines.iter().any(DiffLine::is_change) {
                Classification::Changed
            } else {
                Classification::Unchanged
            };
            (classification, lines, new.api_version.clone())
        }
        (None, None) => (Classification::Unchanged, Vec::new(), String::new()),
    };

    let additions = lines.iter().filter(|l| l.tag == LineTag::Added).count();
    let removals = lines.iter().filter(|l| l.tag == LineTag::Removed).count();
    let suppressed = classification.is_change() && options.is_suppressed(&identity.kind);

    if classification.is_change() {
        debug!(
            "{} {} (+{}/-{}{})",
            identity,
            classification.describe(),
            additions,
            removals,
            if suppressed { ", suppressed" } else { "" }
        );
    }

    let lines = if suppressed || !classification.is_change() {
        Vec::new()
    } else {
        lines
    };

    DiffRecord {
        identity: identity.clone(),
        api_version,
        classification,
        lines,
        additions,
        removals,
        suppressed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse;

    fn resource(kind: &str, namespace: &str, name: &str, content: &str) -> MappingResult {
        MappingResult {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            api_version: "v1".to_string(),
            source: None,
            hook: None,
            content: content.to_string(),
        }
    }

    fn mapping(resources: Vec<MappingResult>) -> ManifestMapping {
        resources.into_iter().collect()
    }

    #[test]
    fn test_added_resource_against_empty_release() {
        let before = ManifestMapping::empty();
        let after = mapping(vec![resource("ConfigMap", "default", "cfg", "a: 1")]);

        let (report, changed) = diff_manifests(&before, &after, &DiffOptions::new());
        assert!(changed);
        assert_eq!(report, "ConfigMap/default/cfg has been added:\n+ a: 1\n");
    }

    #[test]
    fn test_suppressed_secret_keeps_signal_but_hides_content() {
        let before = mapping(vec![resource("Secret", "default", "s", "data: X")]);
        let after = mapping(vec![resource("Secret", "default", "s", "data: Y")]);
        let options = DiffOptions::new().suppress("Secret");

        let result = compare(&before, &after, &options);
        assert!(result.changed);
        assert_eq!(result.records[0].classification, Classification::Changed);
        assert!(result.records[0].suppressed);
        assert!(result.records[0].lines.is_empty());

        let (report, changed) = diff_manifests(&before, &after, &options);
        assert!(changed);
        assert!(report.contains("Secret/default/s has changed:"));
        assert!(report.contains("Changes suppressed on sensitive content of type Secret"));
        assert!(!report.contains('X'));
        assert!(!report.contains('Y'));
    }

    #[test]
    fn test_removed_resource_shows_full_content() {
        let content = "kind: Deployment\nmetadata:\n  name: d\nspec:\n  replicas: 3";
        let before = mapping(vec![resource("Deployment", "ns", "d", content)]);
        let after = ManifestMapping::empty();

        let (report, changed) = diff_manifests(&before, &after, &DiffOptions::new());
        assert!(changed);
        assert!(report.starts_with("Deployment/ns/d has been removed:\n"));
        for line in content.lines() {
            assert!(report.contains(&format!("- {}", line)));
        }
    }

    #[test]
    fn test_comparing_a_mapping_with_itself_is_a_no_op() {
        let render = "\
kind: ConfigMap
metadata:
  name: a
---
kind: Service
metadata:
  name: b
";
        let a = parse(render, "default").mapping;
        let (report, changed) = diff_manifests(&a, &a, &DiffOptions::new().with_context(-1));
        assert!(!changed);
        assert!(report.is_empty());
    }

    #[test]
    fn test_classification_is_symmetric() {
        let a = mapping(vec![
            resource("ConfigMap", "default", "only-a", "x: 1"),
            resource("Service", "default", "both", "port: 80"),
            resource("Job", "default", "same", "image: a"),
        ]);
        let b = mapping(vec![
            resource("ConfigMap", "default", "only-b", "y: 1"),
            resource("Service", "default", "both", "port: 8080"),
            resource("Job", "default", "same", "image: a"),
        ]);
        let options = DiffOptions::new();

        let forward = compare(&a, &b, &options);
        let backward = compare(&b, &a, &options);

        assert_eq!(
            forward.identities(Classification::Added),
            backward.identities(Classification::Removed)
        );
        assert_eq!(
            forward.identities(Classification::Removed),
            backward.identities(Classification::Added)
        );
        assert_eq!(
            forward.identities(Classification::Changed),
            backward.identities(Classification::Changed)
        );
        assert_eq!(forward.count(Classification::Unchanged), 1);
    }

    #[test]
    fn test_records_follow_identity_order() {
        let before = mapping(vec![
            resource("Service", "b", "svc", "a"),
            resource("ConfigMap", "z", "cfg", "a"),
        ]);
        let after = mapping(vec![
            resource("ConfigMap", "a", "cfg", "a"),
            resource("Deployment", "a", "web", "a"),
        ]);

        let report = compare(&before, &after, &DiffOptions::new());
        let order: Vec<String> = report
            .records
            .iter()
            .map(|r| r.identity.to_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "ConfigMap/a/cfg",
                "ConfigMap/z/cfg",
                "Deployment/a/web",
                "Service/b/svc"
            ]
        );
    }

    #[test]
    fn test_suppression_also_applies_to_added_and_removed() {
        let before = mapping(vec![resource("Secret", "default", "old", "password: hunter2")]);
        let after = mapping(vec![resource("Secret", "default", "new", "password: swordfish")]);
        let options = DiffOptions::new().suppress("Secret");

        let (report, changed) = diff_manifests(&before, &after, &options);
        assert!(changed);
        assert!(report.contains("Secret/default/new has been added:"));
        assert!(report.contains("Secret/default/old has been removed:"));
        assert!(!report.contains("hunter2"));
        assert!(!report.contains("swordfish"));
    }

    #[test]
    fn test_counts_are_tracked() {
        let before = mapping(vec![resource("ConfigMap", "default", "cfg", "a: 1\nb: 2")]);
        let after = mapping(vec![resource("ConfigMap", "default", "cfg", "a: 1\nb: 3\nc: 4")]);

        let report = compare(&before, &after, &DiffOptions::new());
        let record = &report.records[0];
        assert_eq!(record.additions, 2);
        assert_eq!(record.removals, 1);
    }
}
