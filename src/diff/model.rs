// diff/model.rs

//! Types shared by the diff engine and the renderers.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::manifest::ResourceIdentity;

/// How a resource differs between the two renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl Classification {
    /// Anything except `Unchanged`.
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// Phrase used in report headers.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Added => "has been added",
            Self::Removed => "has been removed",
            Self::Changed => "has changed",
            Self::Unchanged => "is unchanged",
        }
    }

    /// Label used in JSON output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "ADD",
            Self::Removed => "REMOVE",
            Self::Changed => "MODIFY",
            Self::Unchanged => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Common,
    Added,
    Removed,
}

/// One line of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

impl DiffLine {
    pub fn new(tag: LineTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.tag != LineTag::Common
    }
}

/// Comparison outcome for a single identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub identity: ResourceIdentity,
    pub api_version: String,
    pub classification: Classification,
    /// Edit script; empty when unchanged or suppressed.
    pub lines: Vec<DiffLine>,
    pub additions: usize,
    pub removals: usize,
    /// Body withheld because the kind is suppressed.
    pub suppressed: bool,
}

/// Report output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Diff,
    Simple,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diff" => Ok(OutputFormat::Diff),
            "simple" => Ok(OutputFormat::Simple),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Diff => "diff",
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Everything the differ needs beyond the two mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Kinds whose bodies are withheld (exact, case-sensitive match).
    pub suppressed_kinds: BTreeSet<String>,
    /// Unchanged lines kept around each change; `None` shows everything.
    pub context: Option<usize>,
    pub output: OutputFormat,
    /// Emit ANSI colors in the `diff` format.
    pub color: bool,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress(mut self, kind: impl Into<String>) -> Self {
        self.suppressed_kinds.insert(kind.into());
        self
    }

    /// Negative values mean "unbounded", as with `--context -1`.
    pub fn with_context(mut self, lines: i64) -> Self {
        self.context = usize::try_from(lines).ok();
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn is_suppressed(&self, kind: &str) -> bool {
        self.suppressed_kinds.contains(kind)
    }
}

/// Result of one comparison pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// One record per identity, in identity order.
    pub records: Vec<DiffRecord>,
    /// True if any record is added, removed or changed.
    pub changed: bool,
}

impl DiffReport {
    /// Records that are not `Unchanged`.
    pub fn changes(&self) -> impl Iterator<Item = &DiffRecord> {
        self.records
            .iter()
            .filter(|record| record.classification.is_change())
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.records
            .iter()
            .filter(|record| record.classification == classification)
            .count()
    }

    pub fn identities(&self, classification: Classification) -> BTreeSet<&ResourceIdentity> {
        self.records
            .iter()
            .filter(|record| record.classification == classification)
            .map(|record| &record.identity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("diff".parse::<OutputFormat>(), Ok(OutputFormat::Diff));
        assert_eq!("SIMPLE".parse::<OutputFormat>(), Ok(OutputFormat::Simple));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_negative_context_means_unbounded() {
        assert_eq!(DiffOptions::new().with_context(-1).context, None);
        assert_eq!(DiffOptions::new().with_context(0).context, Some(0));
        assert_eq!(DiffOptions::new().with_context(3).context, Some(3));
    }

    #[test]
    fn test_suppression_is_case_sensitive() {
        let options = DiffOptions::new().suppress("Secret");
        assert!(options.is_suppressed("Secret"));
        assert!(!options.is_suppressed("secret"));
    }
}
