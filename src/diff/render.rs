// diff/render.rs

//! Report renderers for the `diff`, `simple` and `json` output formats.
//!
//! No renderer ever prints content lines of a suppressed record; the engine
//! drops them before a record gets here.

use colored::Colorize;
use serde::Serialize;

use super::model::{Classification, DiffLine, DiffOptions, DiffRecord, DiffReport, LineTag, OutputFormat};

/// Marker printed in place of hidden unchanged lines.
pub const ELISION_MARKER: &str = "...";

/// Renders `report` in the format selected by `options`.
pub fn render(report: &DiffReport, options: &DiffOptions) -> String {
    match options.output {
        OutputFormat::Diff => render_diff(report, options),
        OutputFormat::Simple => render_simple(report, options),
        OutputFormat::Json => render_json(report),
    }
}

fn render_diff(report: &DiffReport, options: &DiffOptions) -> String {
    let mut out = String::new();

    for record in report.changes() {
        let header = format!("{} {}:", record.identity, record.classification.describe());
        push_line(&mut out, &paint_header(&header, options.color));

        if record.suppressed {
            let notice = format!(
                "+ Changes suppressed on sensitive content of type {}",
                record.identity.kind
            );
            push_line(&mut out, &paint_header(&notice, options.color));
            continue;
        }

        for entry in window(&record.lines, options.context) {
            match entry {
                Some(line) => push_line(&mut out, &format_line(line, options.color)),
                None => push_line(&mut out, ELISION_MARKER),
            }
        }
    }

    out
}

fn render_simple(report: &DiffReport, options: &DiffOptions) -> String {
    let mut out = String::new();

    for record in report.changes() {
        let counts = format!("(+{}/-{})", record.additions, record.removals);
        let line = format!(
            "{} {} {}",
            record.identity,
            record.classification.describe(),
            counts
        );
        push_line(&mut out, &paint_simple(&line, record.classification, options.color));
    }

    push_line(
        &mut out,
        &format!(
            "Plan: {} to add, {} to change, {} to destroy.",
            report.count(Classification::Added),
            report.count(Classification::Changed),
            report.count(Classification::Removed)
        ),
    );
    out
}

#[derive(Serialize)]
struct JsonChange<'a> {
    api: &'a str,
    kind: &'a str,
    namespace: &'a str,
    name: &'a str,
    change: &'static str,
}

impl<'a> From<&'a DiffRecord> for JsonChange<'a> {
    fn from(record: &'a DiffRecord) -> Self {
        Self {
            api: &record.api_version,
            kind: &record.identity.kind,
            namespace: &record.identity.namespace,
            name: &record.identity.name,
            change: record.classification.label(),
        }
    }
}

fn render_json(report: &DiffReport) -> String {
    let changes: Vec<JsonChange<'_>> = report.changes().map(JsonChange::from).collect();
    let mut out = serde_json::to_string_pretty(&changes).unwrap_or_else(|_| "[]".to_string());
    out.push('\n');
    out
}

/// Applies the context window to an edit script.
///
/// With `Some(n)` a line is kept when it lies within `n` lines of a change;
/// every maximal run of dropped lines collapses into a single `None`.
fn window(lines: &[DiffLine], context: Option<usize>) -> Vec<Option<&DiffLine>> {
    let Some(context) = context else {
        return lines.iter().map(Some).collect();
    };

    let distances = change_distances(lines);
    let mut visible = Vec::with_capacity(lines.len());
    let mut omitting = false;

    for (line, distance) in lines.iter().zip(distances) {
        if distance > context {
            if !omitting {
                visible.push(None);
                omitting = true;
            }
        } else {
            omitting = false;
            visible.push(Some(line));
        }
    }
    visible
}

/// Distance from every line to the closest changed line.
fn change_distances(lines: &[DiffLine]) -> Vec<usize> {
    let mut distances = vec![usize::MAX; lines.len()];

    let mut last_change = None;
    for (i, line) in lines.iter().enumerate() {
        if line.is_change() {
            last_change = Some(i);
        }
        if let Some(change) = last_change {
            distances[i] = i - change;
        }
    }

    let mut next_change = None;
    for (i, line) in lines.iter().enumerate().rev() {
        if line.is_change() {
            next_change = Some(i);
        }
        if let Some(change) = next_change {
            distances[i] = distances[i].min(change - i);
        }
    }

    distances
}

fn format_line(line: &DiffLine, color: bool) -> String {
    let text = match line.tag {
        LineTag::Added => format!("+ {}", line.text),
        LineTag::Removed => format!("- {}", line.text),
        LineTag::Common => format!("  {}", line.text),
    };

    if !color {
        return text;
    }
    match line.tag {
        LineTag::Added => text.green().to_string(),
        LineTag::Removed => text.red().to_string(),
        LineTag::Common => text,
    }
}

fn paint_header(text: &str, color: bool) -> String {
    if color {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

fn paint_simple(text: &str, classification: Classification, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match classification {
        Classification::Added => text.green().to_string(),
        Classification::Removed => text.red().to_string(),
        _ => text.yellow().to_string(),
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
