// diff/lcs.rs

//! Line-level edit script based on the longest common subsequence.
//!
//! The common prefix and suffix are peeled off first, so the quadratic table
//! only covers the region that actually changed.

use super::model::{DiffLine, LineTag};

/// Computes a minimal edit script turning `before` into `after`.
///
/// Inside a replaced region removals are emitted before additions.
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut script = Vec::with_capacity(old.len().max(new.len()));
    script.extend(
        old[..prefix]
            .iter()
            .map(|line| DiffLine::new(LineTag::Common, *line)),
    );
    script.extend(lcs_script(
        &old[prefix..old.len() - suffix],
        &new[prefix..new.len() - suffix],
    ));
    script.extend(
        old[old.len() - suffix..]
            .iter()
            .map(|line| DiffLine::new(LineTag::Common, *line)),
    );
    script
}

/// Every line of `content` tagged the same way.
pub fn tag_all(content: &str, tag: LineTag) -> Vec<DiffLine> {
    content.lines().map(|line| DiffLine::new(tag, line)).collect()
}

fn lcs_script(old: &[&str], new: &[&str]) -> Vec<DiffLine> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;

    // table[i * width + j] = LCS length of old[i..] and new[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            script.push(DiffLine::new(LineTag::Common, old[i]));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            script.push(DiffLine::new(LineTag::Removed, old[i]));
            i += 1;
        } else {
            script.push(DiffLine::new(LineTag::Added, new[j]));
            j += 1;
        }
    }
    script.extend(old[i..].iter().map(|line| DiffLine::new(LineTag::Removed, *line)));
    script.extend(new[j..].iter().map(|line| DiffLine::new(LineTag::Added, *line)));
    script
}
