// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Simplified hunk extraction.
//!
//! One hunk per file spanning the whole content, with added/removed lines
//! computed by positional comparison rather than LCS diffing. This is a
//! deliberate contract: downstream scoring was tuned against it.

use serde::Serialize;

/// A contiguous block of changed lines within a file's diff.
#[derive(Debug, Clone, Serialize)]
pub struct CodeHunk {
    /// 1-based start line in the old content.
    pub old_start: usize,
    /// Line count of the old content.
    pub old_line_count: usize,
    /// 1-based start line in the new content.
    pub new_start: usize,
    /// Line count of the new content.
    pub new_line_count: usize,
    /// Lines present in the new content that differ positionally.
    pub added_lines: Vec<String>,
    /// Lines present in the old content that differ positionally.
    pub removed_lines: Vec<String>,
}

/// Extract the single whole-file hunk for a change.
///
/// Returns `None` when neither side has text content (binary files).
pub fn extract_hunk(old_content: Option<&str>, new_content: Option<&str>) -> Option<CodeHunk> {
    if old_content.is_none() && new_content.is_none() {
        return None;
    }

    let old_lines: Vec<&str> = old_content.map(|c| c.lines().collect()).unwrap_or_default();
    let new_lines: Vec<&str> = new_content.map(|c| c.lines().collect()).unwrap_or_default();

    let mut added = Vec::new();
    let mut removed = Vec::new();

    let max_len = old_lines.len().max(new_lines.len());
    for i in 0..max_len {
        let old_line = old_lines.get(i);
        let new_line = new_lines.get(i);
        if old_line != new_line {
            if let Some(line) = new_line {
                added.push((*line).to_string());
            }
            if let Some(line) = old_line {
                removed.push((*line).to_string());
            }
        }
    }

    Some(CodeHunk {
        old_start: 1,
        old_line_count: old_lines.len(),
        new_start: 1,
        new_line_count: new_lines.len(),
        added_lines: added,
        removed_lines: removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_for_appended_lines() {
        let hunk = extract_hunk(Some("a\nb\n"), Some("a\nb\nc\n")).unwrap();
        assert_eq!(hunk.old_line_count, 2);
        assert_eq!(hunk.new_line_count, 3);
        assert_eq!(hunk.added_lines, vec!["c"]);
        assert!(hunk.removed_lines.is_empty());
    }

    #[test]
    fn test_hunk_positional_not_lcs() {
        // Inserting at the top shifts every line, so positional comparison
        // reports the whole tail as changed.
        let hunk = extract_hunk(Some("a\nb\n"), Some("x\na\nb\n")).unwrap();
        assert_eq!(hunk.added_lines, vec!["x", "a", "b"]);
        assert_eq!(hunk.removed_lines, vec!["a", "b"]);
    }

    #[test]
    fn test_hunk_for_added_file() {
        let hunk = extract_hunk(None, Some("line\n")).unwrap();
        assert_eq!(hunk.old_line_count, 0);
        assert_eq!(hunk.added_lines, vec!["line"]);
    }

    #[test]
    fn test_no_hunk_for_binary() {
        assert!(extract_hunk(None, None).is_none());
    }

    #[test]
    fn test_hunk_identical_content() {
        let hunk = extract_hunk(Some("a\n"), Some("a\n")).unwrap();
        assert!(hunk.added_lines.is_empty());
        assert!(hunk.removed_lines.is_empty());
    }
}
