// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Change extraction from git references or the working tree.
//!
//! Stage 1 of the pipeline: produces one [`RawChange`] per changed file,
//! with best-effort old/new content and line-level metadata. Per-file read
//! failures are logged and the file is skipped; extraction never aborts the
//! whole run because one file is unreadable.

use crate::error::{FileAccessError, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::repo::Repository;

/// Kind of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeKind {
    /// Get the lowercase string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
        }
    }
}

/// Coarse file-type classification derived from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Script,
    Markup,
    Style,
    Config,
    Doc,
    Image,
    Test,
    Unknown,
}

impl FileType {
    /// Get the lowercase string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Script => "script",
            FileType::Markup => "markup",
            FileType::Style => "style",
            FileType::Config => "config",
            FileType::Doc => "doc",
            FileType::Image => "image",
            FileType::Test => "test",
            FileType::Unknown => "unknown",
        }
    }
}

/// Derived facts about a changed file.
#[derive(Debug, Clone)]
pub struct ChangeMetadata {
    /// Lines added, from a naive line-count delta (not a true diff).
    pub lines_added: usize,
    /// Lines removed, from a naive line-count delta.
    pub lines_removed: usize,
    /// Whether the extension is a known binary format.
    pub is_binary: bool,
    /// File-type classification.
    pub file_type: FileType,
    /// Lowercased extension, without the dot.
    pub extension: String,
    /// Containing directory, empty for repository root.
    pub directory: String,
}

/// A single raw file change between two repository states.
#[derive(Debug, Clone)]
pub struct RawChange {
    /// Repository-relative path (forward slashes).
    pub path: String,
    /// Kind of change.
    pub kind: ChangeKind,
    /// Previous path, for renames.
    pub old_path: Option<String>,
    /// Content at the base reference (absent for added files).
    pub old_content: Option<String>,
    /// Content at the head reference or on disk (absent for deleted files).
    pub new_content: Option<String>,
    /// Derived metadata.
    pub metadata: ChangeMetadata,
}

/// Result of change extraction, with skip accounting for the final report.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Extracted changes, in diff order.
    pub changes: Vec<RawChange>,
    /// Total changed files detected, including skipped ones.
    pub files_detected: usize,
    /// Files dropped due to read/show failures.
    pub files_skipped: usize,
}

/// Extract changes between two references, or against the working tree.
///
/// An empty or absent `head_ref` means "working tree including untracked
/// files": staged, unstaged, and untracked changes are merged into one set,
/// de-duplicated by path.
pub fn extract(repo: &Repository, base_ref: &str, head_ref: Option<&str>) -> Result<Extraction> {
    match head_ref {
        Some(head) if !head.is_empty() => extract_between_refs(repo, base_ref, head),
        _ => extract_worktree(repo, base_ref),
    }
}

/// Extract changes between two committed trees.
fn extract_between_refs(repo: &Repository, base_ref: &str, head_ref: &str) -> Result<Extraction> {
    let base_tree = repo.tree_at(base_ref)?;
    let head_tree = repo.tree_at(head_ref)?;

    let mut diff = repo
        .inner()
        .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)
        .map_err(|e| {
            crate::error::RepositoryError::DiffFailed {
                message: e.message().to_string(),
            }
        })?;

    // Enable rename detection so moved files surface as a single change.
    diff.find_similar(None).ok();

    let mut result = Extraction::default();

    for delta in diff.deltas() {
        result.files_detected += 1;

        let (path, old_path, kind) = match describe_delta(&delta) {
            Some(d) => d,
            None => {
                result.files_skipped += 1;
                continue;
            }
        };

        let is_binary = is_binary_path(&path);
        let (old_content, new_content) = if is_binary {
            (None, None)
        } else {
            let old = match kind {
                ChangeKind::Added => None,
                _ => repo.blob_content(&base_tree, old_path.as_deref().unwrap_or(&path)),
            };
            let new = match kind {
                ChangeKind::Deleted => None,
                _ => repo.blob_content(&head_tree, &path),
            };
            (old, new)
        };

        match build_change(path, old_path, kind, old_content, new_content, is_binary) {
            Ok(change) => result.changes.push(change),
            Err(err) => {
                let err = match err {
                    FileAccessError::ReadFailed { path } => FileAccessError::ShowFailed {
                        path,
                        reference: head_ref.to_string(),
                    },
                    other => other,
                };
                tracing::warn!("skipping file: {}", err);
                result.files_skipped += 1;
            }
        }
    }

    Ok(result)
}

/// Extract changes between a base reference and the working tree.
///
/// Staged, unstaged, and untracked files are merged; each path appears once.
fn extract_worktree(repo: &Repository, base_ref: &str) -> Result<Extraction> {
    let base_tree = repo.tree_at(base_ref)?;

    let mut options = git2::StatusOptions::new();
    options
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = repo.inner().statuses(Some(&mut options)).map_err(|e| {
        crate::error::RepositoryError::StatusFailed {
            message: e.message().to_string(),
        }
    })?;

    // Collect then sort: status order is not guaranteed, report order must be.
    let mut entries: Vec<(String, ChangeKind)> = Vec::new();
    for entry in statuses.iter() {
        let path = match entry.path() {
            Some(p) => p.to_string(),
            None => continue,
        };
        let status = entry.status();
        let kind = if status.intersects(git2::Status::INDEX_NEW | git2::Status::WT_NEW) {
            ChangeKind::Added
        } else if status.intersects(git2::Status::INDEX_DELETED | git2::Status::WT_DELETED) {
            ChangeKind::Deleted
        } else if status.intersects(git2::Status::INDEX_RENAMED | git2::Status::WT_RENAMED) {
            ChangeKind::Renamed
        } else if status.intersects(
            git2::Status::INDEX_MODIFIED
                | git2::Status::WT_MODIFIED
                | git2::Status::INDEX_TYPECHANGE
                | git2::Status::WT_TYPECHANGE,
        ) {
            ChangeKind::Modified
        } else {
            continue;
        };
        entries.push((path, kind));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.dedup_by(|a, b| a.0 == b.0);

    let mut result = Extraction::default();
    for (path, kind) in entries {
        result.files_detected += 1;

        let is_binary = is_binary_path(&path);
        let (old_content, new_content) = if is_binary {
            (None, None)
        } else {
            let old = match kind {
                ChangeKind::Added => None,
                _ => repo.blob_content(&base_tree, &path),
            };
            let new = match kind {
                ChangeKind::Deleted => None,
                _ => repo.worktree_content(&path),
            };
            (old, new)
        };

        match build_change(path, None, kind, old_content, new_content, is_binary) {
            Ok(change) => result.changes.push(change),
            Err(err) => {
                tracing::warn!("skipping file: {}", err);
                result.files_skipped += 1;
            }
        }
    }

    Ok(result)
}

/// Map a git2 delta to our path/kind representation.
fn describe_delta(delta: &git2::DiffDelta<'_>) -> Option<(String, Option<String>, ChangeKind)> {
    let new_path = delta
        .new_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());
    let old_path = delta
        .old_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());

    match delta.status() {
        git2::Delta::Added => Some((new_path?, None, ChangeKind::Added)),
        git2::Delta::Deleted => Some((old_path?, None, ChangeKind::Deleted)),
        git2::Delta::Modified | git2::Delta::Typechange => {
            Some((new_path.or(old_path)?, None, ChangeKind::Modified))
        }
        git2::Delta::Renamed | git2::Delta::Copied => {
            Some((new_path?, old_path, ChangeKind::Renamed))
        }
        _ => None,
    }
}

/// Assemble a [`RawChange`], or a [`FileAccessError`] when required content
/// is unreadable.
fn build_change(
    path: String,
    old_path: Option<String>,
    kind: ChangeKind,
    old_content: Option<String>,
    new_content: Option<String>,
    is_binary: bool,
) -> std::result::Result<RawChange, FileAccessError> {
    // Missing content where the change kind requires it means the file was
    // unreadable (permission denied, undeclared binary).
    if !is_binary {
        let readable = match kind {
            ChangeKind::Added => new_content.is_some(),
            ChangeKind::Deleted => old_content.is_some(),
            ChangeKind::Modified | ChangeKind::Renamed => {
                old_content.is_some() || new_content.is_some()
            }
        };
        if !readable {
            return Err(FileAccessError::ReadFailed {
                path: PathBuf::from(path),
            });
        }
    }

    let metadata = derive_metadata(&path, kind, old_content.as_deref(), new_content.as_deref());

    Ok(RawChange {
        path,
        kind,
        old_path,
        old_content,
        new_content,
        metadata,
    })
}

/// Derive line-level metadata for a change.
fn derive_metadata(
    path: &str,
    kind: ChangeKind,
    old_content: Option<&str>,
    new_content: Option<&str>,
) -> ChangeMetadata {
    let old_lines = old_content.map(count_lines).unwrap_or(0);
    let new_lines = new_content.map(count_lines).unwrap_or(0);

    // Naive line-count delta, not a true diff. Scoring weights are tuned
    // against this behavior.
    let (lines_added, lines_removed) = match kind {
        ChangeKind::Added => (new_lines, 0),
        ChangeKind::Deleted => (0, old_lines),
        ChangeKind::Modified | ChangeKind::Renamed => {
            if new_lines >= old_lines {
                (new_lines - old_lines, 0)
            } else {
                (0, old_lines - new_lines)
            }
        }
    };

    ChangeMetadata {
        lines_added,
        lines_removed,
        is_binary: is_binary_path(path),
        file_type: classify_file_type(path),
        extension: extension_of(path),
        directory: directory_of(path),
    }
}

/// Count lines in a content string.
fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        0
    } else {
        content.lines().count()
    }
}

/// Get the lowercased extension of a path, without the dot.
pub fn extension_of(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Get the containing directory of a path, empty for the repository root.
pub fn directory_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// Check whether the file name marks this as a test file.
pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    let file_name = lower.rsplit('/').next().unwrap_or(&lower);
    file_name.contains(".test.")
        || file_name.contains(".spec.")
        || lower.contains("__tests__/")
        || lower.starts_with("tests/")
        || lower.contains("/tests/")
        || lower.starts_with("test/")
        || lower.contains("/test/")
}

/// Classify a file by path. Test naming wins over the extension table.
pub fn classify_file_type(path: &str) -> FileType {
    if is_test_path(path) {
        return FileType::Test;
    }

    match extension_of(path).as_str() {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "vue" | "svelte" => FileType::Script,
        "html" | "htm" | "xml" => FileType::Markup,
        "css" | "scss" | "sass" | "less" | "styl" => FileType::Style,
        "json" | "yaml" | "yml" | "toml" | "ini" | "env" | "lock" => FileType::Config,
        "md" | "markdown" | "txt" | "rst" | "adoc" => FileType::Doc,
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" | "bmp" => FileType::Image,
        _ => FileType::Unknown,
    }
}

/// Check whether the extension is a known binary format.
pub fn is_binary_path(path: &str) -> bool {
    matches!(
        extension_of(path).as_str(),
        "png"
            | "jpg"
            | "jpeg"
            | "gif"
            | "ico"
            | "webp"
            | "bmp"
            | "woff"
            | "woff2"
            | "ttf"
            | "eot"
            | "pdf"
            | "zip"
            | "gz"
            | "tar"
            | "exe"
            | "dll"
            | "so"
            | "dylib"
            | "jar"
            | "class"
            | "mp3"
            | "mp4"
            | "avi"
            | "mov"
            | "wasm"
    )
}
