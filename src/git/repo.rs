// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository operations.

use crate::error::{ClensError, FileAccessError, ParseError, RepositoryError, Result};
use git2::Repository as Git2Repo;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with additional functionality.
pub struct Repository {
    inner: Git2Repo,
    workdir: PathBuf,
}

impl Repository {
    /// Open a repository from the current directory.
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ClensError::Repository(RepositoryError::OpenFailed {
                message: format!("Failed to get current directory: {}", e),
            })
        })?;
        Self::open(&current_dir)
    }

    /// Open a repository from a path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                ClensError::Repository(RepositoryError::NotARepository)
            } else {
                ClensError::Repository(RepositoryError::OpenFailed {
                    message: e.message().to_string(),
                })
            }
        })?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                ClensError::Repository(RepositoryError::OpenFailed {
                    message: "Repository has no working directory (bare repository)".to_string(),
                })
            })?
            .to_path_buf();

        Ok(Self {
            inner: repo,
            workdir,
        })
    }

    /// Get a reference to the inner git2 repository.
    pub fn inner(&self) -> &Git2Repo {
        &self.inner
    }

    /// Get the working directory path.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve a reference (SHA, branch name, `HEAD^`, etc.) to a tree.
    pub fn tree_at(&self, reference: &str) -> Result<git2::Tree<'_>> {
        let obj = self.inner.revparse_single(reference).map_err(|e| {
            ClensError::Repository(RepositoryError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        let tree = obj.peel_to_tree().map_err(|e| {
            ClensError::Repository(RepositoryError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        Ok(tree)
    }

    /// Load the text content of a file at a given tree, if it exists there.
    ///
    /// Returns `None` for paths absent from the tree; binary or non-UTF-8
    /// blobs are logged and also yield `None`.
    pub fn blob_content(&self, tree: &git2::Tree<'_>, path: &str) -> Option<String> {
        let entry = tree.get_path(Path::new(path)).ok()?;
        let object = entry.to_object(&self.inner).ok()?;
        let blob = object.as_blob()?;
        if blob.is_binary() {
            tracing::debug!(
                "{}",
                FileAccessError::NotText {
                    path: PathBuf::from(path),
                }
            );
            return None;
        }
        match std::str::from_utf8(blob.content()) {
            Ok(s) => Some(s.to_string()),
            Err(_) => {
                tracing::debug!(
                    "{}",
                    ParseError::InvalidEncoding {
                        path: PathBuf::from(path),
                    }
                );
                None
            }
        }
    }

    /// Read a file's text content from the working directory.
    ///
    /// Returns `None` for missing files; unreadable or non-UTF-8 content is
    /// logged and also yields `None`.
    pub fn worktree_content(&self, path: &str) -> Option<String> {
        let full_path = self.workdir.join(path);
        let bytes = match std::fs::read(&full_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(_) => {
                tracing::warn!("{}", FileAccessError::ReadFailed { path: full_path });
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(content) => Some(content),
            Err(_) => {
                tracing::warn!("{}", ParseError::InvalidEncoding { path: full_path });
                None
            }
        }
    }
}
