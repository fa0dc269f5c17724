// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git operations: repository access and change extraction.

pub mod extract;
pub mod repo;

pub use extract::{
    extract, ChangeKind, ChangeMetadata, Extraction, FileType, RawChange,
};
pub use repo::Repository;
