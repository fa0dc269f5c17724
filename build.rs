// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Git metadata is optional: source tarballs build without it and the
    // version module falls back to the bare crate version.
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .fail_on_error()
        .emit()
        .or_else(|_| EmitBuilder::builder().emit())?;
    Ok(())
}
