//! Embedded version constant rewriting
//!
//! Source files carry a single assignment such as
//! `const VITE_PLUGIN_SSR_VERSION = '0.4.2'`. The old snippet is matched
//! verbatim and replaced by the new one.

use crate::core::error::{RelkitResult, ResultExt, ValidationError};
use std::fs;
use std::path::Path;

/// The exact assignment line for `name` at `version`
pub fn snippet(name: &str, version: &str) -> String {
  format!("const {} = '{}'", name, version)
}

/// Replace the first occurrence of the old snippet in `content`
///
/// Fails when the old snippet is absent or the replacement changes nothing.
pub fn replace_version(content: &str, name: &str, old: &str, new: &str, file: &Path) -> RelkitResult<String> {
  let old_snippet = snippet(name, old);
  if !content.contains(&old_snippet) {
    return Err(
      ValidationError::VersionConstantMissing {
        file: file.to_path_buf(),
        snippet: old_snippet,
      }
      .into(),
    );
  }

  let updated = content.replacen(&old_snippet, &snippet(name, new), 1);
  if updated == content {
    return Err(ValidationError::VersionConstantUnchanged { file: file.to_path_buf() }.into());
  }

  Ok(updated)
}

/// Rewrite the version constant in every file, checking each before writing
pub fn update_version_files(files: &[impl AsRef<Path>], name: &str, old: &str, new: &str) -> RelkitResult<()> {
  for file in files {
    let file = file.as_ref();
    let content = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let updated = replace_version(&content, name, old, new, file)?;
    fs::write(file, updated).with_context(|| format!("Failed to write {}", file.display()))?;
    log::debug!("updated {} in {}", name, file.display());
  }
  Ok(())
}
