//! Release version computation and boilerplate version bumps

use crate::core::error::{RelkitResult, ValidationError};
use serde::Serialize;

/// Old and new version of the published package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionPlan {
  pub old: String,
  pub new: String,
}

impl VersionPlan {
  /// Compute the release version
  ///
  /// Uses `explicit` when given, otherwise the patch increment of `old`.
  /// Both versions must start with `prefix`.
  pub fn compute(old: &str, explicit: Option<&str>, prefix: &str) -> RelkitResult<Self> {
    if old.is_empty() {
      return Err(
        ValidationError::MalformedVersion {
          version: old.to_string(),
        }
        .into(),
      );
    }

    let new = match explicit.filter(|v| !v.is_empty()) {
      Some(version) => {
        semver::Version::parse(version)?;
        version.to_string()
      }
      None => increment_patch(old)?,
    };

    ensure_prefix(&new, prefix)?;
    ensure_prefix(old, prefix)?;

    Ok(Self {
      old: old.to_string(),
      new,
    })
  }

  /// Release tag for the new version
  pub fn tag(&self, tag_prefix: &str) -> String {
    format!("{}{}", tag_prefix, self.new)
  }
}

/// Patch increment with npm semantics: a prerelease is promoted to its
/// release (`0.4.3-beta.1` -> `0.4.3`), anything else bumps the patch.
pub fn increment_patch(version: &str) -> RelkitResult<String> {
  let mut parsed = semver::Version::parse(version)?;
  if parsed.pre.is_empty() {
    parsed.patch += 1;
  }
  parsed.pre = semver::Prerelease::EMPTY;
  parsed.build = semver::BuildMetadata::EMPTY;
  Ok(parsed.to_string())
}

/// Next version of the boilerplates package (`0.0.N` -> `0.0.N+1`)
pub fn bump_boilerplate_version(current: &str, prefix: &str) -> RelkitResult<String> {
  ensure_prefix(current, prefix)?;

  let parts: Vec<&str> = current.split('.').collect();
  if parts.len() != 3 {
    return Err(
      ValidationError::MalformedVersion {
        version: current.to_string(),
      }
      .into(),
    );
  }

  let patch: u64 = parts[2].parse().map_err(|_| ValidationError::MalformedVersion {
    version: current.to_string(),
  })?;

  Ok(format!("{}.{}.{}", parts[0], parts[1], patch + 1))
}

/// Fail unless `tag` starts with `prefix`
pub fn ensure_tag_prefix(tag: &str, prefix: &str) -> RelkitResult<()> {
  if tag.starts_with(prefix) {
    Ok(())
  } else {
    Err(
      ValidationError::TagPrefix {
        tag: tag.to_string(),
        expected_prefix: prefix.to_string(),
      }
      .into(),
    )
  }
}

fn ensure_prefix(version: &str, prefix: &str) -> RelkitResult<()> {
  if version.starts_with(prefix) {
    Ok(())
  } else {
    Err(
      ValidationError::VersionPrefix {
        version: version.to_string(),
        expected_prefix: prefix.to_string(),
      }
      .into(),
    )
  }
}
