//! package.json reading and rewriting
//!
//! Manifests are held as untyped JSON so fields relkit does not know about
//! survive a rewrite untouched, in their original order. Output matches
//! `JSON.stringify(pkg, null, 2) + '\n'`.

use crate::core::error::{RelkitError, RelkitResult, ResultExt, ValidationError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

/// A parsed package.json
#[derive(Debug, Clone)]
pub struct PackageManifest {
  path: PathBuf,
  data: Map<String, Value>,
}

impl PackageManifest {
  /// Read a package.json file
  pub fn read(path: &Path) -> RelkitResult<Self> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(path, &content)
  }

  /// Read `dir/package.json`, failing if the directory has none
  pub fn read_dir(dir: &Path) -> RelkitResult<Self> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
      return Err(ValidationError::ManifestMissing { dir: dir.to_path_buf() }.into());
    }
    Self::read(&path)
  }

  fn parse(path: &Path, content: &str) -> RelkitResult<Self> {
    let value: Value = serde_json::from_str(content).with_context(|| format!("Failed to parse {}", path.display()))?;
    match value {
      Value::Object(data) => Ok(Self {
        path: path.to_path_buf(),
        data,
      }),
      _ => Err(RelkitError::message(format!(
        "{} does not contain a JSON object",
        path.display()
      ))),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn name(&self) -> Option<&str> {
    self.data.get("name").and_then(Value::as_str)
  }

  pub fn version(&self) -> Option<&str> {
    self.data.get("version").and_then(Value::as_str)
  }

  /// Version, failing when absent or empty
  pub fn require_version(&self) -> RelkitResult<&str> {
    self.version().filter(|v| !v.is_empty()).ok_or_else(|| {
      ValidationError::MissingVersion {
        manifest: self.path.clone(),
      }
      .into()
    })
  }

  pub fn set_version(&mut self, version: &str) {
    self.data.insert("version".to_string(), Value::String(version.to_string()));
  }

  /// Version range of a runtime dependency
  pub fn dependency(&self, name: &str) -> Option<&str> {
    self
      .data
      .get("dependencies")
      .and_then(|deps| deps.get(name))
      .and_then(Value::as_str)
  }

  /// Whether `name` appears in `dependencies` or `devDependencies`
  pub fn depends_on(&self, name: &str) -> bool {
    ["dependencies", "devDependencies"]
      .iter()
      .any(|table| self.data.get(*table).and_then(|deps| deps.get(name)).is_some())
  }

  /// Set a runtime dependency's version range, creating the table if needed
  pub fn set_dependency(&mut self, name: &str, range: &str) {
    let deps = self
      .data
      .entry("dependencies")
      .or_insert_with(|| Value::Object(Map::new()));
    if !deps.is_object() {
      *deps = Value::Object(Map::new());
    }
    if let Value::Object(deps) = deps {
      deps.insert(name.to_string(), Value::String(range.to_string()));
    }
  }

  /// Whether `scripts` declares `name`
  pub fn has_script(&self, name: &str) -> bool {
    self
      .data
      .get("scripts")
      .and_then(|scripts| scripts.get(name))
      .is_some()
  }

  /// Browsable repository URL from the `repository` field
  ///
  /// Accepts the object form and the `github:org/repo` / `org/repo` shorthands.
  pub fn repository_url(&self) -> Option<String> {
    let raw = match self.data.get("repository")? {
      Value::String(s) => s.as_str(),
      Value::Object(obj) => obj.get("url").and_then(Value::as_str)?,
      _ => return None,
    };

    let url = raw.trim().trim_start_matches("git+");
    let url = url.strip_suffix(".git").unwrap_or(url);
    if url.starts_with("https://") || url.starts_with("http://") {
      return Some(url.trim_end_matches('/').to_string());
    }
    if let Some(rest) = url.strip_prefix("git@github.com:") {
      return Some(format!("https://github.com/{}", rest));
    }

    let shorthand = url.strip_prefix("github:").unwrap_or(url);
    let mut parts = shorthand.split('/');
    match (parts.next(), parts.next(), parts.next()) {
      (Some(org), Some(repo), None) if !org.is_empty() && !repo.is_empty() && !org.contains(':') => {
        Some(format!("https://github.com/{}/{}", org, repo))
      }
      _ => None,
    }
  }

  /// Serialized form written to disk
  pub fn to_json_string(&self) -> RelkitResult<String> {
    let mut out = serde_json::to_string_pretty(&self.data)?;
    out.push('\n');
    Ok(out)
  }

  /// Write the manifest back to where it was read from
  pub fn write(&self) -> RelkitResult<()> {
    let content = self.to_json_string()?;
    fs::write(&self.path, content).with_context(|| format!("Failed to write {}", self.path.display()))
  }
}

/// Read, modify and write back a manifest
///
/// The manifest is only written when `updater` succeeds.
pub fn update_manifest<F>(path: &Path, updater: F) -> RelkitResult<()>
where
  F: FnOnce(&mut PackageManifest) -> RelkitResult<()>,
{
  let mut manifest = PackageManifest::read(path)?;
  updater(&mut manifest)?;
  manifest.write()
}

/// package.json paths of every package directly under `root_dir`
///
/// `node_modules` and plain files are skipped; a subdirectory without a
/// package.json is an error. Paths are returned in name order.
pub fn package_manifests_in(root_dir: &Path) -> RelkitResult<Vec<PathBuf>> {
  let entries = fs::read_dir(root_dir).with_context(|| format!("Failed to list {}", root_dir.display()))?;

  let mut dirs = Vec::new();
  for entry in entries {
    let entry = entry?;
    let path = entry.path();
    if entry.file_name() == "node_modules" {
      continue;
    }
    // Like lstat: a symlinked directory is not followed
    if entry.file_type()?.is_dir() {
      dirs.push(path);
    }
  }
  dirs.sort();

  dirs
    .into_iter()
    .map(|dir| {
      let manifest = dir.join(MANIFEST_FILE);
      if manifest.is_file() {
        Ok(manifest)
      } else {
        Err(ValidationError::ManifestMissing { dir }.into())
      }
    })
    .collect()
}

/// Whether the package in `dir` declares a `test` script
///
/// A directory without package.json has no tests; an unreadable or malformed
/// manifest is an error.
pub fn has_test(dir: &Path) -> RelkitResult<bool> {
  let path = dir.join(MANIFEST_FILE);
  if !path.exists() {
    return Ok(false);
  }
  Ok(PackageManifest::read(&path)?.has_script("test"))
}
