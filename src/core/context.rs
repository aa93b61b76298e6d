//! Repository context - build once, pass everywhere
//!
//! `RepoContext` resolves the repository root and loads `relkit.toml` once in
//! main.rs; commands receive it by reference and derive absolute paths and
//! tool locations from it.

use crate::core::config::{RelkitConfig, ToolsConfig, default_version_constant};
use crate::core::error::{ConfigError, RelkitError, RelkitResult, ResultExt};
use crate::core::process::ToolCommand;
use crate::core::vcs::SystemGit;
use crate::release::manifest::PackageManifest;
use std::path::{Path, PathBuf};

/// External tools relkit drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
  Npm,
  Npx,
  Yarn,
  Ncu,
}

/// Shared repository-level state
#[derive(Debug, Clone)]
pub struct RepoContext {
  /// Repository root directory (absolute path)
  pub root: PathBuf,

  /// Loaded configuration (defaults when no file exists)
  pub config: RelkitConfig,
}

impl RepoContext {
  /// Build the context for `root`
  pub fn build(root: &Path) -> RelkitResult<Self> {
    let root = root
      .canonicalize()
      .with_context(|| format!("Failed to resolve repository root {}", root.display()))?;
    let config = RelkitConfig::load(&root)?;
    Ok(Self { root, config })
  }

  /// Build a context from an already-loaded config
  #[cfg(test)]
  pub fn with_config(root: &Path, config: RelkitConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config,
    }
  }

  /// Open the git repository at the root
  pub fn git(&self) -> RelkitResult<SystemGit> {
    SystemGit::open(&self.root)
  }

  /// Absolute directory of the published package
  pub fn package_dir(&self) -> PathBuf {
    self.root.join(&self.config.layout.package_dir)
  }

  /// Absolute directory of the boilerplates package
  pub fn boilerplates_dir(&self) -> PathBuf {
    self.root.join(&self.config.layout.boilerplates_dir)
  }

  /// Absolute directory of the example packages
  pub fn examples_dir(&self) -> PathBuf {
    self.root.join(&self.config.layout.examples_dir)
  }

  /// npm name of the published package
  pub fn npm_name(&self) -> RelkitResult<String> {
    let manifest = PackageManifest::read_dir(&self.package_dir())?;
    manifest
      .name()
      .filter(|name| !name.is_empty())
      .map(String::from)
      .ok_or_else(|| {
        RelkitError::Config(ConfigError::MissingPackageName {
          manifest: manifest.path().to_path_buf(),
        })
      })
  }

  /// Name of the embedded version constant
  pub fn version_constant(&self) -> RelkitResult<String> {
    match &self.config.layout.version_constant {
      Some(name) => Ok(name.clone()),
      None => Ok(default_version_constant(&self.npm_name()?)),
    }
  }

  /// Start a command for `tool` running in `cwd`
  pub fn tool(&self, tool: Tool, cwd: &Path) -> RelkitResult<ToolCommand> {
    let tools = &self.config.tools;
    let configured = match tool {
      Tool::Npm => &tools.npm,
      Tool::Npx => &tools.npx,
      Tool::Yarn => &tools.yarn,
      Tool::Ncu => &tools.ncu,
    };
    ToolCommand::new(ToolsConfig::resolve(&self.root, configured), cwd)
  }

  /// Root-relative display form of a path (`/examples/basic`)
  pub fn display_path(&self, path: &Path) -> String {
    match path.strip_prefix(&self.root) {
      Ok(rel) => format!("/{}", rel.to_string_lossy().replace('\\', "/")),
      Err(_) => path.display().to_string(),
    }
  }
}
