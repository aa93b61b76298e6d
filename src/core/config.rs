use crate::core::error::{ConfigError, RelkitError, RelkitResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for relkit
/// Searched in order: relkit.toml, .relkit.toml, .config/relkit.toml
///
/// Every section is optional; a repository without any config file gets the
/// defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelkitConfig {
  pub layout: LayoutConfig,
  pub release: ReleaseConfig,
  pub dependencies: DependenciesConfig,
  pub tools: ToolsConfig,
}

/// Where the packages of the repository live (relative to the root)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
  /// Directory of the published package
  pub package_dir: PathBuf,

  /// Directory holding the boilerplate packages (itself a published package)
  pub boilerplates_dir: PathBuf,

  /// Directory holding the example packages
  pub examples_dir: PathBuf,

  /// Source files embedding the version constant
  pub version_files: Vec<PathBuf>,

  /// Name of the embedded version constant
  /// (default: derived from the package name, e.g. `VITE_PLUGIN_SSR_VERSION`)
  pub version_constant: Option<String>,
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      package_dir: PathBuf::from("src"),
      boilerplates_dir: PathBuf::from("boilerplates"),
      examples_dir: PathBuf::from("examples"),
      version_files: Vec::new(),
      version_constant: None,
    }
  }
}

/// How changelog entries are produced during a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangelogGenerator {
  /// `npx conventional-changelog -p angular`
  #[default]
  ConventionalChangelog,
  /// Built-in generator over conventional commits since the last tag
  Native,
}

/// Release orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  pub tag_prefix: String,
  /// Old and new versions must both start with this
  pub version_prefix: String,
  /// The boilerplates package version must start with this
  pub boilerplate_version_prefix: String,
  /// Boilerplate directories with this prefix depend on a caret range (`^x.y.z`)
  pub caret_prefix: String,
  pub build_script: String,
  pub post_release_script: String,
  pub changelog_file: PathBuf,
  pub changelog: ChangelogGenerator,
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      tag_prefix: "v".to_string(),
      version_prefix: "0.".to_string(),
      boilerplate_version_prefix: "0.0.".to_string(),
      caret_prefix: "boilerplate-".to_string(),
      build_script: "build".to_string(),
      post_release_script: "release:test-post-release".to_string(),
      changelog_file: PathBuf::from("CHANGELOG.md"),
      changelog: ChangelogGenerator::default(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DependenciesConfig {
  /// Packages `ncu` must never upgrade
  pub skip: Vec<String>,
}

impl Default for DependenciesConfig {
  fn default() -> Self {
    Self {
      skip: [
        "vue",
        "@vue/server-renderer",
        "@vue/compiler-sfc",
        "@vitejs/plugin-vue",
        "vite-plugin-md",
        "jest",
        "ts-node",
        "@types/node",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
    }
  }
}

/// External tool locations
///
/// A value containing a path separator is resolved against the repository
/// root; anything else is looked up on PATH.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
  pub npm: String,
  pub npx: String,
  pub yarn: String,
  pub ncu: String,
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      npm: "npm".to_string(),
      npx: "npx".to_string(),
      yarn: "yarn".to_string(),
      ncu: "node_modules/.bin/ncu".to_string(),
    }
  }
}

impl ToolsConfig {
  /// Resolve a configured tool to the program to execute
  pub fn resolve(root: &Path, tool: &str) -> PathBuf {
    if tool.contains('/') || tool.contains('\\') {
      root.join(tool)
    } else {
      PathBuf::from(tool)
    }
  }
}

impl RelkitConfig {
  /// Find config file in search order: relkit.toml, .relkit.toml, .config/relkit.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("relkit.toml"),
      path.join(".relkit.toml"),
      path.join(".config").join("relkit.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> RelkitResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      log::debug!("no relkit.toml under {}, using defaults", path.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> RelkitResult<Self> {
    let config: RelkitConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> RelkitResult<()> {
    let non_empty = [
      ("release.tag_prefix", &self.release.tag_prefix),
      ("release.version_prefix", &self.release.version_prefix),
      ("release.boilerplate_version_prefix", &self.release.boilerplate_version_prefix),
      ("release.build_script", &self.release.build_script),
      ("release.post_release_script", &self.release.post_release_script),
    ];
    for (field, value) in non_empty {
      if value.is_empty() {
        return Err(RelkitError::Config(ConfigError::InvalidField {
          field: field.to_string(),
          reason: "must not be empty".to_string(),
        }));
      }
    }

    if self.release.changelog_file.as_os_str().is_empty() {
      return Err(RelkitError::Config(ConfigError::InvalidField {
        field: "release.changelog_file".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    if let Some(name) = &self.layout.version_constant
      && !is_identifier(name)
    {
      return Err(RelkitError::Config(ConfigError::InvalidField {
        field: "layout.version_constant".to_string(),
        reason: format!("'{}' is not a valid identifier", name),
      }));
    }

    Ok(())
  }
}

/// Derive the version constant name from an npm package name
///
/// `vite-plugin-ssr` becomes `VITE_PLUGIN_SSR_VERSION`; a scope is dropped.
pub fn default_version_constant(npm_name: &str) -> String {
  let bare = npm_name.rsplit('/').next().unwrap_or(npm_name);
  let mut name: String = bare
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
    .collect();
  name.push_str("_VERSION");
  name
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
