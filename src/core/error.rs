//! Error types for relkit with contextual messages and exit codes
//!
//! Every failure is fail-fast: a violated precondition becomes a
//! [`ValidationError`], a failing external tool becomes a [`CommandError`],
//! and both unwind the whole operation up to `main`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for relkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (external tools, I/O)
  System = 2,
  /// Validation failure (assertion on versions, manifests, headings)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for relkit
#[derive(Debug)]
pub enum RelkitError {
  /// Configuration errors
  Config(ConfigError),

  /// External command errors
  Command(CommandError),

  /// Failed assertions on repository state or input data
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// A typed error with context added on the way up
  Context { error: Box<RelkitError>, context: String },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RelkitError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RelkitError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RelkitError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are folded into a message. Typed errors keep their variant
  /// (and so their exit code and help) and carry the context alongside.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RelkitError::Message { message, context, help } => RelkitError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RelkitError::Io(e) => RelkitError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      RelkitError::Context { error, context } => RelkitError::Context {
        error,
        context: format!("{}\n{}", ctx_str, context),
      },
      error => RelkitError::Context {
        error: Box::new(error),
        context: ctx_str,
      },
    }
  }


  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RelkitError::Config(_) => ExitCode::User,
      RelkitError::Command(_) => ExitCode::System,
      RelkitError::Validation(_) => ExitCode::Validation,
      RelkitError::Io(_) => ExitCode::System,
      RelkitError::Context { error, .. } => error.exit_code(),
      RelkitError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RelkitError::Config(e) => e.help_message(),
      RelkitError::Command(e) => e.help_message(),
      RelkitError::Validation(e) => e.help_message(),
      RelkitError::Context { error, .. } => error.help_message(),
      RelkitError::Message { help, .. } => help.clone(),
      RelkitError::Io(_) => None,
    }
  }
}

impl fmt::Display for RelkitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RelkitError::Config(e) => write!(f, "{}", e),
      RelkitError::Command(e) => write!(f, "{}", e),
      RelkitError::Validation(e) => write!(f, "{}", e),
      RelkitError::Io(e) => write!(f, "I/O error: {}", e),
      RelkitError::Context { error, context } => write!(f, "{}\n{}", error, context),
      RelkitError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RelkitError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RelkitError::Io(e) => Some(e),
      RelkitError::Context { error, .. } => Some(error.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for RelkitError {
  fn from(err: io::Error) -> Self {
    RelkitError::Io(err)
  }
}

impl From<String> for RelkitError {
  fn from(msg: String) -> Self {
    RelkitError::message(msg)
  }
}

impl From<&str> for RelkitError {
  fn from(msg: &str) -> Self {
    RelkitError::message(msg)
  }
}

impl From<toml_edit::de::Error> for RelkitError {
  fn from(err: toml_edit::de::Error) -> Self {
    RelkitError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RelkitError {
  fn from(err: serde_json::Error) -> Self {
    RelkitError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for RelkitError {
  fn from(err: semver::Error) -> Self {
    RelkitError::message(format!("Invalid semantic version: {}", err))
  }
}

impl From<ValidationError> for RelkitError {
  fn from(err: ValidationError) -> Self {
    RelkitError::Validation(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value relkit cannot work with
  InvalidField { field: String, reason: String },

  /// The main package manifest has no usable `name`
  MissingPackageName { manifest: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in relkit.toml or remove it to use the default.", field)),
      ConfigError::MissingPackageName { .. } => {
        Some("Set `layout.package_dir` in relkit.toml to the directory of the published package.".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid configuration value for `{}`: {}", field, reason)
      }
      ConfigError::MissingPackageName { manifest } => {
        write!(f, "No package name found in {}", manifest.display())
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// The program could not be started at all
  Spawn { command: String, reason: String },

  /// The program ran and exited unsuccessfully
  Failed {
    command: String,
    status: Option<i32>,
    stderr: String,
  },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::Spawn { command, .. } => {
        let program = command.split_whitespace().next().unwrap_or(command);
        Some(format!(
          "Make sure `{}` is installed and on PATH, or point to it under [tools] in relkit.toml.",
          program
        ))
      }
      CommandError::Failed { stderr, .. } => {
        if stderr.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first, then rerun.".to_string())
        } else {
          Some("Fix the failing step manually, then rerun the command.".to_string())
        }
      }
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::Spawn { command, reason } => {
        write!(f, "Failed to run `{}`: {}", command, reason)
      }
      CommandError::Failed {
        command,
        status,
        stderr,
      } => {
        match status {
          Some(code) => write!(f, "Command `{}` exited with status {}", command, code)?,
          None => write!(f, "Command `{}` was terminated by a signal", command)?,
        }
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Assertion failures on versions, manifests and heading data
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
  /// A package manifest has no version
  MissingVersion { manifest: PathBuf },

  /// A version does not start with the required prefix
  VersionPrefix {
    version: String,
    expected_prefix: String,
  },

  /// A version string could not be split into the expected parts
  MalformedVersion { version: String },

  /// A dependent package pins the main package at an unexpected version
  DependencyMismatch {
    manifest: PathBuf,
    dependency: String,
    expected: String,
    found: Option<String>,
  },

  /// The embedded version constant was not found in a file
  VersionConstantMissing { file: PathBuf, snippet: String },

  /// Replacing the version constant left a file unchanged
  VersionConstantUnchanged { file: PathBuf },

  /// A release tag does not start with the required prefix
  TagPrefix { tag: String, expected_prefix: String },

  /// A package directory has no package.json
  ManifestMissing { dir: PathBuf },

  /// The frame has no heading list
  HeadingsMissing,

  /// A heading definition violates its level's shape
  InvalidHeading { index: usize, reason: String },

  /// Two headings share a non-empty url
  DuplicateUrl { url: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::VersionPrefix { .. } => {
        Some("Only pre-1.0 releases are supported; pass an explicit version or adjust `release.version_prefix`.".to_string())
      }
      ValidationError::DependencyMismatch { .. } => {
        Some("Align the dependent's version with the current release before releasing again.".to_string())
      }
      ValidationError::VersionConstantMissing { .. } => {
        Some("Check `layout.version_files` and `layout.version_constant` in relkit.toml.".to_string())
      }
      ValidationError::DuplicateUrl { .. } => Some("Every heading url must be unique.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::MissingVersion { manifest } => {
        write!(f, "No version found in {}", manifest.display())
      }
      ValidationError::VersionPrefix {
        version,
        expected_prefix,
      } => {
        write!(f, "Version '{}' does not start with '{}'", version, expected_prefix)
      }
      ValidationError::MalformedVersion { version } => {
        write!(f, "Malformed version '{}'", version)
      }
      ValidationError::DependencyMismatch {
        manifest,
        dependency,
        expected,
        found,
      } => match found {
        Some(found) => write!(
          f,
          "{} depends on {}@{}, expected {}",
          manifest.display(),
          dependency,
          found,
          expected
        ),
        None => write!(f, "{} does not depend on {}", manifest.display(), dependency),
      },
      ValidationError::VersionConstantMissing { file, snippet } => {
        write!(f, "Expected `{}` in {}", snippet, file.display())
      }
      ValidationError::VersionConstantUnchanged { file } => {
        write!(f, "Version constant in {} did not change", file.display())
      }
      ValidationError::TagPrefix { tag, expected_prefix } => {
        write!(f, "Tag '{}' does not start with '{}'", tag, expected_prefix)
      }
      ValidationError::ManifestMissing { dir } => {
        write!(f, "No package.json in {}", dir.display())
      }
      ValidationError::HeadingsMissing => write!(f, "The frame does not define any headings"),
      ValidationError::InvalidHeading { index, reason } => {
        write!(f, "Heading #{} is invalid: {}", index, reason)
      }
      ValidationError::DuplicateUrl { url } => write!(f, "Duplicate heading url: {}", url),
    }
  }
}

/// Result type alias for relkit
pub type RelkitResult<T> = Result<T, RelkitError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RelkitResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RelkitResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RelkitError>,
{
  fn context(self, ctx: impl Into<String>) -> RelkitResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RelkitResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RelkitError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
