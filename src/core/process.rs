//! External tool invocation
//!
//! Two modes, matching how the release scripts use their tools:
//! - [`ToolCommand::follow`] streams the tool's output to the terminal
//! - [`ToolCommand::capture`] returns stdout for further processing
//!
//! Both wait for the process to exit and turn a non-zero status into a
//! [`CommandError`]. There are no timeouts and no retries.

use crate::core::error::{CommandError, RelkitError, RelkitResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single external command, built up before running
#[derive(Debug, Clone)]
pub struct ToolCommand {
  program: PathBuf,
  args: Vec<OsString>,
  cwd: PathBuf,
}

impl ToolCommand {
  /// Create a command running `program` inside `cwd`
  ///
  /// `cwd` must be absolute so no step ever depends on the caller's directory.
  pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> RelkitResult<Self> {
    if !cwd.is_absolute() {
      return Err(RelkitError::message(format!(
        "Refusing to run a command in relative directory {}",
        cwd.display()
      )));
    }
    Ok(Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.to_path_buf(),
    })
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Printable form used in logs and errors
  pub fn display(&self) -> String {
    let mut parts = vec![self.program.to_string_lossy().into_owned()];
    parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
  }

  fn build(&self) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.args(&self.args).current_dir(&self.cwd);
    cmd
  }

  /// Run with inherited stdio, failing on a non-zero exit
  pub fn follow(&self) -> RelkitResult<()> {
    log::debug!("$ {} (in {})", self.display(), self.cwd.display());

    let status = self
      .build()
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| self.spawn_error(e))?;

    if !status.success() {
      return Err(RelkitError::Command(CommandError::Failed {
        command: self.display(),
        status: status.code(),
        stderr: String::new(),
      }));
    }

    Ok(())
  }

  /// Run silently and return trimmed stdout, failing on a non-zero exit
  pub fn capture(&self) -> RelkitResult<String> {
    log::debug!("$ {} (in {}, captured)", self.display(), self.cwd.display());

    let output = self.build().output().map_err(|e| self.spawn_error(e))?;

    if !output.status.success() {
      return Err(RelkitError::Command(CommandError::Failed {
        command: self.display(),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
  }

  fn spawn_error(&self, err: std::io::Error) -> RelkitError {
    RelkitError::Command(CommandError::Spawn {
      command: self.display(),
      reason: err.to_string(),
    })
  }
}
