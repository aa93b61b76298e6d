//! System git backend
//!
//! Every operation is one `git` subprocess with an isolated environment.
//! Commands whose output the user should see (commit, push) stream to the
//! terminal; everything else is captured and parsed.

use super::CommitInfo;
use crate::core::error::{CommandError, RelkitError, RelkitResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Field separator for `git log` output (ASCII unit separator)
const FIELD_SEP: char = '\u{1f}';
/// Record separator for `git log` output (ASCII record separator)
const RECORD_SEP: char = '\u{1e}';

/// Environment variables passed through to git
const ENV_WHITELIST: &[&str] = &["PATH", "HOME", "XDG_CONFIG_HOME", "SSH_AUTH_SOCK", "GNUPGHOME", "GPG_TTY"];

/// Prefixes of git variables passed through: identity, config and ssh setup
const ENV_PREFIX_WHITELIST: &[&str] = &["GIT_AUTHOR_", "GIT_COMMITTER_", "GIT_CONFIG_", "GIT_SSH"];

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  pub fn open(path: &Path) -> RelkitResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|e| {
        RelkitError::Command(CommandError::Spawn {
          command: "git rev-parse --show-toplevel".to_string(),
          reason: e.to_string(),
        })
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RelkitError::with_help(
        format!("{} is not inside a git repository: {}", path.display(), stderr.trim()),
        "Run relkit from the repository root or pass --root.",
      ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Self {
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  /// Repository work tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> RelkitResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// All tracked files, relative to the work tree
  pub fn ls_files(&self) -> RelkitResult<Vec<String>> {
    let stdout = self.run(&["ls-files"])?;
    Ok(stdout.lines().filter(|l| !l.is_empty()).map(String::from).collect())
  }

  /// Whether tracked files have uncommitted modifications
  pub fn has_tracked_changes(&self) -> RelkitResult<bool> {
    let stdout = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(!stdout.trim().is_empty())
  }

  /// Stage a path
  pub fn add(&self, path: &Path) -> RelkitResult<()> {
    let path = path.to_string_lossy();
    self.run(&["add", "--", path.as_ref()]).map(|_| ())
  }

  /// Commit every tracked modification (`git commit -am`)
  pub fn commit_all(&self, message: &str) -> RelkitResult<()> {
    self.follow(&["commit", "-am", message])
  }

  /// Create a lightweight tag at HEAD
  pub fn tag(&self, name: &str) -> RelkitResult<()> {
    self.follow(&["tag", name])
  }

  /// Push the current branch
  pub fn push(&self) -> RelkitResult<()> {
    self.follow(&["push"])
  }

  /// Push all tags
  pub fn push_tags(&self) -> RelkitResult<()> {
    self.follow(&["push", "--tags"])
  }

  /// Remove every ignored file (`git clean -Xdf`), e.g. all `node_modules`
  pub fn clean_ignored(&self) -> RelkitResult<()> {
    self.run(&["clean", "-Xdf"]).map(|_| ())
  }

  /// Remove tracked files from the index and the work tree
  pub fn remove_files(&self, paths: &[PathBuf]) -> RelkitResult<()> {
    if paths.is_empty() {
      return Ok(());
    }
    let mut args: Vec<String> = vec!["rm".to_string(), "-f".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    self.run(&args).map(|_| ())
  }

  /// Most recent tag reachable from HEAD that starts with `prefix`
  pub fn last_tag(&self, prefix: &str) -> RelkitResult<Option<String>> {
    let pattern = format!("{}*", prefix);
    let output = self
      .git_cmd()
      .args(["describe", "--tags", "--abbrev=0", "--match", &pattern])
      .output()
      .context("Failed to execute git describe")?;

    if !output.status.success() {
      // No matching tag yet
      return Ok(None);
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if tag.is_empty() { None } else { Some(tag) })
  }

  /// Commits reachable from HEAD but not from `since` (all commits when `None`)
  pub fn commits_since(&self, since: Option<&str>) -> RelkitResult<Vec<CommitInfo>> {
    let format = format!("--format=%H{}%B{}", FIELD_SEP, RECORD_SEP);
    let range = since.map(|s| format!("{}..HEAD", s));

    let mut args = vec!["log", format.as_str()];
    if let Some(range) = &range {
      args.push(range.as_str());
    }

    let stdout = self.run(&args)?;
    Ok(parse_log(&stdout))
  }

  fn run(&self, args: &[&str]) -> RelkitResult<String> {
    log::debug!("$ git {}", args.join(" "));
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(RelkitError::Command(CommandError::Failed {
        command: format!("git {}", args.join(" ")),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
  }

  fn follow(&self, args: &[&str]) -> RelkitResult<()> {
    log::debug!("$ git {}", args.join(" "));
    let status = self
      .git_cmd()
      .args(args)
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !status.success() {
      return Err(RelkitError::Command(CommandError::Failed {
        command: format!("git {}", args.join(" ")),
        status: status.code(),
        stderr: String::new(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the work tree
  /// - Clears environment variables except the user's git identity, config, ssh and gpg setup
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    cmd.envs(std::env::vars_os().filter(|(key, _)| key.to_str().is_some_and(is_passed_through)));

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

fn is_passed_through(key: &str) -> bool {
  ENV_WHITELIST.contains(&key) || ENV_PREFIX_WHITELIST.iter().any(|prefix| key.starts_with(prefix))
}

fn parse_log(stdout: &str) -> Vec<CommitInfo> {
  stdout
    .split(RECORD_SEP)
    .filter_map(|record| {
      let record = record.trim_start_matches('\n');
      if record.trim().is_empty() {
        return None;
      }
      let (sha, message) = record.split_once(FIELD_SEP)?;
      Some(CommitInfo {
        sha: sha.trim().to_string(),
        message: message.trim_end().to_string(),
      })
    })
    .collect()
}
