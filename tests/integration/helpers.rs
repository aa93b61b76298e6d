//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const PACKAGE: &str = "vite-plugin-ssr";

/// Fake `npm`, `npx`, `yarn` and `ncu` that log their invocations
///
/// Each line of the log is `tool|cwd|args`.
const SHIM: &str = r#"#!/bin/sh
echo "@NAME@|$(pwd)|$*" >> "$RELKIT_TOOL_LOG"
if [ "@NAME@" = "npm" ] && [ "$1" = "install" ]; then
  echo '{"lockfileVersion": 3}' > package-lock.json
fi
if [ "@NAME@" = "yarn" ] && [ "$1" = "install" ]; then
  echo '# yarn lockfile v1' > yarn.lock
fi
exit 0
"#;

/// A multi-package npm repository with a bare `origin` remote
pub struct TestRepo {
  _root: TempDir,
  _origin: TempDir,
  _tools: TempDir,
  pub path: PathBuf,
  pub origin: PathBuf,
  pub tool_log: PathBuf,
}

impl TestRepo {
  /// Create the repository with a published package at 0.4.2
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let origin = TempDir::new()?;
    let tools = TempDir::new()?;
    let path = root.path().canonicalize()?;
    let origin_path = origin.path().canonicalize()?;
    let tools_path = tools.path().canonicalize()?;

    let tool_log = tools_path.join("tools.log");
    for tool in ["npm", "npx", "yarn", "ncu"] {
      write_shim(&tools_path, tool)?;
    }

    git(&origin_path, &["init", "--bare", "--initial-branch=main"])?;
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "tag.gpgsign", "false"])?;

    let repo = Self {
      _root: root,
      _origin: origin,
      _tools: tools,
      path,
      origin: origin_path,
      tool_log,
    };

    repo.write(
      "relkit.toml",
      &format!(
        r#"[layout]
version_files = ["src/utils/projectInfo.ts"]

[release]
changelog = "native"

[tools]
npm = "{tools}/npm"
npx = "{tools}/npx"
yarn = "{tools}/yarn"
ncu = "{tools}/ncu"
"#,
        tools = tools_path.display()
      ),
    )?;
    repo.write(".gitignore", "node_modules/\n")?;
    repo.write("package.json", r#"{"name":"root","private":true,"scripts":{"build":"tsc"}}"#)?;
    repo.write(
      "src/package.json",
      &format!(r#"{{"name":"{PACKAGE}","version":"0.4.2","scripts":{{"test":"vitest"}}}}"#),
    )?;
    repo.write(
      "src/utils/projectInfo.ts",
      "export const projectInfo = { projectVersion }\nconst VITE_PLUGIN_SSR_VERSION = '0.4.2'\n",
    )?;
    repo.write("boilerplates/package.json", r#"{"name":"create-vite-plugin-ssr","version":"0.0.7"}"#)?;
    repo.write(
      "boilerplates/boilerplate-vue/package.json",
      &format!(r#"{{"scripts":{{"test":"vitest"}},"dependencies":{{"{PACKAGE}":"^0.4.2"}}}}"#),
    )?;
    repo.write(
      "examples/basic/package.json",
      &format!(r#"{{"scripts":{{"test":"vitest"}},"dependencies":{{"{PACKAGE}":"0.4.2"}}}}"#),
    )?;
    repo.write(
      "examples/no-tests/package.json",
      &format!(r#"{{"dependencies":{{"{PACKAGE}":"0.4.2"}}}}"#),
    )?;

    repo.commit("chore: initial setup")?;
    git(&repo.path, &["remote", "add", "origin", &repo.origin.to_string_lossy()])?;
    git(&repo.path, &["push", "-u", "origin", "main"])?;

    Ok(repo)
  }

  /// Write a file relative to the repository root
  pub fn write(&self, rel: &str, content: &str) -> Result<()> {
    let path = self.path.join(rel);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
  }

  /// Read a file relative to the repository root
  pub fn read(&self, rel: &str) -> Result<String> {
    Ok(fs::read_to_string(self.path.join(rel))?)
  }

  pub fn file_exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  /// Stage everything and commit
  pub fn commit(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Subject of the HEAD commit
  pub fn head_subject(&self) -> Result<String> {
    let output = git(&self.path, &["log", "-1", "--format=%s"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect())
  }

  pub fn tracked_files(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["ls-files"])?;
    Ok(String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect())
  }

  /// Logged tool invocations as `tool|cwd|args` lines, cwd made root-relative
  pub fn tool_calls(&self) -> Result<Vec<String>> {
    if !self.tool_log.exists() {
      return Ok(Vec::new());
    }
    let root = self.path.to_string_lossy().into_owned();
    Ok(
      fs::read_to_string(&self.tool_log)?
        .lines()
        .map(|line| line.replacen(&root, "", 1))
        .collect(),
    )
  }

  /// Run relkit inside the repository
  pub fn relkit(&self, args: &[&str]) -> Result<Output> {
    self.relkit_with_env(args, &[])
  }

  /// Run relkit inside the repository with extra environment variables
  pub fn relkit_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
    let mut all: Vec<(&str, &OsStr)> = vec![("RELKIT_TOOL_LOG", self.tool_log.as_os_str())];
    all.extend(envs.iter().map(|(key, value)| (*key, OsStr::new(value))));
    run_relkit(&self.path, args, &all)
  }
}

fn write_shim(dir: &Path, tool: &str) -> Result<()> {
  let path = dir.join(tool);
  fs::write(&path, SHIM.replace("@NAME@", tool))?;
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
  }
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the relkit binary; the exit status is left to the caller
pub fn run_relkit(cwd: &Path, args: &[&str], envs: &[(&str, &OsStr)]) -> Result<Output> {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_relkit"));
  cmd.current_dir(cwd).args(args).env_remove("RUST_LOG");
  for (key, value) in envs {
    cmd.env(key, value);
  }
  cmd.output().context("Failed to run relkit")
}

/// Fail with both output streams unless the command succeeded
pub fn assert_success(output: &Output) -> Result<()> {
  if !output.status.success() {
    anyhow::bail!(
      "relkit failed with {:?}\nstdout: {}\nstderr: {}",
      output.status.code(),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(())
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
