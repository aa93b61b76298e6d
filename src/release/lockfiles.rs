//! Lockfile regeneration
//!
//! Starts from a clean checkout (`git clean -Xdf`), deletes every tracked
//! `package-lock.json` of a tested package, reinstalls each one with npm and
//! finally recreates the root `yarn.lock`.

use crate::core::context::{RepoContext, Tool};
use crate::core::error::{RelkitResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::release::deps::tracked_package_dirs;
use crate::release::manifest::has_test;
use crate::ui::progress::PackageProgress;
use std::fs;
use std::path::PathBuf;

pub const PACKAGE_LOCK: &str = "package-lock.json";
pub const YARN_LOCK: &str = "yarn.lock";

/// Tracked package-lock.json files whose package declares a `test` script
pub fn package_lockfiles(git: &SystemGit) -> RelkitResult<Vec<PathBuf>> {
  let mut lockfiles = Vec::new();
  for dir in tracked_package_dirs(git, PACKAGE_LOCK)? {
    if has_test(&dir)? {
      lockfiles.push(dir.join(PACKAGE_LOCK));
    }
  }
  Ok(lockfiles)
}

/// Regenerate all lockfiles, returns the recreated package-lock.json paths
pub fn bump_lockfiles(ctx: &RepoContext, git: &SystemGit) -> RelkitResult<Vec<PathBuf>> {
  git.clean_ignored()?;

  let lockfiles = package_lockfiles(git)?;
  if !lockfiles.is_empty() {
    git.remove_files(&lockfiles)?;
    println!("🗑️  Removed {} package-lock.json file(s)", lockfiles.len());
  }

  let mut progress = PackageProgress::new(lockfiles.len(), "npm install");
  for lockfile in &lockfiles {
    let Some(dir) = lockfile.parent() else {
      continue;
    };
    log::info!("Installing dependencies for: {}", ctx.display_path(dir));
    ctx.tool(Tool::Npm, dir)?.arg("install").capture()?;
    progress.inc();
  }

  update_yarn_lock(ctx)?;
  Ok(lockfiles)
}

fn update_yarn_lock(ctx: &RepoContext) -> RelkitResult<()> {
  let yarn_lock = ctx.root.join(YARN_LOCK);
  if yarn_lock.exists() {
    fs::remove_file(&yarn_lock).with_context(|| format!("Failed to remove {}", yarn_lock.display()))?;
  } else {
    log::debug!("no {} to remove", YARN_LOCK);
  }
  ctx.tool(Tool::Yarn, &ctx.root)?.arg("install").capture()?;
  Ok(())
}
