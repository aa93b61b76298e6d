//! Dependency bump across every tested package
//!
//! Runs `ncu -u` in each tracked package that declares a `test` script.
//! Packages on the skip list are never upgraded.

use crate::core::context::{RepoContext, Tool};
use crate::core::error::RelkitResult;
use crate::core::vcs::SystemGit;
use crate::release::manifest::{MANIFEST_FILE, has_test};
use std::path::PathBuf;

/// Directories of tracked packages, in `git ls-files` order
pub fn tracked_package_dirs(git: &SystemGit, file_name: &str) -> RelkitResult<Vec<PathBuf>> {
  let root = git.work_tree();
  let dirs = git
    .ls_files()?
    .into_iter()
    .filter(|path| path.rsplit('/').next() == Some(file_name))
    .filter_map(|path| root.join(path).parent().map(PathBuf::from))
    .collect();
  Ok(dirs)
}

/// Arguments passed to `ncu` for one package
pub fn ncu_args(skip: &[String]) -> Vec<String> {
  let mut args = vec!["-u".to_string(), "--dep".to_string(), "dev,prod".to_string()];
  if !skip.is_empty() {
    args.push("--reject".to_string());
    args.push(skip.join(","));
  }
  args
}

/// Upgrade dependencies of every tested package, returns the updated directories
pub fn bump_dependencies(ctx: &RepoContext, git: &SystemGit) -> RelkitResult<Vec<PathBuf>> {
  let skip = &ctx.config.dependencies.skip;
  let args = ncu_args(skip);

  let mut updated = Vec::new();
  for dir in tracked_package_dirs(git, MANIFEST_FILE)? {
    if !has_test(&dir)? {
      log::debug!("skipping {} (no test script)", ctx.display_path(&dir));
      continue;
    }
    log::info!("Updating dependencies of {}", ctx.display_path(&dir));
    ctx.tool(Tool::Ncu, &dir)?.args(&args).follow()?;
    updated.push(dir);
  }

  Ok(updated)
}
