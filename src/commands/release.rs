//! `relkit release`

use crate::core::context::RepoContext;
use crate::core::error::RelkitResult;
use crate::release::{Release, ReleaseStep};

/// Run the release, or print its plan with `dry_run`
pub fn run_release(ctx: &RepoContext, version: Option<String>, dry_run: bool) -> RelkitResult<()> {
  let release = Release::prepare(ctx, version.as_deref())?;
  let plan = release.plan();

  println!("📦 Release {} ({} → {})", release.tag(), plan.old, plan.new);
  println!();
  for (index, step) in ReleaseStep::SEQUENCE.iter().enumerate() {
    println!("  {:>2}. {}", index + 1, release.describe(*step));
  }
  println!();

  if dry_run {
    println!("🔍 Dry-run mode (no changes applied)");
    return Ok(());
  }

  let git = ctx.git()?;
  release.run(&git)?;

  let head = git.head_commit()?;
  println!("✅ Released {} ({})", release.tag(), &head[..head.len().min(7)]);
  Ok(())
}
