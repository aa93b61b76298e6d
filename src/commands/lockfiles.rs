//! `relkit bump-lockfiles`

use crate::core::context::RepoContext;
use crate::core::error::RelkitResult;
use crate::release::lockfiles::bump_lockfiles;

pub fn run_bump_lockfiles(ctx: &RepoContext) -> RelkitResult<()> {
  let git = ctx.git()?;
  let lockfiles = bump_lockfiles(ctx, &git)?;

  for lockfile in &lockfiles {
    println!("  {}", ctx.display_path(lockfile));
  }
  println!("✅ Recreated {} package-lock.json file(s) and yarn.lock", lockfiles.len());
  Ok(())
}
