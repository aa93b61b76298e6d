//! `relkit bump-dependencies`

use crate::core::context::RepoContext;
use crate::core::error::RelkitResult;
use crate::release::deps::bump_dependencies;

pub fn run_bump_dependencies(ctx: &RepoContext) -> RelkitResult<()> {
  let git = ctx.git()?;
  let updated = bump_dependencies(ctx, &git)?;

  println!("✅ Updated dependencies of {} package(s)", updated.len());
  println!("SKIP_LIST: {}", serde_json::to_string(&ctx.config.dependencies.skip)?);
  Ok(())
}
