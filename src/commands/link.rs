//! `relkit link`

use crate::core::context::RepoContext;
use crate::core::error::RelkitResult;
use crate::release::link::link;

pub fn run_link(ctx: &RepoContext, package: Option<String>) -> RelkitResult<()> {
  link(ctx, package.as_deref())
}
