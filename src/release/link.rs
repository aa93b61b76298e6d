//! Local package links
//!
//! Registers the package with `yarn link` and links it into every
//! boilerplate and example package that depends on it.

use crate::core::context::{RepoContext, Tool};
use crate::core::error::RelkitResult;
use crate::release::manifest::{PackageManifest, package_manifests_in};
use std::path::PathBuf;

/// Boilerplate and example package directories depending on `package`
pub fn dependers(ctx: &RepoContext, package: &str) -> RelkitResult<Vec<PathBuf>> {
  let mut manifests = Vec::new();
  for dir in [ctx.boilerplates_dir(), ctx.examples_dir()] {
    if dir.is_dir() {
      manifests.extend(package_manifests_in(&dir)?);
    }
  }

  let mut dirs = Vec::new();
  for path in manifests {
    let manifest = PackageManifest::read(&path)?;
    if manifest.depends_on(package)
      && let Some(dir) = path.parent()
    {
      dirs.push(dir.to_path_buf());
    }
  }
  Ok(dirs)
}

/// Link `package` (default: the published package) into its dependers
pub fn link(ctx: &RepoContext, package: Option<&str>) -> RelkitResult<()> {
  let package = match package {
    Some(name) => name.to_string(),
    None => ctx.npm_name()?,
  };

  ctx.tool(Tool::Yarn, &ctx.package_dir())?.arg("link").capture()?;

  for dir in dependers(ctx, &package)? {
    ctx.tool(Tool::Yarn, &dir)?.args(["link", package.as_str()]).capture()?;
    println!("symlink: {}/node_modules/{}", ctx.display_path(&dir), package);
  }

  Ok(())
}
