//! Integration tests for `relkit link`

use crate::helpers::{TestRepo, assert_success, stdout};
use anyhow::Result;

#[test]
fn test_link_default_package() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["link"])?;
  assert_success(&output)?;

  assert_eq!(
    repo.tool_calls()?,
    vec![
      "yarn|/src|link".to_string(),
      "yarn|/boilerplates/boilerplate-vue|link vite-plugin-ssr".to_string(),
      "yarn|/examples/basic|link vite-plugin-ssr".to_string(),
      "yarn|/examples/no-tests|link vite-plugin-ssr".to_string(),
    ]
  );

  let out = stdout(&output);
  assert!(out.contains("symlink: /boilerplates/boilerplate-vue/node_modules/vite-plugin-ssr"));
  assert!(out.contains("symlink: /examples/no-tests/node_modules/vite-plugin-ssr"));
  Ok(())
}

#[test]
fn test_link_named_package_only_reaches_its_dependers() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("examples/basic/package.json", r#"{"devDependencies":{"vite":"5"}}"#)?;

  let output = repo.relkit(&["link", "vite"])?;
  assert_success(&output)?;

  assert_eq!(
    repo.tool_calls()?,
    vec!["yarn|/src|link".to_string(), "yarn|/examples/basic|link vite".to_string()]
  );
  Ok(())
}
