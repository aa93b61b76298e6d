//! Integration tests for `relkit bump-lockfiles`

use crate::helpers::{TestRepo, assert_success};
use anyhow::Result;

#[test]
fn test_lockfiles_recreated_for_tested_packages() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("examples/basic/package-lock.json", "{}\n")?;
  repo.write("examples/no-tests/package-lock.json", "{}\n")?;
  repo.write("yarn.lock", "# old\n")?;
  repo.commit("chore: add lockfiles")?;
  repo.write("node_modules/vite/index.js", "")?;

  let output = repo.relkit(&["bump-lockfiles"])?;
  assert_success(&output)?;

  // Ignored files are gone
  assert!(!repo.file_exists("node_modules"));

  let tracked = repo.tracked_files()?;
  assert!(!tracked.contains(&"examples/basic/package-lock.json".to_string()));
  assert!(tracked.contains(&"examples/no-tests/package-lock.json".to_string()));

  assert_eq!(
    repo.tool_calls()?,
    vec!["npm|/examples/basic|install".to_string(), "yarn||install".to_string()]
  );
  assert_eq!(repo.read("examples/basic/package-lock.json")?, "{\"lockfileVersion\": 3}\n");
  assert_eq!(repo.read("yarn.lock")?, "# yarn lockfile v1\n");
  Ok(())
}

#[test]
fn test_no_lockfiles_still_updates_yarn_lock() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["bump-lockfiles"])?;
  assert_success(&output)?;
  assert_eq!(repo.tool_calls()?, vec!["yarn||install".to_string()]);
  Ok(())
}
