//! Integration tests for `relkit bump-dependencies`

use crate::helpers::{TestRepo, assert_success, stderr, stdout};
use anyhow::Result;

const NCU_ARGS: &str =
  "-u --dep dev,prod --reject vue,@vue/server-renderer,@vue/compiler-sfc,@vitejs/plugin-vue,vite-plugin-md,jest,ts-node,@types/node";

#[test]
fn test_only_tested_packages_are_updated() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["bump-dependencies"])?;
  assert_success(&output)?;

  let mut calls = repo.tool_calls()?;
  calls.sort();
  assert_eq!(
    calls,
    vec![
      format!("ncu|/boilerplates/boilerplate-vue|{NCU_ARGS}"),
      format!("ncu|/examples/basic|{NCU_ARGS}"),
      format!("ncu|/src|{NCU_ARGS}"),
    ]
  );

  let out = stdout(&output);
  assert!(out.contains("SKIP_LIST: [\"vue\",\"@vue/server-renderer\""), "{out}");
  Ok(())
}

#[test]
fn test_custom_skip_list() -> Result<()> {
  let repo = TestRepo::new()?;
  let config = repo.read("relkit.toml")?;
  repo.write("relkit.toml", &format!("{config}\n[dependencies]\nskip = []\n"))?;

  let output = repo.relkit(&["bump-dependencies"])?;
  assert_success(&output)?;

  let calls = repo.tool_calls()?;
  assert!(calls.contains(&"ncu|/src|-u --dep dev,prod".to_string()), "{calls:#?}");
  assert!(stdout(&output).contains("SKIP_LIST: []"));
  Ok(())
}

#[test]
fn test_untracked_packages_are_ignored() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("examples/draft/package.json", r#"{"scripts":{"test":"vitest"}}"#)?;

  let output = repo.relkit(&["bump-dependencies"])?;
  assert_success(&output)?;
  assert!(!repo.tool_calls()?.iter().any(|c| c.contains("/examples/draft")));
  Ok(())
}

#[test]
fn test_malformed_manifest_stops_the_bump() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("examples/no-tests/package.json", r#"{"dependencies":{"vite-plugin-ssr":"0.4.2"},}"#)?;
  repo.commit("chore: break manifest")?;

  let output = repo.relkit(&["bump-dependencies"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("examples/no-tests/package.json"), "{err}");
  assert!(!repo.tool_calls()?.iter().any(|c| c.starts_with("ncu|/src|")));
  Ok(())
}
