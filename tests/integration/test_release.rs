//! Integration tests for `relkit release`

use crate::helpers::{TestRepo, assert_success, git, stderr, stdout};
use anyhow::Result;

#[test]
fn test_release_dry_run_changes_nothing() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["release", "--dry-run"])?;
  assert_success(&output)?;

  let out = stdout(&output);
  assert!(out.contains("Release v0.4.3 (0.4.2 → 0.4.3)"), "{out}");
  assert!(out.contains("git tag v0.4.3"));
  assert!(out.contains("Dry-run mode"));

  assert!(repo.read("src/package.json")?.contains("0.4.2"));
  assert!(repo.tags()?.is_empty());
  assert!(repo.tool_calls()?.is_empty());
  assert!(git(&repo.path, &["status", "--porcelain"])?.stdout.is_empty());
  Ok(())
}

#[test]
fn test_release_full_sequence() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("src/index.ts", "export const prefetch = true\n")?;
  repo.commit("feat(client): add prefetch")?;

  let output = repo.relkit(&["release"])?;
  assert_success(&output)?;

  // Versions everywhere
  assert!(repo.read("src/package.json")?.contains("\"version\": \"0.4.3\""));
  assert!(
    repo
      .read("src/utils/projectInfo.ts")?
      .contains("const VITE_PLUGIN_SSR_VERSION = '0.4.3'")
  );
  assert!(
    repo
      .read("boilerplates/boilerplate-vue/package.json")?
      .contains("\"vite-plugin-ssr\": \"^0.4.3\"")
  );
  assert!(repo.read("examples/basic/package.json")?.contains("\"vite-plugin-ssr\": \"0.4.3\""));
  assert!(repo.read("boilerplates/package.json")?.contains("\"version\": \"0.0.8\""));

  // Changelog committed with the release
  let changelog = repo.read("CHANGELOG.md")?;
  assert!(changelog.starts_with("## 0.4.3 ("), "{changelog}");
  assert!(changelog.contains("* **client:** add prefetch"));
  assert!(repo.tracked_files()?.contains(&"CHANGELOG.md".to_string()));

  // Commit, tag and push
  assert_eq!(repo.head_subject()?, "release: v0.4.3");
  assert_eq!(repo.tags()?, vec!["v0.4.3".to_string()]);
  let remote_tags = git(&repo.path, &["ls-remote", "--tags", "origin"])?;
  assert!(String::from_utf8_lossy(&remote_tags.stdout).contains("refs/tags/v0.4.3"));
  assert!(git(&repo.path, &["status", "--porcelain", "--untracked-files=no"])?.stdout.is_empty());

  // External tools, in order
  let calls = repo.tool_calls()?;
  let position = |needle: &str| {
    calls
      .iter()
      .position(|c| c == needle)
      .unwrap_or_else(|| panic!("missing call {needle} in {calls:#?}"))
  };
  let install = position("npm||install");
  let build = position("npm||run build");
  let publish = position("npm|/src|publish");
  let publish_boilerplates = position("npm|/boilerplates|publish");
  let post_release = position("npm||run release:test-post-release");
  let link = position("yarn|/src|link");
  assert!(install < build && build < publish && publish < publish_boilerplates);
  assert!(publish_boilerplates < post_release && post_release < link);
  position("yarn|/examples/basic|link vite-plugin-ssr");
  position("yarn|/boilerplates/boilerplate-vue|link vite-plugin-ssr");

  assert!(stdout(&output).contains("symlink: /examples/basic/node_modules/vite-plugin-ssr"));
  Ok(())
}

#[test]
fn test_release_explicit_version() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["release", "0.5.0", "--dry-run"])?;
  assert_success(&output)?;
  assert!(stdout(&output).contains("Release v0.5.0 (0.4.2 → 0.5.0)"));
  Ok(())
}

#[test]
fn test_release_rejects_major_version() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.relkit(&["release", "1.0.0"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("1.0.0"));
  assert!(repo.read("src/package.json")?.contains("0.4.2"));
  Ok(())
}

#[test]
fn test_release_stops_on_dependency_mismatch() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write(
    "examples/basic/package.json",
    r#"{"scripts":{"test":"vitest"},"dependencies":{"vite-plugin-ssr":"0.4.1"}}"#,
  )?;
  repo.commit("chore: pin old version")?;

  let output = repo.relkit(&["release"])?;
  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("vite-plugin-ssr"), "{err}");
  assert!(err.contains("0.4.1"), "{err}");

  // Nothing past the failing step ran
  assert!(repo.tags()?.is_empty());
  assert!(repo.tool_calls()?.is_empty());
  assert_eq!(repo.head_subject()?, "chore: pin old version");
  Ok(())
}

#[test]
fn test_release_requires_version_constant() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("src/utils/projectInfo.ts", "const VITE_PLUGIN_SSR_VERSION = \"0.4.2\"\n")?;
  repo.commit("chore: double quotes")?;

  let output = repo.relkit(&["release"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(repo.read("src/package.json")?.contains("\"version\":\"0.4.2\""));
  Ok(())
}

#[test]
fn test_release_commits_with_identity_from_environment() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["config", "--unset", "user.name"])?;
  git(&repo.path, &["config", "--unset", "user.email"])?;
  git(&repo.path, &["config", "user.useConfigOnly", "true"])?;

  let output = repo.relkit_with_env(
    &["release"],
    &[
      ("GIT_AUTHOR_NAME", "Env Author"),
      ("GIT_AUTHOR_EMAIL", "author@example.com"),
      ("GIT_COMMITTER_NAME", "Env Committer"),
      ("GIT_COMMITTER_EMAIL", "committer@example.com"),
    ],
  )?;
  assert_success(&output)?;

  let author = git(&repo.path, &["log", "-1", "--format=%an <%ae>"])?;
  assert_eq!(String::from_utf8_lossy(&author.stdout).trim(), "Env Author <author@example.com>");
  assert_eq!(repo.head_subject()?, "release: v0.4.3");
  Ok(())
}
