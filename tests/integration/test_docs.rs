//! Integration tests for `relkit docs`

use crate::helpers::{assert_success, run_relkit, stderr, stdout};
use anyhow::Result;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const FRAME: &str = r#"{
  "headings": [
    { "level": 1, "title": "Overview", "titleEmoji": "compass" },
    { "level": 2, "title": "Introduction", "url": "/" },
    { "level": 2, "title": "Use `renderPage()`", "url": "/render-page", "isListTitle": true },
    { "level": 3, "title": "Details", "url": "/render-page#details", "titleInNav": "" },
    { "level": 4, "title": "Integrations" }
  ]
}"#;

fn frame_dir(content: &str, name: &str) -> Result<TempDir> {
  let dir = TempDir::new()?;
  fs::write(dir.path().join(name), content)?;
  Ok(dir)
}

#[test]
fn test_headings_json() -> Result<()> {
  let dir = frame_dir(FRAME, "frame.json")?;

  let output = run_relkit(dir.path(), &["docs", "headings", "frame.json"], &[])?;
  assert_success(&output)?;

  let headings: Value = serde_json::from_str(&stdout(&output))?;
  let headings = headings.as_array().expect("array");
  assert_eq!(headings.len(), 5);

  assert_eq!(headings[0]["titleEmoji"], "compass");
  assert_eq!(headings[0]["titleInNav"]["type"], "span");
  assert_eq!(headings[0]["titleInNav"]["content"]["fontSize"], "1.4em");

  assert_eq!(headings[2]["isListTitle"], true);
  assert_eq!(headings[2]["parent"], 0);
  assert_eq!(headings[2]["title"]["content"][1], serde_json::json!({ "type": "code", "content": "renderPage()" }));

  assert_eq!(headings[3]["parent"], 2);
  assert_eq!(headings[3]["titleInNav"]["content"][0]["content"], "Details");
  Ok(())
}

#[test]
fn test_headings_frame_relative_to_root() -> Result<()> {
  let dir = frame_dir(FRAME, "frame.json")?;
  let cwd = TempDir::new()?;
  let root = dir.path().to_string_lossy().into_owned();

  let output = run_relkit(cwd.path(), &["--root", &root, "docs", "headings", "frame.json"], &[])?;
  assert_success(&output)?;

  let headings: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(headings.as_array().map(Vec::len), Some(5));
  Ok(())
}

#[test]
fn test_headings_html() -> Result<()> {
  let dir = frame_dir(FRAME, "frame.json")?;

  let output = run_relkit(dir.path(), &["docs", "headings", "frame.json", "--format", "html"], &[])?;
  assert_success(&output)?;

  let html = stdout(&output);
  assert!(html.contains("aria-label=\"compass\""), "{html}");
  assert!(html.contains("href=\"/render-page\">\u{a0}•\u{a0}Use <code>renderPage()</code></a>"), "{html}");
  assert!(html.contains("<div class=\"nav-item nav-item-level-4\">Integrations</div>"));
  Ok(())
}

#[test]
fn test_headings_toml_frame() -> Result<()> {
  let dir = frame_dir(
    "[[headings]]\nlevel = 1\ntitle = \"Start\"\ntitleEmoji = \"rocket\"\n",
    "frame.toml",
  )?;

  let output = run_relkit(dir.path(), &["docs", "headings", "frame.toml"], &[])?;
  assert_success(&output)?;
  assert!(stdout(&output).contains("\"rocket\""));
  Ok(())
}

#[test]
fn test_duplicate_url_fails() -> Result<()> {
  let dir = frame_dir(
    r#"{"headings":[{"level":2,"title":"A","url":"/a"},{"level":2,"title":"B","url":"/a"}]}"#,
    "frame.json",
  )?;

  let output = run_relkit(dir.path(), &["docs", "headings", "frame.json"], &[])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Duplicate heading url: /a"));
  Ok(())
}

#[test]
fn test_missing_headings_fails() -> Result<()> {
  let dir = frame_dir("{}", "frame.json")?;

  let output = run_relkit(dir.path(), &["docs", "headings", "frame.json"], &[])?;
  assert_eq!(output.status.code(), Some(3));
  Ok(())
}

#[test]
fn test_title_spans() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_relkit(dir.path(), &["docs", "title", "Use `foo` now", "--json"], &[])?;
  assert_success(&output)?;
  let spans: Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(
    spans,
    serde_json::json!([
      { "type": "text", "content": "Use " },
      { "type": "code", "content": "foo" },
      { "type": "text", "content": " now" }
    ])
  );

  let output = run_relkit(dir.path(), &["docs", "title", "Use `foo` now"], &[])?;
  assert_success(&output)?;
  assert_eq!(stdout(&output).trim_end(), "Use <code>foo</code> now");
  Ok(())
}
