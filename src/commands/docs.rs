//! `relkit docs` subcommands

use crate::core::error::RelkitResult;
use crate::docs::markup::parse_parts;
use crate::docs::{Frame, get_headings, parse_title, render_nav_html};
use clap::ValueEnum;
use std::path::Path;

/// Output format of `relkit docs headings`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeadingsFormat {
  Json,
  Html,
}

/// Print the processed headings of a frame file
pub fn run_docs_headings(frame: &Path, format: HeadingsFormat) -> RelkitResult<()> {
  let frame = Frame::load(frame)?;
  let headings = get_headings(&frame)?;
  log::debug!("processed {} headings", headings.len());

  match format {
    HeadingsFormat::Json => println!("{}", serde_json::to_string_pretty(&headings)?),
    HeadingsFormat::Html => print!("{}", render_nav_html(&headings)),
  }
  Ok(())
}

/// Print a parsed title as HTML, or its spans as JSON
pub fn run_docs_title(title: &str, json: bool) -> RelkitResult<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(&parse_parts(title))?);
  } else {
    println!("{}", parse_title(title).to_html());
  }
  Ok(())
}
