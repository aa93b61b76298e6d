//! Frame files: the data source of heading definitions
//!
//! A frame is a `.json` or `.toml` file with a `headings` array of flat
//! camelCase records.

use crate::core::error::{RelkitError, RelkitResult, ResultExt};
use crate::docs::headings::{HeadingDefinition, RawHeading};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Frame {
  /// `None` when the frame file defines no `headings` key
  pub headings: Option<Vec<HeadingDefinition>>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
  headings: Option<Vec<RawHeading>>,
}

impl Frame {
  /// Load a frame, choosing the format from the file extension
  pub fn load(path: &Path) -> RelkitResult<Self> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read frame {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let frame = match extension {
      "json" => Self::from_json(&content),
      "toml" => Self::from_toml(&content),
      _ => Err(RelkitError::with_help(
        format!("Unsupported frame file: {}", path.display()),
        "Frame files must end in .json or .toml",
      )),
    };
    frame.with_context(|| format!("Invalid frame {}", path.display()))
  }

  pub fn from_json(content: &str) -> RelkitResult<Self> {
    let raw: RawFrame = serde_json::from_str(content)?;
    Self::from_raw(raw)
  }

  pub fn from_toml(content: &str) -> RelkitResult<Self> {
    let raw: RawFrame = toml_edit::de::from_str(content)?;
    Self::from_raw(raw)
  }

  fn from_raw(raw: RawFrame) -> RelkitResult<Self> {
    let headings = match raw.headings {
      Some(records) => Some(
        records
          .into_iter()
          .enumerate()
          .map(|(index, record)| HeadingDefinition::from_raw(index, record))
          .collect::<RelkitResult<Vec<_>>>()?,
      ),
      None => None,
    };
    Ok(Self { headings })
  }
}
