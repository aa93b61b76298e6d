//! Heading definitions and their processed navigation form

use crate::core::error::{RelkitResult, ValidationError};
use crate::docs::emoji::EmojiName;
use crate::docs::frame::Frame;
use crate::docs::markup::{Markup, parse_title};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// `NBSP • NBSP`, shown before list-style navigation titles
pub const LIST_PREFIX: &str = "\u{a0}\u{2022}\u{a0}";

const EMOJI_FONT_SIZE: &str = "1.4em";
const EMOJI_TITLE_FONT_SIZE: &str = "1rem";

/// A heading as written in a frame, one variant per level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingDefinition {
  /// Level 1
  Section { title: String, title_emoji: EmojiName },
  /// Level 2
  Page {
    title: String,
    url: String,
    title_in_nav: Option<String>,
    title_document: Option<String>,
    is_active: bool,
    is_list_title: bool,
  },
  /// Level 3
  Subpage {
    title: String,
    url: String,
    title_in_nav: Option<String>,
    title_document: Option<String>,
    is_active: bool,
  },
  /// Level 4
  Category { title: String },
}

/// Flat record as found in frame files
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawHeading {
  level: u8,
  title: String,
  url: Option<String>,
  title_in_nav: Option<String>,
  title_document: Option<String>,
  title_emoji: Option<String>,
  is_active: Option<bool>,
  is_list_title: Option<bool>,
}

impl RawHeading {
  fn reject(&self, fields: &[(&str, bool)]) -> Result<(), String> {
    match fields.iter().find(|(_, present)| *present) {
      Some((name, _)) => Err(format!("`{}` is not allowed on level {} headings", name, self.level)),
      None => Ok(()),
    }
  }

  fn required_url(&self) -> Result<String, String> {
    self
      .url
      .clone()
      .ok_or_else(|| format!("level {} headings require a `url`", self.level))
  }
}

impl TryFrom<RawHeading> for HeadingDefinition {
  type Error = String;

  fn try_from(raw: RawHeading) -> Result<Self, Self::Error> {
    let page_only = [
      ("url", raw.url.is_some()),
      ("titleInNav", raw.title_in_nav.is_some()),
      ("titleDocument", raw.title_document.is_some()),
      ("isActive", raw.is_active.is_some()),
      ("isListTitle", raw.is_list_title.is_some()),
    ];

    match raw.level {
      1 => {
        raw.reject(&page_only)?;
        let emoji = raw
          .title_emoji
          .as_deref()
          .ok_or_else(|| "level 1 headings require a `titleEmoji`".to_string())?;
        Ok(HeadingDefinition::Section {
          title_emoji: emoji.parse()?,
          title: raw.title,
        })
      }
      2 => {
        raw.reject(&[("titleEmoji", raw.title_emoji.is_some())])?;
        if raw.is_list_title == Some(false) {
          return Err("`isListTitle` must be `true` when present".to_string());
        }
        Ok(HeadingDefinition::Page {
          url: raw.required_url()?,
          title: raw.title,
          title_in_nav: raw.title_in_nav,
          title_document: raw.title_document,
          is_active: raw.is_active.unwrap_or(false),
          is_list_title: raw.is_list_title.unwrap_or(false),
        })
      }
      3 => {
        raw.reject(&[
          ("titleEmoji", raw.title_emoji.is_some()),
          ("isListTitle", raw.is_list_title.is_some()),
        ])?;
        Ok(HeadingDefinition::Subpage {
          url: raw.required_url()?,
          title: raw.title,
          title_in_nav: raw.title_in_nav,
          title_document: raw.title_document,
          is_active: raw.is_active.unwrap_or(false),
        })
      }
      4 => {
        raw.reject(&page_only)?;
        raw.reject(&[("titleEmoji", raw.title_emoji.is_some())])?;
        Ok(HeadingDefinition::Category { title: raw.title })
      }
      level => Err(format!("unknown heading level {}", level)),
    }
  }
}

impl HeadingDefinition {
  /// Validate a raw frame record; `index` is its position in the frame
  pub(crate) fn from_raw(index: usize, raw: RawHeading) -> RelkitResult<Self> {
    Self::try_from(raw).map_err(|reason| ValidationError::InvalidHeading { index, reason }.into())
  }

  pub fn level(&self) -> u8 {
    match self {
      HeadingDefinition::Section { .. } => 1,
      HeadingDefinition::Page { .. } => 2,
      HeadingDefinition::Subpage { .. } => 3,
      HeadingDefinition::Category { .. } => 4,
    }
  }

  pub fn title(&self) -> &str {
    match self {
      HeadingDefinition::Section { title, .. }
      | HeadingDefinition::Page { title, .. }
      | HeadingDefinition::Subpage { title, .. }
      | HeadingDefinition::Category { title } => title,
    }
  }

  pub fn url(&self) -> Option<&str> {
    match self {
      HeadingDefinition::Page { url, .. } | HeadingDefinition::Subpage { url, .. } => Some(url),
      _ => None,
    }
  }

  /// Navigation title, falling back to the title when the override is absent or empty
  pub fn nav_title(&self) -> &str {
    let title_in_nav = match self {
      HeadingDefinition::Page { title_in_nav, .. } | HeadingDefinition::Subpage { title_in_nav, .. } => {
        title_in_nav.as_deref()
      }
      _ => None,
    };
    title_in_nav.filter(|t| !t.is_empty()).unwrap_or(self.title())
  }

  fn title_document(&self) -> Option<&str> {
    match self {
      HeadingDefinition::Page { title_document, .. } | HeadingDefinition::Subpage { title_document, .. } => {
        title_document.as_deref()
      }
      _ => None,
    }
  }

  fn is_active(&self) -> bool {
    match self {
      HeadingDefinition::Page { is_active, .. } | HeadingDefinition::Subpage { is_active, .. } => *is_active,
      _ => false,
    }
  }

  pub fn is_list_title(&self) -> bool {
    matches!(self, HeadingDefinition::Page { is_list_title: true, .. })
  }

  pub fn title_emoji(&self) -> Option<EmojiName> {
    match self {
      HeadingDefinition::Section { title_emoji, .. } => Some(*title_emoji),
      _ => None,
    }
  }
}

/// A processed heading, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
  pub level: u8,
  pub title: Markup,
  pub title_in_nav: Markup,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title_document: Option<String>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub is_active: bool,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub is_list_title: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title_emoji: Option<EmojiName>,
  /// Index of the nearest preceding heading with a lower level
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent: Option<usize>,
}

/// Wrap a navigation title with its emoji
pub fn with_emoji(name: EmojiName, title: Markup) -> Markup {
  Markup::span(
    EMOJI_FONT_SIZE,
    vec![
      Markup::Emoji(name),
      Markup::Text(" ".to_string()),
      Markup::span(EMOJI_TITLE_FONT_SIZE, vec![title]),
    ],
  )
}

fn nav_markup(definition: &HeadingDefinition) -> Markup {
  let parsed = parse_title(definition.nav_title());
  let nav = if definition.is_list_title() {
    Markup::Fragment(vec![Markup::Text(LIST_PREFIX.to_string()), parsed])
  } else {
    parsed
  };

  match definition.title_emoji() {
    Some(emoji) => with_emoji(emoji, nav),
    None => nav,
  }
}

/// Process heading definitions into navigation headings
///
/// Fails when two headings share a non-empty url.
pub fn process_headings(definitions: &[HeadingDefinition]) -> RelkitResult<Vec<Heading>> {
  let mut headings: Vec<Heading> = Vec::with_capacity(definitions.len());

  for definition in definitions {
    let level = definition.level();
    let parent = headings.iter().rposition(|h| h.level < level);
    headings.push(Heading {
      level,
      title: parse_title(definition.title()),
      title_in_nav: nav_markup(definition),
      url: definition.url().map(String::from),
      title_document: definition.title_document().map(String::from),
      is_active: definition.is_active(),
      is_list_title: definition.is_list_title(),
      title_emoji: definition.title_emoji(),
      parent,
    });
  }

  ensure_unique_urls(&headings)?;
  Ok(headings)
}

fn ensure_unique_urls(headings: &[Heading]) -> RelkitResult<()> {
  let mut seen = HashSet::new();
  for url in headings.iter().filter_map(|h| h.url.as_deref()).filter(|u| !u.is_empty()) {
    if !seen.insert(url) {
      return Err(ValidationError::DuplicateUrl { url: url.to_string() }.into());
    }
  }
  Ok(())
}

/// Processed headings of a frame
pub fn get_headings(frame: &Frame) -> RelkitResult<Vec<Heading>> {
  let definitions = frame.headings.as_deref().ok_or(ValidationError::HeadingsMissing)?;
  process_headings(definitions)
}

/// Render headings as a navigation list
pub fn render_nav_html(headings: &[Heading]) -> String {
  let mut out = String::from("<nav>\n");
  for heading in headings {
    let class = format!("nav-item nav-item-level-{}", heading.level);
    let active = if heading.is_active { " is-active" } else { "" };
    match &heading.url {
      Some(url) => out.push_str(&format!(
        "  <a class=\"{}{}\" title=\"{}\" href=\"{}\">{}</a>\n",
        class,
        active,
        html_escape::encode_double_quoted_attribute(&heading.title.plain_text()),
        html_escape::encode_double_quoted_attribute(url),
        heading.title_in_nav.to_html()
      )),
      None => out.push_str(&format!(
        "  <div class=\"{}{}\">{}</div>\n",
        class,
        active,
        heading.title_in_nav.to_html()
      )),
    }
  }
  out.push_str("</nav>\n");
  out
}
