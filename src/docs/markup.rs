//! Title markup: plain text interleaved with inline code
//!
//! Titles use backticks as paired delimiters (`` Use `foo` now ``). Parsing
//! never fails: an unterminated code span ends with the title.

use crate::docs::emoji::EmojiName;
use serde::Serialize;

/// One span of a parsed title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum MarkupPart {
  Text(String),
  Code(String),
}

impl MarkupPart {
  fn push(&mut self, c: char) {
    match self {
      MarkupPart::Text(s) | MarkupPart::Code(s) => s.push(c),
    }
  }
}

/// Renderable markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Markup {
  Text(String),
  Code(String),
  Fragment(Vec<Markup>),
  #[serde(rename_all = "camelCase")]
  Span {
    font_size: String,
    children: Vec<Markup>,
  },
  Emoji(EmojiName),
}

/// Split a title into text and code spans
///
/// A backtick closes an open code span (pushing it even when empty) or opens
/// a new one, flushing pending text. Backticks never appear in the output.
pub fn parse_parts(title: &str) -> Vec<MarkupPart> {
  let mut parts = Vec::new();
  let mut current: Option<MarkupPart> = None;

  for c in title.chars() {
    if c == '`' {
      match current.take() {
        Some(code @ MarkupPart::Code(_)) => parts.push(code),
        pending => {
          parts.extend(pending);
          current = Some(MarkupPart::Code(String::new()));
        }
      }
    } else {
      current.get_or_insert_with(|| MarkupPart::Text(String::new())).push(c);
    }
  }

  parts.extend(current);
  parts
}

/// Parse a title into a markup fragment
pub fn parse_title(title: &str) -> Markup {
  Markup::Fragment(
    parse_parts(title)
      .into_iter()
      .map(|part| match part {
        MarkupPart::Text(s) => Markup::Text(s),
        MarkupPart::Code(s) => Markup::Code(s),
      })
      .collect(),
  )
}

impl Markup {
  pub fn span(font_size: impl Into<String>, children: Vec<Markup>) -> Self {
    Markup::Span {
      font_size: font_size.into(),
      children,
    }
  }

  /// Escaped HTML
  pub fn to_html(&self) -> String {
    let mut out = String::new();
    self.write_html(&mut out);
    out
  }

  fn write_html(&self, out: &mut String) {
    match self {
      Markup::Text(s) => out.push_str(&html_escape::encode_text(s)),
      Markup::Code(s) => {
        out.push_str("<code>");
        out.push_str(&html_escape::encode_text(s));
        out.push_str("</code>");
      }
      Markup::Fragment(children) => children.iter().for_each(|child| child.write_html(out)),
      Markup::Span { font_size, children } => {
        out.push_str("<span style=\"font-size: ");
        out.push_str(&html_escape::encode_double_quoted_attribute(font_size));
        out.push_str("\">");
        children.iter().for_each(|child| child.write_html(out));
        out.push_str("</span>");
      }
      Markup::Emoji(name) => {
        out.push_str(&format!(
          "<span class=\"emoji\" role=\"img\" aria-label=\"{}\">{}</span>",
          name.name(),
          name.glyph()
        ));
      }
    }
  }

  /// Text content without any markup
  pub fn plain_text(&self) -> String {
    match self {
      Markup::Text(s) | Markup::Code(s) => s.clone(),
      Markup::Fragment(children) | Markup::Span { children, .. } => children.iter().map(Markup::plain_text).collect(),
      Markup::Emoji(name) => name.glyph().to_string(),
    }
  }
}
