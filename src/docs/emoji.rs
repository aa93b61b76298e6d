//! Emoji used to decorate top-level navigation headings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of emoji a section heading may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmojiName {
  Books,
  Compass,
  Construction,
  Dizzy,
  Earth,
  Gear,
  Glasses,
  HighVoltage,
  LadyBeetle,
  MechanicalArm,
  Package,
  Puzzle,
  Rocket,
  Seedling,
  Shield,
  Sparkles,
  ThoughtBalloon,
  Wrench,
}

impl EmojiName {
  pub const ALL: [EmojiName; 18] = [
    EmojiName::Books,
    EmojiName::Compass,
    EmojiName::Construction,
    EmojiName::Dizzy,
    EmojiName::Earth,
    EmojiName::Gear,
    EmojiName::Glasses,
    EmojiName::HighVoltage,
    EmojiName::LadyBeetle,
    EmojiName::MechanicalArm,
    EmojiName::Package,
    EmojiName::Puzzle,
    EmojiName::Rocket,
    EmojiName::Seedling,
    EmojiName::Shield,
    EmojiName::Sparkles,
    EmojiName::ThoughtBalloon,
    EmojiName::Wrench,
  ];

  /// Identifier used in frame files (`lady-beetle`)
  pub fn name(&self) -> &'static str {
    match self {
      Self::Books => "books",
      Self::Compass => "compass",
      Self::Construction => "construction",
      Self::Dizzy => "dizzy",
      Self::Earth => "earth",
      Self::Gear => "gear",
      Self::Glasses => "glasses",
      Self::HighVoltage => "high-voltage",
      Self::LadyBeetle => "lady-beetle",
      Self::MechanicalArm => "mechanical-arm",
      Self::Package => "package",
      Self::Puzzle => "puzzle",
      Self::Rocket => "rocket",
      Self::Seedling => "seedling",
      Self::Shield => "shield",
      Self::Sparkles => "sparkles",
      Self::ThoughtBalloon => "thought-balloon",
      Self::Wrench => "wrench",
    }
  }

  pub fn glyph(&self) -> &'static str {
    match self {
      Self::Books => "\u{1f4da}",
      Self::Compass => "\u{1f9ed}",
      Self::Construction => "\u{1f6a7}",
      Self::Dizzy => "\u{1f4ab}",
      Self::Earth => "\u{1f30d}",
      Self::Gear => "\u{2699}\u{fe0f}",
      Self::Glasses => "\u{1f453}",
      Self::HighVoltage => "\u{26a1}",
      Self::LadyBeetle => "\u{1f41e}",
      Self::MechanicalArm => "\u{1f9be}",
      Self::Package => "\u{1f4e6}",
      Self::Puzzle => "\u{1f9e9}",
      Self::Rocket => "\u{1f680}",
      Self::Seedling => "\u{1f331}",
      Self::Shield => "\u{1f6e1}\u{fe0f}",
      Self::Sparkles => "\u{2728}",
      Self::ThoughtBalloon => "\u{1f4ad}",
      Self::Wrench => "\u{1f527}",
    }
  }
}

impl FromStr for EmojiName {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|emoji| emoji.name() == s)
      .ok_or_else(|| format!("unknown emoji '{}'", s))
  }
}

impl fmt::Display for EmojiName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
