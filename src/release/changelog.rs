//! Changelog entries from conventional commits
//!
//! Used by the native changelog generator. The parser never panics and
//! ignores commits that are not conventional.

use std::collections::BTreeMap;
use std::fmt;

/// A parsed conventional commit
///
/// Format: `<type>(<scope>)!: <description>`
///
/// Example: `feat(router): add route guards`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
  pub commit_type: CommitType,
  pub scope: Option<String>,
  pub description: String,
  /// Breaking change description; empty when only `!` marked it
  pub breaking_change: Option<String>,
}

/// Conventional commit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
  Feat,
  Fix,
  Docs,
  Style,
  Refactor,
  Perf,
  Test,
  Build,
  Ci,
  Chore,
  Revert,
  /// Release commits made by relkit itself
  Release,
  Other,
}

impl CommitType {
  pub fn parse(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "feat" | "feature" => Self::Feat,
      "fix" => Self::Fix,
      "docs" | "doc" => Self::Docs,
      "style" => Self::Style,
      "refactor" => Self::Refactor,
      "perf" | "performance" => Self::Perf,
      "test" | "tests" => Self::Test,
      "build" => Self::Build,
      "ci" => Self::Ci,
      "chore" => Self::Chore,
      "revert" => Self::Revert,
      "release" => Self::Release,
      _ => Self::Other,
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Self::Feat => "Features",
      Self::Fix => "Bug Fixes",
      Self::Docs => "Documentation",
      Self::Style => "Style",
      Self::Refactor => "Refactoring",
      Self::Perf => "Performance Improvements",
      Self::Test => "Tests",
      Self::Build => "Build",
      Self::Ci => "CI",
      Self::Chore => "Chores",
      Self::Revert => "Reverts",
      Self::Release => "Releases",
      Self::Other => "Other",
    }
  }

  /// Whether entries of this type appear in the changelog
  ///
  /// Matches the angular preset: features, fixes, performance, reverts.
  pub fn is_listed(&self) -> bool {
    matches!(self, Self::Feat | Self::Fix | Self::Perf | Self::Revert)
  }
}

impl fmt::Display for CommitType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

impl ConventionalCommit {
  pub fn is_breaking(&self) -> bool {
    self.breaking_change.is_some()
  }

  /// Parse a conventional commit from a git commit message
  ///
  /// Returns None if the message doesn't follow conventional commit format.
  pub fn parse(message: &str) -> Option<Self> {
    let (first_line, rest) = message.split_once('\n').unwrap_or((message, ""));
    let (head, description) = first_line.split_once(':')?;

    let (head, bang) = match head.strip_suffix('!') {
      Some(head) => (head, true),
      None => (head, false),
    };

    let (type_str, scope) = match head.split_once('(') {
      Some((type_str, scope)) => {
        let scope = scope.strip_suffix(')')?;
        if scope.is_empty() || scope.contains(')') {
          return None;
        }
        (type_str, Some(scope.to_string()))
      }
      None => (head, None),
    };

    if type_str.is_empty() || !type_str.chars().all(|c| c.is_ascii_alphanumeric()) {
      return None;
    }

    let description = description.trim();
    if description.is_empty() {
      return None;
    }

    let mut breaking_change = rest.lines().find_map(|line| {
      let (key, value) = line.trim().split_once(':')?;
      let key = key.trim();
      (key.eq_ignore_ascii_case("BREAKING CHANGE") || key.eq_ignore_ascii_case("BREAKING-CHANGE"))
        .then(|| value.trim().to_string())
    });
    if breaking_change.is_none() && bang {
      breaking_change = Some(String::new());
    }

    Some(Self {
      commit_type: CommitType::parse(type_str),
      scope,
      description: description.to_string(),
      breaking_change,
    })
  }
}

/// One changelog entry (one release)
#[derive(Debug, Clone)]
pub struct Changelog {
  pub version: String,
  /// Release date (YYYY-MM-DD)
  pub date: String,
  /// Compare link base, e.g. `https://github.com/org/repo/compare`
  pub compare_url: Option<String>,
  pub previous_tag: Option<String>,
  pub tag: String,
  pub commits_by_type: BTreeMap<CommitType, Vec<(ConventionalCommit, String)>>,
}

impl Changelog {
  pub fn new(version: impl Into<String>, tag: impl Into<String>, date: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      date: date.into(),
      compare_url: None,
      previous_tag: None,
      tag: tag.into(),
      commits_by_type: BTreeMap::new(),
    }
  }

  /// Add a commit message; non-conventional messages are skipped
  pub fn add_message(&mut self, message: &str, sha: &str) -> bool {
    match ConventionalCommit::parse(message) {
      Some(commit) => {
        self
          .commits_by_type
          .entry(commit.commit_type)
          .or_default()
          .push((commit, sha.to_string()));
        true
      }
      None => false,
    }
  }

  fn breaking_changes(&self) -> Vec<&ConventionalCommit> {
    self
      .commits_by_type
      .values()
      .flatten()
      .map(|(commit, _)| commit)
      .filter(|commit| commit.is_breaking())
      .collect()
  }

  /// Render as markdown
  pub fn to_markdown(&self) -> String {
    let mut output = String::new();

    let heading = match (&self.compare_url, &self.previous_tag) {
      (Some(url), Some(prev)) => format!("[{}]({}/{}...{})", self.version, url, prev, self.tag),
      _ => self.version.clone(),
    };
    output.push_str(&format!("## {} ({})\n\n", heading, self.date));

    // BTreeMap order follows the CommitType declaration order
    for (commit_type, commits) in self.commits_by_type.iter().filter(|(t, _)| t.is_listed()) {
      if commits.is_empty() {
        continue;
      }

      output.push_str(&format!("### {}\n\n", commit_type.display_name()));
      for (commit, sha) in commits {
        let scope_str = commit.scope.as_ref().map(|s| format!("**{}:** ", s)).unwrap_or_default();
        let short_sha: String = sha.chars().take(7).collect();
        output.push_str(&format!("* {}{} ({})\n", scope_str, commit.description, short_sha));
      }
      output.push('\n');
    }

    let breaking = self.breaking_changes();
    if !breaking.is_empty() {
      output.push_str("### BREAKING CHANGES\n\n");
      for commit in breaking {
        match commit.breaking_change.as_deref() {
          Some(note) if !note.is_empty() => output.push_str(&format!("* {}\n", note)),
          _ => output.push_str(&format!("* {}\n", commit.description)),
        }
      }
      output.push('\n');
    }

    output
  }
}

/// Insert a new entry above the existing ones
///
/// A leading `# Changelog` title block stays on top.
pub fn prepend_entry(existing: &str, entry: &str) -> String {
  if existing.trim().is_empty() {
    return entry.to_string();
  }

  if existing.starts_with("# ")
    && let Some(header_end) = existing.find("\n\n")
  {
    let (header, rest) = existing.split_at(header_end + 2);
    return format!("{}{}{}", header, entry, rest);
  }

  format!("{}{}", entry, existing)
}
