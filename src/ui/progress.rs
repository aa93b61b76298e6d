//! Progress indicators for per-package loops
//!
//! Uses `linya` bars drawn to stderr, so captured tool output and the
//! summary lines printed on stdout stay clean.

use linya::{Bar, Progress};

/// Progress over a sequential loop of package operations
pub struct PackageProgress {
  progress: Progress,
  bar: Option<Bar>,
}

impl PackageProgress {
  /// Create a bar for `total` packages; nothing is drawn when `total` is zero
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = (total > 0).then(|| progress.bar(total, label.into()));
    Self { progress, bar }
  }

  /// Mark one package as done
  pub fn inc(&mut self) {
    if let Some(bar) = &self.bar {
      self.progress.inc_and_draw(bar, 1);
    }
  }
}
