//! Core building blocks shared by every relkit command
//!
//! - **config**: relkit.toml parsing and validation
//! - **context**: Repository context (root + config) built once in main.rs
//! - **error**: Error types with contextual help messages and exit codes
//! - **process**: External tool invocation (follow / capture)
//! - **vcs**: Git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod vcs;
