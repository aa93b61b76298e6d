//! CLI commands for relkit
//!
//! ## Release engineering
//! - **release**: version bump, changelog, commit, tag, publish, push, link
//! - **bump-dependencies**: `ncu -u` across tested packages
//! - **bump-lockfiles**: recreate package-lock.json files and yarn.lock
//! - **link**: `yarn link` the package into boilerplates and examples
//!
//! ## Docs
//! - **docs headings**: process a frame's heading definitions
//! - **docs title**: parse a single title
//!
//! Release commands take `&RepoContext`; docs commands only read their input file.

pub mod deps;
pub mod docs;
pub mod link;
pub mod lockfiles;
pub mod release;

pub use deps::run_bump_dependencies;
pub use docs::{HeadingsFormat, run_docs_headings, run_docs_title};
pub use link::run_link;
pub use lockfiles::run_bump_lockfiles;
pub use release::run_release;
