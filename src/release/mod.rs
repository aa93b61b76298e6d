//! Release engineering: version bumps, changelog, publish, lockfiles and links

pub mod changelog;
pub mod deps;
pub mod link;
pub mod lockfiles;
pub mod manifest;
pub mod orchestrator;
pub mod version;
pub mod version_constant;

pub use orchestrator::{Release, ReleaseStep};
