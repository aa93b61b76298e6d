//! Integration tests for relkit
//!
//! Release tests drive a real git repository; npm, npx, yarn and ncu are
//! replaced by shell shims that only log how they were called.

mod helpers;

#[cfg(unix)]
mod test_deps;
mod test_docs;
#[cfg(unix)]
mod test_link;
#[cfg(unix)]
mod test_lockfiles;
#[cfg(unix)]
mod test_release;
