//! Documentation heading pipeline
//!
//! Frame files supply raw heading definitions; [`headings::get_headings`]
//! turns them into navigation headings with parsed titles.

pub mod emoji;
pub mod frame;
pub mod headings;
pub mod markup;

pub use frame::Frame;
pub use headings::{get_headings, render_nav_html};
pub use markup::parse_title;
