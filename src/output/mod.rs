//! Output formatting
//!
//! Text goes to stdout; JSON is written to a file when requested.

pub mod json;
pub mod text;
