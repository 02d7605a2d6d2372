//! Helper functions for rendering
//!
//! Date formatting and reading time estimation shared by the generator,
//! the server and the CLI.

mod date;
mod reading;

pub use date::*;
pub use reading::*;
