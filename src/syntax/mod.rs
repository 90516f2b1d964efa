//! Source text reader.

pub mod parser;

pub use parser::{parse, parse_form, parse_named};
