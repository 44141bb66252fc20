//! Front-end boundary: raw source text (or a cached companion tree) in,
//! internal node arena out. The rest of the crate treats parsing as opaque.

pub mod common;
pub mod javascript;

pub use javascript::{companion_path, parse_file, parse_source};
