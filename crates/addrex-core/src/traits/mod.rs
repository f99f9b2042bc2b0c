//! Core traits for addrex providers.

mod annotator;

pub use annotator::*;
