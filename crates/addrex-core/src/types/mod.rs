//! Core types for addrex.

mod address;
mod entity;

pub use address::*;
pub use entity::*;
