//! Safe SQL builder for the books table. Identifiers come from settings only; values are bound.

mod builder;
pub use builder::*;
