mod expander;
mod index;

pub use expander::{normalize, PathExpander};
pub use index::PathIndex;
