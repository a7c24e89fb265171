//! Test helpers shared across chimera-conf crates.

pub mod form;
pub mod tree;

pub use form::{FormGuard, lock_form};
pub use tree::ConfigTree;
