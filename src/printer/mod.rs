//! Printing parsed policies back out, either as canonical source or as a
//! structural dump for debugging

pub mod source;
pub mod tree;

pub use source::to_source;
pub use tree::to_tree;
