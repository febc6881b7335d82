//! State tree structure, paths, and the generic pre-order walker.

pub mod node;
pub mod path;
pub mod traverse;

pub use node::Node;
pub use path::{Path, PathKey};
pub use traverse::{traverse, Flow, Traversable};
