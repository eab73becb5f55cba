//! The syntax tree of the quill language.
//!
//! The tree is produced by the parser (a separate component) and is immutable once built:
//! the front-end passes only read it and key their side tables by [`NodeId`].
//! Every node kind is a closed enum, so passes traverse it with exhaustive `match`es.

pub mod ast;
mod node;

pub use ast::*;
pub use node::{NodeId, NodeIdGen};
