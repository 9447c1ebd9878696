//! Parameter schema: the declared shape of the parameter tree.
//!
//! The schema is a tree of named sections. Each section holds leaf
//! declarations (name, [`Pattern`](crate::pattern::Pattern), default text,
//! documentation) and child sections. It is built once per dimension by
//! [`build_schema`] and is immutable afterwards.
//!
//! # Topology
//!
//! ```text
//! meta
//! source_function            (function sub-scope)
//! geometry
//! initial_values
//!   parsed_function          (function sub-scope)
//! refinement
//!   adaptive
//! time
//! solver
//! output
//! verification
//!   exact_solution_function  (function sub-scope)
//! ```
//!
//! Every consumer of the tree (default population, echo writing, listing)
//! walks it through [`SchemaVisitor`], so path construction lives in one place.

mod builder;
mod declare;
mod tree;
mod visit;

pub use builder::SchemaBuilder;
pub use declare::{build_schema, declare};
pub use tree::{display_path, LeafDeclaration, SchemaTree, SectionNode};
pub use visit::{walk, SchemaVisitor};
