//! Depth-first traversal of the schema tree.

use super::tree::{LeafDeclaration, SectionNode};
use crate::error::Result;

/// Callbacks invoked while walking a [`SectionNode`] tree.
///
/// Within a section, leaves are visited before child sections, both in
/// declaration order. `path` is the full section path of the section being
/// entered, left, or containing the leaf.
pub trait SchemaVisitor {
    /// Called before the contents of a named section.
    fn enter_section(&mut self, _path: &[String], _node: &SectionNode) -> Result<()> {
        Ok(())
    }

    /// Called for every leaf.
    fn visit_leaf(&mut self, path: &[String], leaf: &LeafDeclaration) -> Result<()>;

    /// Called after the contents of a named section.
    fn leave_section(&mut self, _path: &[String], _node: &SectionNode) -> Result<()> {
        Ok(())
    }
}

/// Walk `root` and all of its descendants. The root itself is not entered.
pub fn walk<V: SchemaVisitor + ?Sized>(root: &SectionNode, visitor: &mut V) -> Result<()> {
    let mut path = Vec::new();
    walk_section(root, &mut path, visitor)
}

fn walk_section<V: SchemaVisitor + ?Sized>(
    node: &SectionNode,
    path: &mut Vec<String>,
    visitor: &mut V,
) -> Result<()> {
    for leaf in node.entries() {
        visitor.visit_leaf(path, leaf)?;
    }
    for (name, child) in node.sections() {
        path.push(name.to_string());
        visitor.enter_section(path, child)?;
        walk_section(child, path, visitor)?;
        visitor.leave_section(path, child)?;
        path.pop();
    }
    Ok(())
}
