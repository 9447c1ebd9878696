//! Schema tree types.

use indexmap::IndexMap;

use super::visit::{walk, SchemaVisitor};
use crate::error::Result;
use crate::pattern::Pattern;

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDeclaration {
    /// Parameter name, unique within its section
    pub name: String,
    /// Shape the value must match
    pub pattern: Pattern,
    /// Value used when the input does not mention the parameter
    pub default_value: String,
    /// Free-form documentation, written to the echo file as comments
    pub documentation: String,
}

/// A named scope holding leaves and child sections in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionNode {
    pub(crate) entries: IndexMap<String, LeafDeclaration>,
    pub(crate) sections: IndexMap<String, SectionNode>,
}

impl SectionNode {
    /// Look up a leaf declared directly in this section.
    pub fn entry(&self, name: &str) -> Option<&LeafDeclaration> {
        self.entries.get(name)
    }

    /// Look up a child section.
    pub fn section(&self, name: &str) -> Option<&SectionNode> {
        self.sections.get(name)
    }

    /// Leaves in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &LeafDeclaration> {
        self.entries.values()
    }

    /// Child sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &SectionNode)> {
        self.sections.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.sections.contains_key(name)
    }
}

/// The complete, immutable parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    root: SectionNode,
}

impl SchemaTree {
    pub(crate) fn new(root: SectionNode) -> Self {
        Self { root }
    }

    /// The unnamed root section.
    pub fn root(&self) -> &SectionNode {
        &self.root
    }

    /// Resolve a section path; the empty path is the root.
    pub fn section<S: AsRef<str>>(&self, path: &[S]) -> Option<&SectionNode> {
        path.iter()
            .try_fold(&self.root, |node, name| node.section(name.as_ref()))
    }

    /// Resolve a leaf by section path and name.
    pub fn leaf<S: AsRef<str>>(&self, path: &[S], name: &str) -> Option<&LeafDeclaration> {
        self.section(path)?.entry(name)
    }

    /// Walk every section and leaf in declaration order.
    pub fn walk<V: SchemaVisitor>(&self, visitor: &mut V) -> Result<()> {
        walk(&self.root, visitor)
    }
}

/// Render a section path for messages, e.g. `refinement.adaptive`.
pub fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}
