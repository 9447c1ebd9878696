//! Resolved parameter values, addressed by section path and name.
//!
//! A [`ParameterStore`] mirrors its [`SchemaTree`] and holds the text of every
//! declared leaf: the default right after construction, the input value after
//! an overlay. Values stay text until a [`SectionView`] converts them.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{ParamError, Result};
use crate::pattern::split_list;
use crate::schema::{display_path, LeafDeclaration, SchemaTree, SchemaVisitor, SectionNode};

#[derive(Debug, Clone, Default, PartialEq)]
struct ValueNode {
    values: IndexMap<String, String>,
    sections: IndexMap<String, ValueNode>,
}

/// Collects the declared defaults into a value tree.
struct DefaultCollector {
    stack: Vec<ValueNode>,
}

impl SchemaVisitor for DefaultCollector {
    fn enter_section(&mut self, _path: &[String], _node: &SectionNode) -> Result<()> {
        self.stack.push(ValueNode::default());
        Ok(())
    }

    fn visit_leaf(&mut self, path: &[String], leaf: &LeafDeclaration) -> Result<()> {
        let node = self
            .stack
            .last_mut()
            .ok_or_else(|| ParamError::undeclared(display_path(path), leaf.name.clone()))?;
        node.values
            .insert(leaf.name.clone(), leaf.default_value.clone());
        Ok(())
    }

    fn leave_section(&mut self, path: &[String], _node: &SectionNode) -> Result<()> {
        let done = self.stack.pop();
        let (name, parent) = match (path.last(), self.stack.last_mut()) {
            (Some(name), Some(parent)) => (name, parent),
            _ => return Err(ParamError::schema(display_path(path), "unbalanced traversal")),
        };
        parent.sections.insert(name.clone(), done.unwrap_or_default());
        Ok(())
    }
}

/// The resolved value of every declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    schema: SchemaTree,
    values: ValueNode,
}

impl ParameterStore {
    /// Create a store holding the default of every leaf in `schema`.
    pub fn new(schema: SchemaTree) -> Result<Self> {
        let mut collector = DefaultCollector {
            stack: vec![ValueNode::default()],
        };
        schema.walk(&mut collector)?;
        let values = collector.stack.pop().unwrap_or_default();
        Ok(Self { schema, values })
    }

    /// The schema this store was built from.
    pub fn schema(&self) -> &SchemaTree {
        &self.schema
    }

    /// Current text of a parameter.
    pub fn get<S: AsRef<str>>(&self, path: &[S], key: &str) -> Result<&str> {
        self.view(path)?.get(key)
    }

    /// Replace the text of a parameter after checking it against the
    /// declared pattern. A rejected value leaves the previous one in place.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S], key: &str, value: &str) -> Result<()> {
        let leaf = self
            .schema
            .leaf(path, key)
            .ok_or_else(|| ParamError::undeclared(display_path(path), key))?;
        if !leaf.pattern.validate(value) {
            return Err(ParamError::InvalidValue {
                path: display_path(path),
                key: key.to_string(),
                value: value.to_string(),
                pattern: leaf.pattern.describe(),
                line: None,
            });
        }

        let mut node = &mut self.values;
        for name in path {
            node = node
                .sections
                .get_mut(name.as_ref())
                .ok_or_else(|| ParamError::undeclared(display_path(path), key))?;
        }
        node.values.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    /// The root section.
    pub fn root(&self) -> SectionView<'_> {
        SectionView {
            path: Vec::new(),
            schema: self.schema.root(),
            values: &self.values,
        }
    }

    /// A read-only view of the section at `path`.
    pub fn view<S: AsRef<str>>(&self, path: &[S]) -> Result<SectionView<'_>> {
        path.iter()
            .try_fold(self.root(), |view, name| view.subsection(name.as_ref()))
    }
}

/// A read-only scope inside a [`ParameterStore`].
///
/// Entering a child section returns a new view; leaving is dropping it.
#[derive(Debug, Clone)]
pub struct SectionView<'a> {
    path: Vec<String>,
    schema: &'a SectionNode,
    values: &'a ValueNode,
}

impl<'a> SectionView<'a> {
    /// Path of this section.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Enter a child section.
    pub fn subsection(&self, name: &str) -> Result<SectionView<'a>> {
        let schema = self.schema.section(name);
        let values = self.values.sections.get(name);
        match (schema, values) {
            (Some(schema), Some(values)) => {
                let mut path = self.path.clone();
                path.push(name.to_string());
                Ok(SectionView {
                    path,
                    schema,
                    values,
                })
            }
            _ => Err(ParamError::undeclared(display_path(&self.path), name)),
        }
    }

    /// Raw text of a leaf.
    pub fn get(&self, key: &str) -> Result<&'a str> {
        self.values
            .values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ParamError::undeclared(display_path(&self.path), key))
    }

    /// A leaf converted with [`FromStr`].
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<T> {
        let text = self.get(key)?;
        text.parse().map_err(|_| self.conversion_error(key, text))
    }

    /// A boolean leaf.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(self.conversion_error(key, other)),
        }
    }

    /// A list leaf, each element converted with [`FromStr`].
    pub fn get_list<T: FromStr>(&self, key: &str) -> Result<Vec<T>> {
        let text = self.get(key)?;
        split_list(text)
            .map(|item| item.parse().map_err(|_| self.conversion_error(key, text)))
            .collect()
    }

    fn conversion_error(&self, key: &str, value: &str) -> ParamError {
        let pattern = self
            .schema
            .entry(key)
            .map(|leaf| leaf.pattern.describe())
            .unwrap_or_default();
        ParamError::InvalidValue {
            path: display_path(&self.path),
            key: key.to_string(),
            value: value.to_string(),
            pattern,
            line: None,
        }
    }
}
