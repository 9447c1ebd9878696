//! Incremental construction of a [`SchemaTree`].

use tracing::debug;

use super::tree::{display_path, LeafDeclaration, SchemaTree, SectionNode};
use crate::error::{ParamError, Result};
use crate::pattern::Pattern;

/// Builds a schema by entering sections and declaring leaves.
///
/// Every [`enter_subsection`](Self::enter_subsection) must be paired with a
/// [`leave_subsection`](Self::leave_subsection) before [`finish`](Self::finish);
/// [`subsection`](Self::subsection) does the pairing for a closure.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    root: SectionNode,
    path: Vec<String>,
}

impl SchemaBuilder {
    /// Create a builder positioned at the root section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter (creating if needed) a child section of the current section.
    pub fn enter_subsection(&mut self, name: &str) -> Result<()> {
        let path = display_path(&self.path);
        let current = self.current_mut()?;
        if current.entries.contains_key(name) {
            return Err(ParamError::schema(
                path,
                format!("subsection '{name}' collides with a parameter of the same name"),
            ));
        }
        if !current.sections.contains_key(name) {
            current.sections.insert(name.to_string(), SectionNode::default());
        }
        self.path.push(name.to_string());
        debug!(section = %display_path(&self.path), "declaring section");
        Ok(())
    }

    /// Leave the current section.
    pub fn leave_subsection(&mut self) -> Result<()> {
        if self.path.pop().is_none() {
            return Err(ParamError::schema(
                "<root>",
                "leave_subsection called at the root section",
            ));
        }
        Ok(())
    }

    /// Run `declare` inside the child section `name`.
    pub fn subsection<F>(&mut self, name: &str, declare: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.enter_subsection(name)?;
        declare(self)?;
        self.leave_subsection()
    }

    /// Declare a parameter in the current section.
    ///
    /// The default must match the pattern; a failing default is a defect in
    /// the declaration routine and is reported as [`ParamError::SchemaViolation`].
    pub fn declare_entry(
        &mut self,
        name: &str,
        default_value: &str,
        pattern: Pattern,
        documentation: &str,
    ) -> Result<()> {
        let path = display_path(&self.path);
        if !pattern.validate(default_value) {
            return Err(ParamError::schema(
                path,
                format!(
                    "default '{default_value}' of parameter '{name}' does not match {pattern}"
                ),
            ));
        }

        let current = self.current_mut()?;
        if current.contains_name(name) {
            return Err(ParamError::schema(
                path,
                format!("'{name}' is declared more than once"),
            ));
        }
        current.entries.insert(
            name.to_string(),
            LeafDeclaration {
                name: name.to_string(),
                pattern,
                default_value: default_value.trim().to_string(),
                documentation: documentation.to_string(),
            },
        );
        Ok(())
    }

    /// Finish building. Fails if a subsection was left open.
    pub fn finish(self) -> Result<SchemaTree> {
        if !self.path.is_empty() {
            return Err(ParamError::schema(
                display_path(&self.path),
                "subsection entered but never left",
            ));
        }
        Ok(SchemaTree::new(self.root))
    }

    fn current_mut(&mut self) -> Result<&mut SectionNode> {
        let mut node = &mut self.root;
        for name in &self.path {
            node = node
                .sections
                .get_mut(name)
                .ok_or_else(|| ParamError::undeclared(display_path(&self.path), name.clone()))?;
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_nested() {
        let mut prm = SchemaBuilder::new();
        prm.subsection("refinement", |prm| {
            prm.declare_entry("initial_global_cycles", "4", Pattern::unsigned(), "")?;
            prm.subsection("adaptive", |prm| {
                prm.declare_entry("refine_fraction", "0.3", Pattern::real(), "")
            })
        })
        .unwrap();
        let schema = prm.finish().unwrap();

        let leaf = schema.leaf(&["refinement", "adaptive"], "refine_fraction").unwrap();
        assert_eq!(leaf.default_value, "0.3");
        assert!(schema.leaf(&["refinement"], "refine_fraction").is_none());
        assert!(schema.section(&["adaptive"]).is_none());
    }

    #[test]
    fn test_bad_default_is_schema_violation() {
        let mut prm = SchemaBuilder::new();
        prm.enter_subsection("meta").unwrap();
        let err = prm
            .declare_entry("dim", "5", Pattern::integer_range(1, 3), "")
            .unwrap_err();
        assert!(matches!(err, ParamError::SchemaViolation { .. }));
    }

    #[test]
    fn test_name_collisions_are_rejected() {
        let mut prm = SchemaBuilder::new();
        prm.declare_entry("enabled", "false", Pattern::Boolean, "").unwrap();
        assert!(prm.declare_entry("enabled", "true", Pattern::Boolean, "").is_err());
        assert!(prm.enter_subsection("enabled").is_err());

        prm.subsection("adaptive", |_| Ok(())).unwrap();
        assert!(prm.declare_entry("adaptive", "0", Pattern::integer(), "").is_err());
    }

    #[test]
    fn test_unbalanced_sections() {
        let mut prm = SchemaBuilder::new();
        prm.enter_subsection("time").unwrap();
        assert!(matches!(
            prm.finish(),
            Err(ParamError::SchemaViolation { .. })
        ));

        let mut prm = SchemaBuilder::new();
        assert!(prm.leave_subsection().is_err());
    }

    #[test]
    fn test_reentering_a_section_extends_it() {
        let mut prm = SchemaBuilder::new();
        prm.subsection("output", |prm| {
            prm.declare_entry("write_solution_vtk", "true", Pattern::Boolean, "")
        })
        .unwrap();
        prm.subsection("output", |prm| {
            prm.declare_entry("write_solution_table", "false", Pattern::Boolean, "")
        })
        .unwrap();
        let schema = prm.finish().unwrap();
        assert_eq!(schema.section(&["output"]).unwrap().entries().count(), 2);
    }
}
