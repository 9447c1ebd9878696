//! Abstract Syntax Tree types for parameter files.

/// A parsed parameter file: the entries of the unnamed root block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterAst {
    /// Top-level entries in input order
    pub entries: Vec<Entry>,
}

impl ParameterAst {
    /// Create an empty AST (the all-defaults input).
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of assignments, at any depth.
    pub fn assignment_count(&self) -> usize {
        fn count(entries: &[Entry]) -> usize {
            entries
                .iter()
                .map(|entry| match entry {
                    Entry::Assignment(_) => 1,
                    Entry::Subsection(section) => count(&section.entries),
                })
                .sum()
        }
        count(&self.entries)
    }
}

/// One item inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key = value`
    Assignment(Assignment),
    /// `subsection name ... end`
    Subsection(Subsection),
}

/// A `key = value` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Parameter name
    pub key: String,
    /// Value text, trimmed
    pub value: String,
    /// Source line number for error reporting
    pub line: usize,
}

/// A `subsection <name>` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsection {
    /// Section name
    pub name: String,
    /// Entries inside the block, in input order
    pub entries: Vec<Entry>,
    /// Line of the opening `subsection`
    pub line: usize,
}
