//! Analytic function sub-scopes.
//!
//! Three sections of the parameter tree (`source_function`,
//! `initial_values.parsed_function` and `verification.exact_solution_function`)
//! belong to a function collaborator rather than to this crate. The
//! collaborator declares its own leaves into the sub-scope and later binds
//! them from the resolved values; see [`FunctionParameters`].
//!
//! [`ParsedFunction`] is the collaborator shipped with the crate. It captures
//! the textual description of a vector-valued function (variable names, one
//! expression per component, named constants). Evaluating the expressions is
//! left to the solver.

use crate::error::{ParamError, Result};
use crate::pattern::{split_list, Pattern};
use crate::schema::{display_path, SchemaBuilder};
use crate::store::{ParameterStore, SectionView};

/// A collaborator that owns the contents of a function sub-scope.
pub trait FunctionParameters {
    /// Declare this function's leaves into the builder's current section.
    fn declare_parameters(&self, prm: &mut SchemaBuilder) -> Result<()>;

    /// Bind this function from its resolved section.
    fn parse_parameters(&mut self, section: &SectionView<'_>) -> Result<()>;
}

/// The three function sub-scopes of the parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHandles<F> {
    /// `source_function`
    pub source: F,
    /// `initial_values.parsed_function`
    pub initial_values: F,
    /// `verification.exact_solution_function`
    pub exact_solution: F,
}

impl FunctionHandles<ParsedFunction> {
    /// Parsed functions with `dim + 2` components each.
    pub fn parsed(dim: u32) -> Self {
        let n_components = dim as usize + 2;
        Self {
            source: ParsedFunction::new(dim, n_components),
            initial_values: ParsedFunction::new(dim, n_components),
            exact_solution: ParsedFunction::new(dim, n_components),
        }
    }
}

impl<F: FunctionParameters> FunctionHandles<F> {
    /// Bind every function from its sub-scope of `store`.
    pub fn parse_parameters(&mut self, store: &ParameterStore) -> Result<()> {
        self.source.parse_parameters(&store.view(&["source_function"])?)?;
        self.initial_values
            .parse_parameters(&store.view(&["initial_values", "parsed_function"])?)?;
        self.exact_solution
            .parse_parameters(&store.view(&["verification", "exact_solution_function"])?)
    }
}

const VARIABLE_NAMES: &str = "Variable names";
const EXPRESSION: &str = "Function expression";
const CONSTANTS: &str = "Function constants";

/// Textual description of a vector-valued function of space and time.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFunction {
    dim: u32,
    n_components: usize,
    /// Independent variables, spatial first, optionally followed by time
    pub variable_names: Vec<String>,
    /// One expression per component
    pub expressions: Vec<String>,
    /// Named constants usable inside the expressions
    pub constants: Vec<(String, f64)>,
}

impl ParsedFunction {
    /// An all-zero function of `dim` spatial variables and time.
    pub fn new(dim: u32, n_components: usize) -> Self {
        Self {
            dim,
            n_components,
            variable_names: default_variable_names(dim),
            expressions: vec!["0".to_string(); n_components],
            constants: Vec::new(),
        }
    }

    /// Number of vector components.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Whether the last variable is time.
    pub fn is_time_dependent(&self) -> bool {
        self.variable_names.len() == self.dim as usize + 1
    }

    fn invalid(section: &SectionView<'_>, key: &str, value: &str, expected: String) -> ParamError {
        ParamError::InvalidValue {
            path: display_path(section.path()),
            key: key.to_string(),
            value: value.to_string(),
            pattern: expected,
            line: None,
        }
    }
}

impl FunctionParameters for ParsedFunction {
    fn declare_parameters(&self, prm: &mut SchemaBuilder) -> Result<()> {
        prm.declare_entry(
            VARIABLE_NAMES,
            &default_variable_names(self.dim).join(","),
            Pattern::Anything,
            "The names of the variables as they will be used in the function, \
             separated by commas. The last one is time if there is one more \
             name than spatial dimensions.",
        )?;
        prm.declare_entry(
            EXPRESSION,
            &vec!["0"; self.n_components].join("; "),
            Pattern::Anything,
            "Expressions for each component of the function, separated by semicolons.",
        )?;
        prm.declare_entry(
            CONSTANTS,
            "",
            Pattern::Anything,
            "Constants used in the expressions, as a comma-separated list of name=value pairs.",
        )
    }

    fn parse_parameters(&mut self, section: &SectionView<'_>) -> Result<()> {
        let names = section.get(VARIABLE_NAMES)?;
        let variable_names: Vec<String> = split_list(names).map(str::to_string).collect();
        let dim = self.dim as usize;
        if (variable_names.len() != dim && variable_names.len() != dim + 1)
            || variable_names.iter().any(String::is_empty)
        {
            return Err(Self::invalid(
                section,
                VARIABLE_NAMES,
                names,
                format!("{dim} or {} variable names", dim + 1),
            ));
        }

        let expression = section.get(EXPRESSION)?;
        let expressions: Vec<String> = expression
            .split(';')
            .map(|e| e.trim().to_string())
            .collect();
        if expressions.len() != self.n_components || expressions.iter().any(String::is_empty) {
            return Err(Self::invalid(
                section,
                EXPRESSION,
                expression,
                format!("{} expressions separated by ';'", self.n_components),
            ));
        }

        let text = section.get(CONSTANTS)?;
        let mut constants = Vec::new();
        for item in split_list(text) {
            let constant = item
                .split_once('=')
                .and_then(|(name, value)| {
                    let value = value.trim().parse::<f64>().ok()?;
                    Some((name.trim().to_string(), value))
                })
                .filter(|(name, _)| !name.is_empty());
            match constant {
                Some(constant) => constants.push(constant),
                None => {
                    return Err(Self::invalid(
                        section,
                        CONSTANTS,
                        text,
                        "comma-separated name=value pairs".to_string(),
                    ))
                }
            }
        }

        self.variable_names = variable_names;
        self.expressions = expressions;
        self.constants = constants;
        Ok(())
    }
}

fn default_variable_names(dim: u32) -> Vec<String> {
    ["x", "y", "z"]
        .iter()
        .take(dim as usize)
        .chain(std::iter::once(&"t"))
        .map(|v| v.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function_store(dim: u32) -> ParameterStore {
        let function = ParsedFunction::new(dim, dim as usize + 2);
        let mut prm = SchemaBuilder::new();
        prm.subsection("source_function", |prm| function.declare_parameters(prm))
            .unwrap();
        ParameterStore::new(prm.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_by_dimension() {
        let store = function_store(2);
        assert_eq!(store.get(&["source_function"], VARIABLE_NAMES).unwrap(), "x,y,t");
        assert_eq!(store.get(&["source_function"], EXPRESSION).unwrap(), "0; 0; 0; 0");
        assert_eq!(store.get(&["source_function"], CONSTANTS).unwrap(), "");

        let store = function_store(3);
        assert_eq!(store.get(&["source_function"], VARIABLE_NAMES).unwrap(), "x,y,z,t");
    }

    #[test]
    fn test_parse_overlaid_values() {
        let mut store = function_store(1);
        store
            .set(&["source_function"], EXPRESSION, "sin(pi*x); 0; a*t")
            .unwrap();
        store
            .set(&["source_function"], CONSTANTS, "pi=3.14159, a = 2")
            .unwrap();

        let mut function = ParsedFunction::new(1, 3);
        function
            .parse_parameters(&store.view(&["source_function"]).unwrap())
            .unwrap();
        assert_eq!(function.expressions, vec!["sin(pi*x)", "0", "a*t"]);
        assert_eq!(function.constants.len(), 2);
        assert_eq!(function.constants[1], ("a".to_string(), 2.0));
        assert!(function.is_time_dependent());
    }

    #[test]
    fn test_component_count_must_match() {
        let mut store = function_store(2);
        store.set(&["source_function"], EXPRESSION, "0; 0").unwrap();

        let mut function = ParsedFunction::new(2, 4);
        let err = function
            .parse_parameters(&store.view(&["source_function"]).unwrap())
            .unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { ref key, .. } if key == EXPRESSION));
    }

    #[test]
    fn test_bad_constants_are_rejected() {
        let mut store = function_store(2);
        store.set(&["source_function"], CONSTANTS, "a=one").unwrap();

        let mut function = ParsedFunction::new(2, 4);
        assert!(function
            .parse_parameters(&store.view(&["source_function"]).unwrap())
            .is_err());
    }
}
