//! Parser for the parameter file format.
//!
//! The format is line-oriented and human-editable. It is also the format the
//! echo file is written in, so every echo file is valid input.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { line }
//! line        = comment | subsection | end | assignment | empty
//! comment     = '#' { any_char }
//! subsection  = "subsection" name
//! end         = "end"
//! assignment  = ["set"] key '=' value
//!
//! key         = any text up to the first '=' (may contain spaces)
//! value       = any text after the first '=' up to a comment
//! ```
//!
//! A line ending in `\` continues on the next line. Lists are comma-separated
//! and booleans are the literal tokens `true` and `false`; interpreting values
//! is left to the declared patterns.
//!
//! # Example
//!
//! ```text
//! # Heat flux around a cylinder
//! subsection geometry
//!   set grid_name = cylinder
//!   set sizes     = 0.5, 2.5, 3.0
//! end
//!
//! subsection refinement
//!   subsection adaptive
//!     set max_cells = 5000
//!   end
//! end
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::{ParamError, Result};

/// Parse a parameter file string, returning the AST of everything that
/// parsed together with every syntax problem.
pub fn parse_collecting(input: &str) -> (ParameterAst, Vec<ParamError>) {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let ast = parser.parse();
    (ast, parser.into_errors())
}

/// Read a parameter file from disk.
pub fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ParamError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}
