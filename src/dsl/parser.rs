//! Parser for parameter files.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::ParamError;

/// Parser for the nested block grammar.
///
/// The parser does not stop at the first problem: malformed lines and
/// unbalanced blocks are collected and the rest of the input is still
/// parsed, so one pass reports every syntax problem.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    errors: Vec<ParamError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            errors: Vec::new(),
        }
    }

    /// Parse the entire input.
    pub fn parse(&mut self) -> ParameterAst {
        let mut entries = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::End => self.errors.push(ParamError::malformed(
                    token.line,
                    "'end' without a matching 'subsection'",
                )),
                TokenKind::Subsection(name) => {
                    entries.push(Entry::Subsection(self.parse_subsection(name, token.line)));
                }
                TokenKind::Assignment { key, value } => entries.push(Entry::Assignment(Assignment {
                    key,
                    value,
                    line: token.line,
                })),
            }
        }
        ParameterAst { entries }
    }

    /// Consume the parser, returning its syntax problems.
    pub fn into_errors(self) -> Vec<ParamError> {
        self.errors
    }

    fn parse_subsection(&mut self, name: String, line: usize) -> Subsection {
        let mut entries = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::End => break,
                TokenKind::Eof => {
                    self.errors.push(ParamError::malformed(
                        line,
                        format!("subsection '{name}' is never closed with 'end'"),
                    ));
                    break;
                }
                TokenKind::Subsection(child) => {
                    entries.push(Entry::Subsection(self.parse_subsection(child, token.line)));
                }
                TokenKind::Assignment { key, value } => entries.push(Entry::Assignment(Assignment {
                    key,
                    value,
                    line: token.line,
                })),
            }
        }
        Subsection {
            name,
            entries,
            line,
        }
    }

    /// Next well-formed token, recording malformed lines along the way.
    fn next(&mut self) -> Token {
        loop {
            match self.lexer.next_token() {
                Ok(token) => return token,
                Err(err) => self.errors.push(err),
            }
        }
    }
}
