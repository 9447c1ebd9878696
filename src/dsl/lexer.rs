//! Line-oriented lexer for parameter files.

use crate::error::{ParamError, Result};

/// A token produced by the lexer. Each token is one logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Line number of the first physical line (1-indexed)
    pub line: usize,
}

/// Token types in a parameter file.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `subsection <name>`
    Subsection(String),
    /// `end`
    End,
    /// `[set] <key> = <value>`
    Assignment { key: String, value: String },
    /// End of input
    Eof,
}

/// Lexer for tokenizing parameter file input.
///
/// Comments start at `#` and run to the end of the line. A line ending in
/// `\` continues on the next line. Blank lines are skipped.
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            line: 0,
        }
    }

    /// Get the next token.
    ///
    /// A malformed line is reported as an error; lexing can continue with
    /// the following line.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some((index, raw)) = self.lines.next() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                });
            };
            let line = index + 1;
            self.line = line;

            let mut text = strip_comment(raw).trim().to_string();
            while let Some(head) = text.strip_suffix('\\') {
                let head = head.trim_end().to_string();
                match self.lines.next() {
                    Some((index, next)) => {
                        self.line = index + 1;
                        let next = strip_comment(next).trim();
                        text = if next.is_empty() {
                            head
                        } else {
                            format!("{head} {next}")
                        };
                    }
                    None => {
                        text = head;
                        break;
                    }
                }
            }

            if text.is_empty() {
                continue;
            }
            return classify(&text, line).map(|kind| Token { kind, line });
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn classify(text: &str, line: usize) -> Result<TokenKind> {
    if text == "end" {
        return Ok(TokenKind::End);
    }
    if text == "subsection" {
        return Err(ParamError::malformed(line, "'subsection' without a name"));
    }
    if let Some(name) = keyword_rest(text, "subsection") {
        if name.starts_with('=') {
            return Err(ParamError::malformed(
                line,
                "'subsection' is a keyword and cannot be assigned",
            ));
        }
        return Ok(TokenKind::Subsection(name.to_string()));
    }

    let assignment = keyword_rest(text, "set").unwrap_or(text);
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(TokenKind::Assignment {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        }),
        Some(_) => Err(ParamError::malformed(line, "missing parameter name before '='")),
        None => Err(ParamError::malformed(
            line,
            format!("expected '<key> = <value>', 'subsection <name>' or 'end', got '{text}'"),
        )),
    }
}

/// The remainder of `text` after a leading keyword followed by whitespace.
fn keyword_rest<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
