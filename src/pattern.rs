//! Value patterns attached to every declared parameter.
//!
//! A [`Pattern`] checks the *text* of a value; it never converts it. The
//! typed conversion happens later in [`crate::params`], using the same
//! splitting rule ([`split_list`]) so that anything a pattern accepts also
//! binds.

use std::fmt;

/// The shape a parameter value must have.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A base-10 integer, optionally bounded on either side (inclusive)
    IntegerRange { min: Option<i64>, max: Option<i64> },
    /// A finite floating-point literal, optionally bounded on either side (inclusive)
    RealRange { min: Option<f64>, max: Option<f64> },
    /// Exactly one of a fixed set of words (case-sensitive)
    Selection(Vec<String>),
    /// Comma-separated list whose elements all match the inner pattern
    ListOf(Box<Pattern>),
    /// The literal `true` or `false`
    Boolean,
    /// Any single-line text the file grammar can carry back: no `#`, no line
    /// breaks and no trailing `\`. Used for leaves owned by a function sub-scope.
    Anything,
}

impl Pattern {
    /// Unbounded integer.
    pub fn integer() -> Self {
        Self::IntegerRange {
            min: None,
            max: None,
        }
    }

    /// Integer in `min..=max`.
    pub fn integer_range(min: i64, max: i64) -> Self {
        Self::IntegerRange {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Integer that fits an unsigned 32-bit record field.
    pub fn unsigned() -> Self {
        Self::integer_range(0, i64::from(u32::MAX))
    }

    /// Unbounded real.
    pub fn real() -> Self {
        Self::RealRange {
            min: None,
            max: None,
        }
    }

    /// Real no smaller than `min`.
    pub fn real_min(min: f64) -> Self {
        Self::RealRange {
            min: Some(min),
            max: None,
        }
    }

    /// Selection from a `|`-separated list of words, e.g. `"parsed | interpolate_old_field"`.
    pub fn selection(choices: &str) -> Self {
        Self::Selection(
            choices
                .split('|')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// List of values matching `element`.
    pub fn list(element: Pattern) -> Self {
        Self::ListOf(Box::new(element))
    }

    /// Check whether `text` matches this pattern.
    pub fn validate(&self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Self::IntegerRange { min, max } => match text.parse::<i64>() {
                Ok(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
                Err(_) => false,
            },
            Self::RealRange { min, max } => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => {
                    min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m)
                }
                _ => false,
            },
            Self::Selection(choices) => choices.iter().any(|c| c == text),
            Self::ListOf(element) => split_list(text).all(|item| element.validate(item)),
            Self::Boolean => text == "true" || text == "false",
            Self::Anything => {
                !text.contains(|c: char| matches!(c, '#' | '\n' | '\r')) && !text.ends_with('\\')
            }
        }
    }

    /// Human-readable description, used in error messages and echo comments.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerRange { min: None, max: None } => write!(f, "[Integer]"),
            Self::IntegerRange { min, max } => {
                let min = min.map_or("MIN_INT".to_string(), |m| m.to_string());
                let max = max.map_or("MAX_INT".to_string(), |m| m.to_string());
                write!(f, "[Integer range {min}...{max} (inclusive)]")
            }
            Self::RealRange { min: None, max: None } => write!(f, "[Double]"),
            Self::RealRange { min, max } => {
                let min = min.map_or("-MAX_DOUBLE".to_string(), |m| m.to_string());
                let max = max.map_or("MAX_DOUBLE".to_string(), |m| m.to_string());
                write!(f, "[Double {min}...{max} (inclusive)]")
            }
            Self::Selection(choices) => write!(f, "[Selection {} ]", choices.join("|")),
            Self::ListOf(element) => write!(f, "[List of <{element}>]"),
            Self::Boolean => write!(f, "[Bool]"),
            Self::Anything => write!(f, "[Anything]"),
        }
    }
}

/// Split a list value into its trimmed elements.
///
/// Blank text is the empty list. Any other text yields one element per
/// comma, so `"1,,2"` and `"1,"` contain an empty element.
pub fn split_list(text: &str) -> impl Iterator<Item = &str> {
    let text = text.trim();
    let mut items = text.split(',').map(str::trim);
    if text.is_empty() {
        items.next();
    }
    items
}
