//! Error types for each stage of the pipeline.

use std::fmt;

/// An error produced while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token that cannot be accepted at the current position.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },
    /// A tag was opened with `{{` but the input ended before `}}`.
    MissingCloseTag,
    /// An `if` block was never terminated with `{{ endif }}`.
    MissingEndif,
    /// A `for` block was never terminated with `{{ endfor }}`.
    MissingEndfor,
    /// `elif`, `else`, `endif` or `endfor` appeared without an open block.
    BareCloser(String),
    /// Index access without a string key between `[` and `]`.
    MalformedIndexAccess,
    /// An `if` or `elif` tag without a condition.
    MalformedIf,
}

/// An error produced while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A variable is not present in the context.
    VariableNotFound(String),
    /// The sequence named by a `for` loop is not present in the context.
    IteratorNotFound(String),
    /// Index access on a map that does not contain the key.
    KeyNotFound { name: String, key: String },
    /// A bare-variable condition resolved to a non-boolean value.
    NotABool(String),
    /// The sequence named by a `for` loop is not a list.
    NotAList {
        name: String,
        found: &'static str,
    },
    /// Index access on a value that is not a map.
    CannotIndex {
        name: String,
        key: String,
        found: &'static str,
    },
    /// A numeric literal that cannot be parsed as a number.
    InvalidNumber(String),
    /// An operator was applied with too few operands on the stack.
    NotEnoughOperands,
    /// An expression finished evaluating with more than one value left over.
    UnevaluatedOperands(usize),
}

/// Any error that can occur while compiling or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    Render(RenderError),
    /// A context failed to serialize into a [`Value`][crate::Value].
    Serialize(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParseError::MissingCloseTag => write!(f, "missing '}}}}' to close tag"),
            ParseError::MissingEndif => {
                write!(f, "expected '{{{{ endif }}}}' to close if block")
            }
            ParseError::MissingEndfor => {
                write!(f, "expected '{{{{ endfor }}}}' to close for block")
            }
            ParseError::BareCloser(keyword) => {
                write!(f, "'{}' without a matching 'if' or 'for' block", keyword)
            }
            ParseError::MalformedIndexAccess => {
                write!(f, "expected string key between '[' and ']'")
            }
            ParseError::MalformedIf => write!(f, "expected condition after 'if'"),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::VariableNotFound(name) => {
                write!(f, "variable '{}' not found in context", name)
            }
            RenderError::IteratorNotFound(name) => {
                write!(f, "iterator variable '{}' not found in context", name)
            }
            RenderError::KeyNotFound { name, key } => {
                write!(f, "key '{}' not found in '{}'", key, name)
            }
            RenderError::NotABool(name) => {
                write!(f, "condition variable '{}' is not a boolean", name)
            }
            RenderError::NotAList { name, found } => {
                write!(f, "iterator '{}' must be a list, got {}", name, found)
            }
            RenderError::CannotIndex { name, key, found } => {
                write!(f, "cannot index {} '{}' with '{}'", found, name, key)
            }
            RenderError::InvalidNumber(lexeme) => {
                write!(f, "invalid number literal: {}", lexeme)
            }
            RenderError::NotEnoughOperands => {
                write!(f, "invalid expression: not enough operands")
            }
            RenderError::UnevaluatedOperands(count) => {
                write!(
                    f,
                    "invalid expression: expected 1 final result, got {}",
                    count
                )
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => fmt::Display::fmt(err, f),
            Error::Render(err) => fmt::Display::fmt(err, f),
            Error::Serialize(msg) => fmt::Display::fmt(msg, f),
        }
    }
}

impl std::error::Error for ParseError {}

impl std::error::Error for RenderError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Serialize(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Serialize(msg.to_string())
    }
}
