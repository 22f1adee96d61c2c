// Error types for parsing, expanding and extracting templates

use std::fmt;

use super::extractor::Shape;

/// Malformed template source
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub template: String,
    /// Byte offset of the offending brace or expression
    pub position: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnmatchedOpenBrace,
    UnmatchedCloseBrace,
    EmptyExpression,
    InvalidVariableName(String),
    InvalidPrefix(String),
    InvalidDefaultValue(String),
}

impl ParseError {
    pub(crate) fn new(template: &str, position: usize, kind: ParseErrorKind) -> Self {
        Self {
            template: template.to_string(),
            position,
            kind,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnmatchedOpenBrace => write!(f, "unmatched '{{'"),
            ParseErrorKind::UnmatchedCloseBrace => write!(f, "unmatched '}}'"),
            ParseErrorKind::EmptyExpression => write!(f, "empty expression"),
            ParseErrorKind::InvalidVariableName(name) => {
                write!(f, "invalid variable name '{}'", name)
            }
            ParseErrorKind::InvalidPrefix(spec) => {
                write!(f, "prefix length is not a number in '{}'", spec)
            }
            ParseErrorKind::InvalidDefaultValue(value) => {
                write!(f, "invalid default value '{}'", value)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error parsing template '{}' at position {}: {}",
            self.template, self.position, self.kind
        )
    }
}

impl std::error::Error for ParseError {}

/// A binding that cannot be expanded
#[derive(Debug, Clone, PartialEq)]
pub enum ExpansionError {
    /// `{name:N}` bound to a list or map
    PrefixOnComposite { name: String },
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionError::PrefixOnComposite { name } => write!(
                f,
                "Invalid expression: prefix modifier not applicable to composite variable '{}'",
                name
            ),
        }
    }
}

impl std::error::Error for ExpansionError {}

/// A URI that does not match the template
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionError {
    pub template: String,
    pub uri: String,
    /// Index and source text of the part being matched, if any
    pub part: Option<(usize, String)>,
    /// How far into the URI matching got
    pub consumed: usize,
    pub kind: ExtractionErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionErrorKind {
    LiteralMismatch { expected: String },
    BoundaryNotFound { literal: String },
    PrefixMismatch { expected: String },
    MissingVariable { name: String },
    UnexpectedParameter { name: String },
    ShapeMismatch { name: String, expected: Shape },
    InvalidEncoding { value: String },
    TrailingInput { remaining: String },
}

impl ExtractionError {
    /// The part of the URI matched before the failure
    pub fn consumed_uri(&self) -> &str {
        self.uri.get(..self.consumed).unwrap_or(&self.uri)
    }
}

impl fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionErrorKind::LiteralMismatch { expected } => {
                write!(f, "expected literal '{}'", expected)
            }
            ExtractionErrorKind::BoundaryNotFound { literal } => {
                write!(f, "could not find following literal '{}'", literal)
            }
            ExtractionErrorKind::PrefixMismatch { expected } => {
                write!(f, "expected expression to start with '{}'", expected)
            }
            ExtractionErrorKind::MissingVariable { name } => {
                write!(f, "required variable '{}' not present", name)
            }
            ExtractionErrorKind::UnexpectedParameter { name } => {
                write!(f, "unexpected parameter '{}'", name)
            }
            ExtractionErrorKind::ShapeMismatch { name, expected } => {
                write!(f, "value of '{}' cannot be read as {}", name, expected)
            }
            ExtractionErrorKind::InvalidEncoding { value } => {
                write!(f, "'{}' does not decode to UTF-8", value)
            }
            ExtractionErrorKind::TrailingInput { remaining } => {
                write!(f, "unmatched trailing input '{}'", remaining)
            }
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not match template {} to {}", self.template, self.uri)?;
        if let Some((index, source)) = &self.part {
            write!(f, " at part {} ({})", index, source)?;
        }
        write!(
            f,
            ": {}. Got as far as: {}",
            self.kind,
            self.consumed_uri()
        )
    }
}

impl std::error::Error for ExtractionError {}
