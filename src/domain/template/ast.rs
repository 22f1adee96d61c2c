// Abstract Syntax Tree types for URI templates

use std::fmt;
use std::str::FromStr;

use super::error::{ExpansionError, ExtractionError, ParseError};
use super::expander;
use super::extractor::{self, ExtractOptions};
use super::operators::Operator;
use super::parser::TemplateParser;
use super::value::VariableValues;

/// A parsed URI template: the raw source plus its ordered parts.
///
/// Immutable once built; `expand` and `extract` only borrow it, so a single
/// template can be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    pub(crate) fn new(source: String, parts: Vec<Part>) -> Self {
        Self { source, parts }
    }

    pub fn parse(template: &str) -> Result<Self, ParseError> {
        TemplateParser::parse(template)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get all variable specs in this template, in template order
    pub fn variables(&self) -> Vec<&VarSpec> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Expression(expr) => Some(expr.vars.iter()),
                Part::Literal(_) => None,
            })
            .flatten()
            .collect()
    }

    /// Distinct variable names, first occurrence wins the position
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for var in self.variables() {
            if !names.contains(&var.name.as_str()) {
                names.push(&var.name);
            }
        }
        names
    }

    pub fn expand(&self, values: &VariableValues) -> Result<String, ExpansionError> {
        expander::expand(self, values)
    }

    /// Best-effort inverse of [`Template::expand`]. See [`extractor`] for the
    /// matching rules and their limits.
    pub fn extract(&self, uri: &str) -> Result<VariableValues, ExtractionError> {
        extractor::extract(self, uri, &ExtractOptions::default())
    }

    pub fn extract_with(
        &self,
        uri: &str,
        options: &ExtractOptions,
    ) -> Result<VariableValues, ExtractionError> {
        extractor::extract(self, uri, options)
    }
}

impl FromStr for Template {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A template consists of literal text runs and `{...}` expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Literal(String),
    Expression(Expression),
}

impl Part {
    /// The template text this part was parsed from
    pub fn source(&self) -> &str {
        match self {
            Part::Literal(text) => text,
            Part::Expression(expr) => &expr.source,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

/// One `{...}` expression: an operator and its comma-separated variables
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub operator: Operator,
    pub vars: Vec<VarSpec>,
    source: String,
}

impl Expression {
    pub fn new(operator: Operator, vars: Vec<VarSpec>) -> Self {
        let source = render_source(operator, &vars);
        Self {
            operator,
            vars,
            source,
        }
    }

    pub(crate) fn with_source(mut self, source: String) -> Self {
        self.source = source;
        self
    }

    /// The `{...}` source text, braces included
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_query(&self) -> bool {
        matches!(self.operator, Operator::Query | Operator::QueryContinuation)
    }
}

fn render_source(operator: Operator, vars: &[VarSpec]) -> String {
    let mut out = String::from("{");
    if let Some(ch) = operator.as_char() {
        out.push(ch);
    }
    let specs: Vec<String> = vars.iter().map(|v| v.to_string()).collect();
    out.push_str(&specs.join(","));
    out.push('}');
    out
}

/// A variable reference with an optional modifier
#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub name: String,
    pub modifier: Option<Modifier>,
}

impl VarSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn is_explode(&self) -> bool {
        matches!(self.modifier, Some(Modifier::Explode))
    }

    pub fn prefix(&self) -> Option<usize> {
        match self.modifier {
            Some(Modifier::Prefix(count)) => Some(count),
            _ => None,
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        match &self.modifier {
            Some(Modifier::Default(value)) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.modifier {
            Some(Modifier::Prefix(count)) => write!(f, ":{}", count),
            Some(Modifier::Explode) => f.write_str("*"),
            Some(Modifier::Default(value)) => write!(f, "|{}", value),
            None => Ok(()),
        }
    }
}

/// Variable modifiers.
///
/// `Default` is not part of RFC 6570; it supplies a value for absent variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Prefix(usize),
    Explode,
    Default(String),
}
