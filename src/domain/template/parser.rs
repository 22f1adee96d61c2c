// Template parser: a single scan over literal runs and `{...}` expressions

use super::ast::{Expression, Modifier, Part, Template, VarSpec};
use super::error::{ParseError, ParseErrorKind};
use super::operators::Operator;

const ILLEGAL_IN_DEFAULT: &[char] = &['/', '.', ';', '?', '&', '#', '|', '*', ':', '{', '}', '='];

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn parse(template: &'a str) -> Result<Template, ParseError> {
        let mut parser = Self {
            input: template,
            pos: 0,
        };
        parser.parse_template()
    }

    fn parse_template(&mut self) -> Result<Template, ParseError> {
        let mut parts = Vec::new();

        while self.pos < self.input.len() {
            match self.input[self.pos..].find('{') {
                Some(0) => {
                    let expr = self.parse_expression()?;
                    parts.push(Part::Expression(expr));
                }
                Some(offset) => {
                    let literal = self.parse_literal(self.pos + offset)?;
                    parts.push(literal);
                }
                None => {
                    let literal = self.parse_literal(self.input.len())?;
                    parts.push(literal);
                }
            }
        }

        Ok(Template::new(self.input.to_string(), parts))
    }

    fn parse_literal(&mut self, end: usize) -> Result<Part, ParseError> {
        let literal = &self.input[self.pos..end];
        if let Some(offset) = literal.find('}') {
            return Err(self.error(self.pos + offset, ParseErrorKind::UnmatchedCloseBrace));
        }
        self.pos = end;
        Ok(Part::Literal(literal.to_string()))
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.pos;
        let close = self.input[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| self.error(start, ParseErrorKind::UnmatchedOpenBrace))?;

        let body = &self.input[start + 1..close];
        if body.is_empty() {
            return Err(self.error(start, ParseErrorKind::EmptyExpression));
        }

        // Operator characters are all ASCII, so slicing off one byte is safe
        let (operator, specs) = match body.chars().next().and_then(Operator::from_char) {
            Some(op) => (op, &body[1..]),
            None => (Operator::Simple, body),
        };

        let vars = specs
            .split(',')
            .map(|spec| self.parse_var_spec(spec, start))
            .collect::<Result<Vec<_>, _>>()?;

        self.pos = close + 1;

        Ok(Expression::new(operator, vars).with_source(self.input[start..=close].to_string()))
    }

    fn parse_var_spec(&self, spec: &str, position: usize) -> Result<VarSpec, ParseError> {
        // name:N
        if let Some((name, count)) = spec.split_once(':') {
            if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(self.error(position, ParseErrorKind::InvalidPrefix(spec.to_string())));
            }
            let count = count
                .parse::<usize>()
                .map_err(|_| self.error(position, ParseErrorKind::InvalidPrefix(spec.to_string())))?;
            let name = self.validate_name(name, position)?;
            return Ok(VarSpec::new(name).with_modifier(Modifier::Prefix(count)));
        }

        // name*
        if let Some(name) = spec.strip_suffix('*') {
            let name = self.validate_name(name, position)?;
            return Ok(VarSpec::new(name).with_modifier(Modifier::Explode));
        }

        // name|default
        if let Some((name, default)) = spec.split_once('|').filter(|(_, d)| !d.is_empty()) {
            let name = self.validate_name(name, position)?;
            if default.contains(ILLEGAL_IN_DEFAULT) {
                return Err(self.error(
                    position,
                    ParseErrorKind::InvalidDefaultValue(default.to_string()),
                ));
            }
            return Ok(VarSpec::new(name).with_modifier(Modifier::Default(default.to_string())));
        }

        let name = self.validate_name(spec, position)?;
        Ok(VarSpec::new(name))
    }

    /// `[0-9A-Za-z_%]+(\.[0-9A-Za-z_%]+)*`
    fn validate_name<'s>(&self, name: &'s str, position: usize) -> Result<&'s str, ParseError> {
        let valid = name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '%')
        });

        if valid {
            Ok(name)
        } else {
            Err(self.error(position, ParseErrorKind::InvalidVariableName(name.to_string())))
        }
    }

    fn error(&self, position: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.input, position, kind)
    }
}
