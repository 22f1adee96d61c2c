// Template extraction: recovering variable bindings from a concrete URI

//! Extraction is the best-effort inverse of expansion. RFC 6570 only defines
//! expansion, so this is a single forward pass over the URI with no
//! backtracking.
//!
//! Literals must match at the cursor. A path-style expression (any operator
//! except `?` and `&`) claims the text up to the next literal of the
//! template, the next expression's prefix character, or the end of the path,
//! and splits what it claimed on the operator's separator. Simple, label and
//! path-parameter values stop at a `/` unless they belong to the template's
//! last part, which takes the rest of the path. `?` and `&` expressions look
//! their variables up by name in the decoded query string, so parameters may
//! arrive in any order and unknown ones are ignored.
//!
//! The first boundary that fits is taken even if a later one would have let
//! the rest of the template match. Two adjacent expressions with nothing
//! between them (`{a}{b}`) are ambiguous: the first one takes everything.
//! Whether a comma-joined value was a scalar, a list or a flattened map cannot
//! be told from the URI alone; pass a [`Shape`] hint in [`ExtractOptions`]
//! when it matters.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::string::FromUtf8Error;
use tracing::trace;

use super::ast::{Expression, Part, Template, VarSpec};
use super::encoding::{decode, decode_form, QueryParameters};
use super::error::{ExtractionError, ExtractionErrorKind};
use super::operators::Operator;
use super::value::{Scalar, VariableValue, VariableValues};

type Decoder = fn(&str) -> Result<String, FromUtf8Error>;

/// Expected shape of an extracted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    List,
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::List => write!(f, "list"),
            Shape::Map => write!(f, "map"),
        }
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Shape::Scalar),
            "list" => Ok(Shape::List),
            "map" => Ok(Shape::Map),
            other => Err(format!(
                "unknown shape '{}', expected scalar, list or map",
                other
            )),
        }
    }
}

/// Per-call extraction hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    /// Expected shape per variable name
    pub shapes: HashMap<String, Shape>,
    /// Names that must be bound once extraction finishes
    pub required: HashSet<String>,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.shapes.insert(name.into(), shape);
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    pub fn shape(&self, name: &str) -> Option<Shape> {
        self.shapes.get(name).copied()
    }
}

/// Match `uri` against `template` and return the bound variables.
///
/// Unbound variables are left out of the result unless they carry a
/// `|default`. Query parameters the template does not mention are ignored.
pub fn extract(
    template: &Template,
    uri: &str,
    options: &ExtractOptions,
) -> Result<VariableValues, ExtractionError> {
    let mut scan = Scan::new(template, uri, options);
    let parts = template.parts();

    for (index, part) in parts.iter().enumerate() {
        scan.part = Some(index);
        match part {
            Part::Literal(text) => scan.literal(text)?,
            Part::Expression(expr) if expr.is_query() => scan.query(expr)?,
            Part::Expression(expr) => {
                let end = scan.boundary(expr, parts.get(index + 1))?;
                scan.positional(expr, end)?;
            }
        }
        scan.bind_defaults(part);
    }

    scan.part = None;
    scan.finish()
}

struct Scan<'a> {
    template: &'a Template,
    uri: &'a str,
    options: &'a ExtractOptions,
    cursor: usize,
    /// First `?` or `#`, or the end of the URI
    path_end: usize,
    /// `#` after the query, or the end of the URI
    query_end: usize,
    query: QueryParameters,
    /// Query keys named by a query expression or a literal of the template
    claimed: HashSet<String>,
    values: VariableValues,
    /// Names currently bound from a `:N` variable
    truncated: HashSet<String>,
    part: Option<usize>,
}

impl<'a> Scan<'a> {
    fn new(template: &'a Template, uri: &'a str, options: &'a ExtractOptions) -> Self {
        let path_end = uri.find(&['?', '#'][..]).unwrap_or(uri.len());
        let (query, query_end) = match uri[path_end..].strip_prefix('?') {
            Some(rest) => {
                let len = rest.find('#').unwrap_or(rest.len());
                (QueryParameters::parse(&rest[..len]), path_end + 1 + len)
            }
            None => (QueryParameters::default(), path_end),
        };

        Self {
            template,
            uri,
            options,
            cursor: 0,
            path_end,
            query_end,
            query,
            claimed: claimed_query_keys(template),
            values: VariableValues::new(),
            truncated: HashSet::new(),
            part: None,
        }
    }

    fn error(&self, kind: ExtractionErrorKind) -> ExtractionError {
        ExtractionError {
            template: self.template.as_str().to_string(),
            uri: self.uri.to_string(),
            part: self.part.and_then(|index| {
                self.template
                    .parts()
                    .get(index)
                    .map(|part| (index, part.source().to_string()))
            }),
            consumed: self.cursor,
            kind,
        }
    }

    fn literal(&mut self, text: &str) -> Result<(), ExtractionError> {
        if self.uri[self.cursor..].starts_with(text) {
            self.cursor += text.len();
            Ok(())
        } else {
            Err(self.error(ExtractionErrorKind::LiteralMismatch {
                expected: text.to_string(),
            }))
        }
    }

    /// Furthest a path-style expression may reach from the cursor
    fn limit(&self, operator: Operator) -> usize {
        let at_fragment = self.cursor == self.path_end
            && operator == Operator::Fragment
            && self.uri[self.cursor..].starts_with('#');

        if self.cursor > self.path_end || at_fragment {
            self.uri.len()
        } else {
            self.path_end
        }
    }

    /// End of the text claimed by `expr`, judged from the part after it
    fn boundary(&self, expr: &Expression, next: Option<&Part>) -> Result<usize, ExtractionError> {
        let uri = self.uri;
        let limit = self.limit(expr.operator);
        let own_prefix = expr.operator.descriptor().prefix;

        // Look past our own prefix so `{/a}/b` reads "/x/b" as a = "x"
        let start = if !own_prefix.is_empty() && uri[self.cursor..limit].starts_with(own_prefix) {
            self.cursor + own_prefix.len()
        } else {
            self.cursor
        };

        let mut end = match next {
            Some(Part::Literal(text)) => {
                let search_end = if text.contains(&['?', '#'][..]) {
                    uri.len()
                } else {
                    limit
                };
                uri[start..search_end]
                    .find(text.as_str())
                    .map(|offset| start + offset)
                    // An empty expansion leaves the literal right at the cursor
                    .or_else(|| uri[self.cursor..search_end].starts_with(text.as_str()).then_some(self.cursor))
                    .ok_or_else(|| {
                        self.error(ExtractionErrorKind::BoundaryNotFound {
                            literal: text.clone(),
                        })
                    })?
            }
            Some(Part::Expression(next)) if !next.is_query() => {
                let prefix = next.operator.descriptor().prefix;
                if prefix.is_empty() {
                    limit
                } else {
                    uri[start..limit]
                        .find(prefix)
                        .map(|offset| start + offset)
                        .unwrap_or(limit)
                }
            }
            _ => limit,
        };

        // Strictly encoded values never contain '/', but the last part
        // takes the rest of the path
        if next.is_some()
            && matches!(
                expr.operator,
                Operator::Simple | Operator::Label | Operator::PathParameter
            )
        {
            if let Some(slash) = uri[self.cursor..end].find('/') {
                end = self.cursor + slash;
            }
        }

        trace!(expression = expr.source(), start = self.cursor, end, "expression boundary");
        Ok(end)
    }

    fn positional(&mut self, expr: &Expression, end: usize) -> Result<(), ExtractionError> {
        let uri = self.uri;
        let region = &uri[self.cursor..end];
        if region.is_empty() {
            return Ok(());
        }

        let descriptor = expr.operator.descriptor();
        let body = region.strip_prefix(descriptor.prefix).ok_or_else(|| {
            self.error(ExtractionErrorKind::PrefixMismatch {
                expected: descriptor.prefix.to_string(),
            })
        })?;

        let consumed = if descriptor.named {
            self.named(expr, body)?;
            region.len()
        } else {
            descriptor.prefix.len() + self.unnamed(expr, body)?
        };

        self.cursor += consumed;
        Ok(())
    }

    /// Returns how many bytes of `body` the variables took
    fn unnamed(&mut self, expr: &Expression, body: &str) -> Result<usize, ExtractionError> {
        let separator = expr.operator.descriptor().separator;
        let pieces: Vec<&str> = body.split(separator).collect();
        let slots = assign_pieces(&expr.vars, pieces.len(), separator);

        let mut used = 0;
        for (spec, slot) in expr.vars.iter().zip(slots) {
            if let Some(range) = slot {
                used = used.max(range.end);
                let value = self.shape_value(spec, &pieces[range], separator, decode)?;
                self.bind(spec, value);
            }
        }

        let taken: usize = pieces[..used].iter().map(|piece| piece.len()).sum();
        Ok(taken + used.saturating_sub(1))
    }

    /// `;name=value` pieces, matched by name
    fn named(&mut self, expr: &Expression, body: &str) -> Result<(), ExtractionError> {
        let pieces: Vec<(&str, &str)> = body
            .split(';')
            .map(|piece| piece.split_once('=').unwrap_or((piece, "")))
            .collect();
        let mut used = vec![false; pieces.len()];

        for spec in &expr.vars {
            let mut own = Vec::new();
            for (i, (key, value)) in pieces.iter().enumerate() {
                if !used[i] && *key == spec.name {
                    used[i] = true;
                    own.push(*value);
                }
            }

            if self.takes_unclaimed(spec, own.is_empty()) {
                let mut pairs = Vec::new();
                for (i, (key, value)) in pieces.iter().enumerate() {
                    if used[i] || expr.vars.iter().any(|v| v.name == *key) {
                        continue;
                    }
                    used[i] = true;
                    pairs.push((
                        self.decode_piece(key, decode)?,
                        Scalar::from(self.decode_piece(value, decode)?),
                    ));
                }
                if !pairs.is_empty() {
                    self.bind(spec, VariableValue::Map(pairs));
                }
            } else if !own.is_empty() {
                let value = self.shape_value(spec, &own, ',', decode)?;
                self.bind(spec, value);
            }
        }

        match used.iter().position(|taken| !taken) {
            Some(i) => Err(self.error(ExtractionErrorKind::UnexpectedParameter {
                name: pieces[i].0.to_string(),
            })),
            None => Ok(()),
        }
    }

    /// `?` and `&` read the query dictionary instead of the cursor
    fn query(&mut self, expr: &Expression) -> Result<(), ExtractionError> {
        self.query_at_cursor(expr);

        for spec in &expr.vars {
            let own = self.query.get(&query_key(&spec.name));

            if self.takes_unclaimed(spec, own.is_none()) {
                let mut pairs = Vec::new();
                for (key, raw) in self.query.iter() {
                    if self.claimed.contains(key) {
                        continue;
                    }
                    for value in raw {
                        pairs.push((key.to_string(), Scalar::from(self.decode_piece(value, decode_form)?)));
                    }
                }
                if !pairs.is_empty() {
                    self.bind(spec, VariableValue::Map(pairs));
                }
            } else if let Some(raw) = own {
                let raw: Vec<&str> = raw.iter().map(String::as_str).collect();
                let value = self.shape_value(spec, &raw, ',', decode_form)?;
                self.bind(spec, value);
            }
        }

        let uri = self.uri;
        let at_query = self.cursor == self.path_end
            && matches!(uri[self.cursor..].chars().next(), Some('?' | '&'));
        let in_query = self.cursor > self.path_end && self.cursor < self.query_end;
        if at_query || in_query {
            self.cursor = self.query_end;
        }

        Ok(())
    }

    /// A URI with no `?` may open with the expression's own prefix, as
    /// `{&x}` expands to `&x=1`; the parameters are read from there
    fn query_at_cursor(&mut self, expr: &Expression) {
        if self.cursor >= self.path_end {
            return;
        }

        let uri = self.uri;
        let prefix = expr.operator.descriptor().prefix;
        let rest = match uri[self.cursor..].strip_prefix(prefix) {
            Some(rest) => rest,
            None => return,
        };

        let len = rest.find('#').unwrap_or(rest.len());
        self.query = QueryParameters::parse(&rest[..len]);
        self.path_end = self.cursor;
        self.query_end = self.cursor + prefix.len() + len;
    }

    /// An exploded named variable gathers the parameters nobody else names
    /// when hinted as a map, or when its own name does not appear
    fn takes_unclaimed(&self, spec: &VarSpec, own_absent: bool) -> bool {
        spec.is_explode()
            && match self.options.shape(&spec.name) {
                Some(Shape::Map) => true,
                Some(_) => false,
                None => own_absent,
            }
    }

    fn shape_value(
        &self,
        spec: &VarSpec,
        pieces: &[&str],
        separator: char,
        decoder: Decoder,
    ) -> Result<VariableValue, ExtractionError> {
        let elements: Vec<&str> = if spec.is_explode() {
            pieces.to_vec()
        } else {
            pieces.iter().flat_map(|piece| piece.split(',')).collect()
        };

        match self.options.shape(&spec.name) {
            Some(Shape::Scalar) => {
                let mut buf = [0u8; 4];
                let joined = pieces.join(&*separator.encode_utf8(&mut buf));
                Ok(VariableValue::Scalar(self.decode_piece(&joined, decoder)?.into()))
            }
            Some(Shape::List) => Ok(VariableValue::List(self.decode_all(&elements, decoder)?)),
            Some(Shape::Map) => self.pairs(spec, &elements, decoder).map(VariableValue::Map),
            None => match pieces {
                [single] => Ok(VariableValue::Scalar(self.decode_piece(single, decoder)?.into())),
                _ => Ok(VariableValue::List(self.decode_all(pieces, decoder)?)),
            },
        }
    }

    fn pairs(
        &self,
        spec: &VarSpec,
        elements: &[&str],
        decoder: Decoder,
    ) -> Result<Vec<(String, Scalar)>, ExtractionError> {
        if spec.is_explode() {
            return elements
                .iter()
                .map(|piece| -> Result<(String, Scalar), ExtractionError> {
                    let (key, value) = piece.split_once('=').unwrap_or((*piece, ""));
                    Ok((
                        self.decode_piece(key, decoder)?,
                        self.decode_piece(value, decoder)?.into(),
                    ))
                })
                .collect();
        }

        if elements.len() % 2 != 0 {
            return Err(self.error(ExtractionErrorKind::ShapeMismatch {
                name: spec.name.clone(),
                expected: Shape::Map,
            }));
        }

        elements
            .chunks(2)
            .map(|pair| -> Result<(String, Scalar), ExtractionError> {
                Ok((
                    self.decode_piece(pair[0], decoder)?,
                    self.decode_piece(pair[1], decoder)?.into(),
                ))
            })
            .collect()
    }

    fn decode_all(&self, pieces: &[&str], decoder: Decoder) -> Result<Vec<Scalar>, ExtractionError> {
        pieces
            .iter()
            .map(|piece| self.decode_piece(piece, decoder).map(Scalar::from))
            .collect()
    }

    fn decode_piece(&self, raw: &str, decoder: Decoder) -> Result<String, ExtractionError> {
        decoder(raw).map_err(|_| {
            self.error(ExtractionErrorKind::InvalidEncoding {
                value: raw.to_string(),
            })
        })
    }

    /// A full value replaces one bound from a `:N` prefix, never the other
    /// way round; otherwise the first binding of a name wins.
    fn bind(&mut self, spec: &VarSpec, value: VariableValue) {
        let truncated = spec.prefix().is_some();
        let replace = !self.values.contains_key(&spec.name)
            || (!truncated && self.truncated.contains(&spec.name));

        if replace {
            if truncated {
                self.truncated.insert(spec.name.clone());
            } else {
                self.truncated.remove(&spec.name);
            }
            self.values.insert(spec.name.clone(), value);
        }
    }

    fn bind_defaults(&mut self, part: &Part) {
        if let Part::Expression(expr) = part {
            for spec in &expr.vars {
                if let Some(default) = spec.default_value() {
                    self.values
                        .entry(spec.name.clone())
                        .or_insert_with(|| VariableValue::from(default));
                }
            }
        }
    }

    /// The path must be used up. A query or fragment the template never
    /// reached is allowed to remain.
    fn finish(self) -> Result<VariableValues, ExtractionError> {
        let consumed = self.cursor == self.uri.len()
            || self.cursor == self.path_end
            || self.cursor == self.query_end;
        if !consumed {
            return Err(self.error(ExtractionErrorKind::TrailingInput {
                remaining: self.uri[self.cursor..].to_string(),
            }));
        }

        let mut missing: Vec<&String> = self
            .options
            .required
            .iter()
            .filter(|name| !self.values.contains_key(*name))
            .collect();
        missing.sort();
        if let Some(name) = missing.first() {
            return Err(self.error(ExtractionErrorKind::MissingVariable {
                name: name.to_string(),
            }));
        }

        Ok(self.values)
    }
}

/// Which pieces each variable takes. Variables before the greedy one (the
/// first exploded variable, else the last) take one piece each from the
/// front, those after it one each from the back, and the greedy one takes
/// what is left. Without an exploded variable, operators that do not
/// separate with `,` hand out exactly one piece per variable.
fn assign_pieces(vars: &[VarSpec], count: usize, separator: char) -> Vec<Option<Range<usize>>> {
    let mut slots = vec![None; vars.len()];
    if vars.is_empty() {
        return slots;
    }

    let explode = vars.iter().position(VarSpec::is_explode);
    if explode.is_none() && separator != ',' {
        for (i, slot) in slots.iter_mut().enumerate().take(count) {
            *slot = Some(i..i + 1);
        }
        return slots;
    }

    let greedy = explode.unwrap_or(vars.len() - 1);
    let (mut front, mut back) = (0, count);
    for slot in slots[..greedy].iter_mut() {
        if front < back {
            *slot = Some(front..front + 1);
            front += 1;
        }
    }
    for slot in slots[greedy + 1..].iter_mut().rev() {
        if back > front {
            back -= 1;
            *slot = Some(back..back + 1);
        }
    }
    if front < back {
        slots[greedy] = Some(front..back);
    }

    slots
}

/// Variable names may hold `%XX` escapes; query keys are compared decoded
fn query_key(name: &str) -> String {
    decode_form(name).unwrap_or_else(|_| name.to_string())
}

fn claimed_query_keys(template: &Template) -> HashSet<String> {
    let mut claimed = HashSet::new();
    let mut in_query = false;

    for part in template.parts() {
        match part {
            Part::Expression(expr) if expr.is_query() => {
                in_query = true;
                claimed.extend(expr.vars.iter().map(|spec| query_key(&spec.name)));
            }
            Part::Literal(text) => {
                let query = match text.split_once('?') {
                    Some((_, query)) => {
                        in_query = true;
                        query
                    }
                    None if in_query => text.as_str(),
                    None => continue,
                };
                let query = query.split('#').next().unwrap_or_default();
                claimed.extend(
                    QueryParameters::parse(query)
                        .iter()
                        .map(|(key, _)| key.to_string()),
                );
            }
            Part::Expression(_) => {}
        }
    }

    claimed
}
