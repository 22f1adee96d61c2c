// Template expansion: variable bindings in, URI out

use super::ast::{Expression, Part, Template, VarSpec};
use super::error::ExpansionError;
use super::operators::Operator;
use super::value::{Scalar, VariableValue, VariableValues};

/// Expand every part of `template` against `values`.
///
/// Unbound, null, and empty-composite variables contribute nothing. A
/// variable with a `|default` modifier falls back to its default.
pub fn expand(template: &Template, values: &VariableValues) -> Result<String, ExpansionError> {
    let mut result = String::new();

    for part in template.parts() {
        match part {
            Part::Literal(s) => result.push_str(s),
            Part::Expression(expr) => result.push_str(&expand_expression(expr, values)?),
        }
    }

    Ok(result)
}

pub fn expand_expression(
    expr: &Expression,
    values: &VariableValues,
) -> Result<String, ExpansionError> {
    let operator = expr.operator;
    let descriptor = operator.descriptor();
    let mut fragments = Vec::with_capacity(expr.vars.len());

    for spec in &expr.vars {
        let fallback;
        let value = match values.get(&spec.name).filter(|v| v.is_defined()) {
            Some(value) => value,
            None => match spec.default_value() {
                Some(default) => {
                    fallback = VariableValue::from(default);
                    &fallback
                }
                None => continue,
            },
        };

        if spec.prefix().is_some() && value.is_composite() {
            return Err(ExpansionError::PrefixOnComposite {
                name: spec.name.clone(),
            });
        }

        fragments.push(if descriptor.named {
            expand_named(value, spec, operator)
        } else {
            expand_unnamed(value, spec, operator)
        });
    }

    let joined = join(fragments.into_iter(), descriptor.separator);
    if joined.is_empty() {
        // prefix is not prepended for empty expansions
        Ok(String::new())
    } else {
        Ok(format!("{}{}", descriptor.prefix, joined))
    }
}

fn truncate(value: &Scalar, spec: &VarSpec) -> String {
    let rendered = value.to_string();
    match spec.prefix() {
        Some(count) => rendered.chars().take(count).collect(),
        None => rendered,
    }
}

/// `+ # . /` and the default operator
fn expand_unnamed(value: &VariableValue, spec: &VarSpec, operator: Operator) -> String {
    let descriptor = operator.descriptor();
    let explode = spec.is_explode();
    let separator = if explode { descriptor.separator } else { ',' };

    match value {
        VariableValue::Null => String::new(),
        VariableValue::Scalar(scalar) => operator.encode(&truncate(scalar, spec)),
        VariableValue::List(items) => join(
            items.iter().map(|item| operator.encode(&item.to_string())),
            separator,
        ),
        VariableValue::Map(pairs) => {
            let pair_separator = if explode { '=' } else { ',' };
            join(
                pairs.iter().map(|(key, item)| {
                    format!(
                        "{}{}{}",
                        operator.encode(key),
                        pair_separator,
                        operator.encode(&item.to_string())
                    )
                }),
                separator,
            )
        }
    }
}

/// `; ? &`
fn expand_named(value: &VariableValue, spec: &VarSpec, operator: Operator) -> String {
    let descriptor = operator.descriptor();
    let with_equals = |name: &str, encoded: String| {
        if encoded.is_empty() && !descriptor.include_separator_for_empty {
            name.to_string()
        } else {
            format!("{}={}", name, encoded)
        }
    };

    match (value, spec.is_explode()) {
        (VariableValue::Null, _) => String::new(),
        (VariableValue::Scalar(scalar), _) => {
            with_equals(spec.name.as_str(), operator.encode(&truncate(scalar, spec)))
        }
        (VariableValue::List(items), true) => join(
            items
                .iter()
                .map(|item| with_equals(spec.name.as_str(), operator.encode(&item.to_string()))),
            descriptor.separator,
        ),
        (VariableValue::Map(pairs), true) => join(
            pairs.iter().map(|(key, item)| {
                with_equals(operator.encode(key).as_str(), operator.encode(&item.to_string()))
            }),
            descriptor.separator,
        ),
        (VariableValue::List(items), false) => with_equals(
            spec.name.as_str(),
            join(items.iter().map(|item| operator.encode(&item.to_string())), ','),
        ),
        (VariableValue::Map(pairs), false) => with_equals(
            spec.name.as_str(),
            join(
                pairs.iter().map(|(key, item)| {
                    format!("{},{}", operator.encode(key), operator.encode(&item.to_string()))
                }),
                ',',
            ),
        ),
    }
}

fn join(items: impl Iterator<Item = String>, separator: char) -> String {
    let mut out = String::new();
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(&item);
    }
    out
}
