// Validation functions for uritmpl
// Shared by the route file loader, the HTTP handlers and the CLI

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::template::{ExtractOptions, Shape, Template};
use crate::error::AppError;

/// Validate a route name: letters, digits, `_` and `-`
///
/// Returns Ok(()) if valid, Err(AppError::BadRequest) if invalid
pub fn validate_route_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::BadRequest("Route name cannot be empty".to_string()));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::BadRequest(format!(
            "Invalid route name '{}': must contain only letters, numbers, '_' and '-'",
            name
        )));
    }

    Ok(())
}

/// Parse a template and check its scheme
pub fn validate_template(source: &str) -> Result<Template, AppError> {
    let template = Template::parse(source)
        .map_err(|e| AppError::BadRequest(format!("Invalid template syntax: {}", e)))?;

    validate_url_scheme(source)?;

    Ok(template)
}

/// Validate that an absolute template or URL uses http or https
///
/// Returns Ok(()) if valid, Err(AppError::BadRequest) if invalid
pub fn validate_url_scheme(url: &str) -> Result<(), AppError> {
    let url_lower = url.to_lowercase();

    if url_lower.contains("://")
        || url_lower.starts_with("javascript:")
        || url_lower.starts_with("data:")
        || url_lower.starts_with("file:")
    {
        if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
            return Err(AppError::BadRequest(
                "Only http:// and https:// templates are allowed".to_string(),
            ));
        }
    }

    Ok(())
}

/// Build extraction options, rejecting unknown shapes and names the template
/// never mentions
pub fn validate_extract_options(
    template: &Template,
    shapes: &BTreeMap<String, String>,
    required: &[String],
) -> Result<ExtractOptions, AppError> {
    let known: HashSet<&str> = template.variable_names().into_iter().collect();
    let check_known = |name: &str| {
        if known.contains(name) {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Template {} has no variable '{}'",
                template, name
            )))
        }
    };

    let mut parsed = HashMap::new();
    for (name, shape) in shapes {
        check_known(name)?;
        parsed.insert(name.clone(), parse_shape(shape)?);
    }

    for name in required {
        check_known(name)?;
    }

    Ok(ExtractOptions {
        shapes: parsed,
        required: required.iter().cloned().collect(),
    })
}

pub fn parse_shape(shape: &str) -> Result<Shape, AppError> {
    shape.parse().map_err(AppError::BadRequest)
}

/// Parse a `name=shape` command line hint
pub fn parse_shape_arg(arg: &str) -> Result<(String, String), AppError> {
    match arg.split_once('=') {
        Some((name, shape)) if !name.is_empty() => {
            parse_shape(shape)?;
            Ok((name.to_string(), shape.to_string()))
        }
        _ => Err(AppError::BadRequest(format!(
            "Invalid shape hint '{}': expected name=scalar|list|map",
            arg
        ))),
    }
}
