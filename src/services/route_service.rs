// Route service - Business logic behind the HTTP handlers

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::{
    domain::{
        template::VariableValues,
        RouteMatch, RouteTable,
    },
    error::AppError,
    validation,
};

/// Service for expanding, extracting and resolving URIs
pub struct RouteService {
    table: RouteTable,
}

impl RouteService {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Expand an ad-hoc template
    pub fn expand(&self, template: &str, values: &VariableValues) -> Result<String, AppError> {
        let template = validation::validate_template(template)?;
        let uri = template.expand(values)?;
        debug!(template = %template, uri = %uri, "Expanded template");
        Ok(uri)
    }

    /// Match `uri` against an ad-hoc template
    pub fn extract(
        &self,
        template: &str,
        uri: &str,
        shapes: &BTreeMap<String, String>,
        required: &[String],
    ) -> Result<VariableValues, AppError> {
        let template = validation::validate_template(template)?;
        let options = validation::validate_extract_options(&template, shapes, required)?;

        let values = template.extract_with(uri, &options)?;
        debug!(template = %template, uri, variables = values.len(), "Extracted values");
        Ok(values)
    }

    /// Find the first configured route matching `uri`
    pub fn resolve(&self, uri: &str) -> Result<RouteMatch, AppError> {
        match self.table.resolve(uri) {
            Some(matched) => {
                info!(route = %matched.route, uri, "Resolved URI");
                Ok(matched)
            }
            None => Err(AppError::NotFound(format!("no route matches '{}'", uri))),
        }
    }

    /// Expand a configured route by name
    pub fn build(&self, name: &str, values: &VariableValues) -> Result<String, AppError> {
        Ok(self.table.build(name, values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_route_table;
    use crate::domain::template::VariableValue;

    fn service() -> RouteService {
        let yaml = "- {name: user, template: '/users/{id}'}\n- {name: search, template: '/search{?q}'}\n";
        RouteService::new(parse_route_table(yaml).unwrap())
    }

    fn values(pairs: &[(&str, &str)]) -> VariableValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), VariableValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_expand() {
        let uri = service()
            .expand("/users/{id}", &values(&[("id", "a b")]))
            .unwrap();
        assert_eq!(uri, "/users/a%20b");
    }

    #[test]
    fn test_expand_invalid_template() {
        let err = service().expand("/users/{id", &values(&[])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_extract_with_hints() {
        let shapes = BTreeMap::from([("tags".to_string(), "list".to_string())]);
        let extracted = service()
            .extract("/posts{?tags}", "/posts?tags=rust", &shapes, &[])
            .unwrap();
        assert_eq!(extracted["tags"], VariableValue::list(["rust"]));
    }

    #[test]
    fn test_extract_mismatch_is_unmatched() {
        let err = service()
            .extract("/users/{id}", "/groups/1", &BTreeMap::new(), &[])
            .unwrap_err();
        assert!(matches!(err, AppError::Unmatched(_)));
    }

    #[test]
    fn test_resolve_and_build() {
        let service = service();
        let matched = service.resolve("/search?q=uri").unwrap();
        assert_eq!(matched.route, "search");
        assert!(matches!(
            service.resolve("/nothing/here"),
            Err(AppError::NotFound(_))
        ));

        assert_eq!(
            service.build("user", &values(&[("id", "9")])).unwrap(),
            "/users/9"
        );
        assert!(matches!(
            service.build("nope", &values(&[])),
            Err(AppError::NotFound(_))
        ));
    }
}
