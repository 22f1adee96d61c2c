// Loading the route table from YAML

use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::{
    config::yml_settings::YmlSettings,
    domain::{Route, RouteTable},
    error::AppError,
    validation,
};

pub const DEFAULT_CONFIG_FILE: &str = "routes.yml";

impl TryFrom<YmlSettings> for Route {
    type Error = AppError;

    fn try_from(value: YmlSettings) -> Result<Self, Self::Error> {
        validation::validate_route_name(&value.name)?;
        let template = validation::validate_template(&value.template)?;
        let options =
            validation::validate_extract_options(&template, &value.shapes, &value.required)?;

        Ok(Route::new(value.name, template)
            .with_description(value.description)
            .with_options(options))
    }
}

/// Load routes from `path`, or from `routes.yml` when no path is given
pub fn load_route_table(path: Option<&str>) -> Result<RouteTable> {
    let path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file {}", path))?;

    let table = parse_route_table(&yaml).with_context(|| format!("Invalid route file {}", path))?;
    info!(path, routes = table.len(), "Loaded route table");
    Ok(table)
}

pub fn parse_route_table(yaml: &str) -> Result<RouteTable> {
    let settings: Vec<YmlSettings> =
        serde_yaml::from_str(yaml).context("Route file is not a list of routes")?;

    let mut table = RouteTable::new();
    for entry in settings {
        let name = entry.name.clone();
        let route = Route::try_from(entry).with_context(|| format!("Route '{}'", name))?;
        table.add(route)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::Shape;

    #[test]
    fn test_parse_route_table() {
        let yaml = r#"
- name: user
  template: /users{/id}{?fields}
  description: Look up a user
  shapes:
    fields: list
  required: [id]
- name: search
  template: /search{?q}
"#;
        let table = parse_route_table(yaml).unwrap();
        assert_eq!(table.len(), 2);

        let user = table.get("user").unwrap();
        assert_eq!(user.description, "Look up a user");
        assert_eq!(user.options.shape("fields"), Some(Shape::List));
        assert!(user.options.required.contains("id"));
        assert_eq!(table.routes()[1].name, "search");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = "- {name: a, template: /a}\n- {name: a, template: /b}\n";
        let err = parse_route_table(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate route: a"));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        for yaml in [
            "- {name: a, template: '/a/{id'}\n",
            "- {name: a, template: 'ftp://host/{file}'}\n",
            "- {name: a, template: '/a/{id}', shapes: {id: tuple}}\n",
            "- {name: a, template: '/a/{id}', required: [other]}\n",
            "- {name: 'a b', template: /a}\n",
            "name: not-a-list\n",
        ] {
            assert!(parse_route_table(yaml).is_err(), "{} should fail", yaml);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_route_table(Some("does/not/exist.yml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yml"));
    }
}
