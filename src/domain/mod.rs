// Domain model: named routes over URI templates

pub mod template;

use std::fmt;
use tracing::debug;
use url::Url;

use template::{ExpansionError, ExtractOptions, ExtractionError, Template, VariableValues};

/// A URI template registered under a name
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub name: String,
    pub template: Template,
    pub description: String,
    pub options: ExtractOptions,
}

impl Route {
    pub fn new(name: impl Into<String>, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
            description: String::new(),
            options: ExtractOptions::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Absolute templates are matched against whole URLs, relative ones
    /// against the path, query and fragment only
    pub fn is_absolute(&self) -> bool {
        self.template.as_str().contains("://")
    }

    pub fn build(&self, values: &VariableValues) -> Result<String, ExpansionError> {
        self.template.expand(values)
    }

    pub fn extract(&self, uri: &str) -> Result<VariableValues, ExtractionError> {
        self.template.extract_with(uri, &self.options)
    }
}

/// The first route that accepted a URI, with what it extracted
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub route: String,
    pub values: VariableValues,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    DuplicateRoute(String),
    UnknownRoute(String),
    Expansion(ExpansionError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::DuplicateRoute(name) => write!(f, "Duplicate route: {}", name),
            RouteError::UnknownRoute(name) => write!(f, "Unknown route: {}", name),
            RouteError::Expansion(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RouteError {}

impl From<ExpansionError> for RouteError {
    fn from(err: ExpansionError) -> Self {
        RouteError::Expansion(err)
    }
}

/// Routes in declaration order. Resolution tries them in that order and
/// stops at the first match.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, route: Route) -> Result<(), RouteError> {
        if self.get(&route.name).is_some() {
            return Err(RouteError::DuplicateRoute(route.name));
        }
        self.routes.push(route);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Expand the named route's template
    pub fn build(&self, name: &str, values: &VariableValues) -> Result<String, RouteError> {
        let route = self
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        Ok(route.build(values)?)
    }

    pub fn resolve(&self, uri: &str) -> Option<RouteMatch> {
        let relative = relative_reference(uri);

        for route in &self.routes {
            let candidate = match &relative {
                Some(relative) if !route.is_absolute() => relative.as_str(),
                _ => uri,
            };

            match route.extract(candidate) {
                Ok(values) => {
                    debug!(route = %route.name, uri, "Route matched");
                    return Some(RouteMatch {
                        route: route.name.clone(),
                        values,
                    });
                }
                Err(e) => debug!(route = %route.name, error = %e, "Route rejected URI"),
            }
        }

        None
    }
}

impl FromIterator<Route> for RouteTable {
    /// Later duplicates are dropped
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut table = RouteTable::new();
        for route in iter {
            let _ = table.add(route);
        }
        table
    }
}

/// Path, query and fragment of an absolute http(s) URL
fn relative_reference(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok().filter(|url| url.has_host())?;

    let mut relative = url.path().to_string();
    if let Some(query) = url.query() {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        relative.push('#');
        relative.push_str(fragment);
    }
    Some(relative)
}
