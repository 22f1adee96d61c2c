// Route table handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::{template::VariableValues, Route},
    error::AppError,
    handlers::templates::UriResponse,
    AppState,
};

#[derive(Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub template: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub variables: Vec<String>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            template: route.template.to_string(),
            description: route.description.clone(),
            variables: route
                .template
                .variable_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct ResolveParams {
    pub uri: String,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub route: String,
    pub values: VariableValues,
}

#[derive(Deserialize)]
pub struct BuildRequest {
    #[serde(default)]
    pub values: VariableValues,
}

// GET /routes
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<Vec<RouteSummary>> {
    Json(
        state
            .routes
            .table()
            .routes()
            .iter()
            .map(RouteSummary::from)
            .collect(),
    )
}

// GET /resolve?uri=...
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, AppError> {
    let matched = state.routes.resolve(&params.uri)?;
    Ok(Json(ResolveResponse {
        route: matched.route,
        values: matched.values,
    }))
}

// POST /routes/{name}/expand
pub async fn build(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(request): Json<BuildRequest>,
) -> Result<Json<UriResponse>, AppError> {
    let uri = state.routes.build(&name, &request.values)?;
    Ok(Json(UriResponse { uri }))
}
