// Ad-hoc template handlers: expand and extract without a route table

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

use crate::{domain::template::VariableValues, error::AppError, AppState};

#[derive(Deserialize)]
pub struct ExpandRequest {
    pub template: String,
    #[serde(default)]
    pub values: VariableValues,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct UriResponse {
    pub uri: String,
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub template: String,
    pub uri: String,
    #[serde(default)]
    pub shapes: BTreeMap<String, String>,
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Serialize)]
pub struct ValuesResponse {
    pub values: VariableValues,
}

// POST /expand
pub async fn expand(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpandRequest>,
) -> Result<Json<UriResponse>, AppError> {
    let uri = state.routes.expand(&request.template, &request.values)?;
    Ok(Json(UriResponse { uri }))
}

// POST /extract
pub async fn extract(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ValuesResponse>, AppError> {
    let values = state.routes.extract(
        &request.template,
        &request.uri,
        &request.shapes,
        &request.required,
    )?;
    Ok(Json(ValuesResponse { values }))
}
