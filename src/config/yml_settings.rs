use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One route entry of the YAML route file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct YmlSettings {
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Extraction hints: variable name to `scalar`, `list` or `map`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shapes: BTreeMap<String, String>,
    /// Variables that must be present for a URI to match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}
