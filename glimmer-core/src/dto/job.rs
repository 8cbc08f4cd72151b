//! Job DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /jobs/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJob {
    pub description: String,
    pub addresses: Vec<NewAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting_preferences: Option<Value>,
}

/// One address line of a new campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
}

/// Bulk download response of `GET /jobs/{id}/download-all`
///
/// The backend answers either with a bare URL string or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DownloadLink {
    Url(String),
    Object {
        #[serde(alias = "download_url")]
        url: String,
    },
}

impl DownloadLink {
    pub fn url(&self) -> &str {
        match self {
            DownloadLink::Url(url) => url,
            DownloadLink::Object { url } => url,
        }
    }
}

/// Recursively drops empty preference values
///
/// `null`, `false`, `0`, `""`, empty arrays and objects left empty after
/// pruning are removed. Returns `None` when nothing survives.
pub fn prune_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some(Value::Bool(true)),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(Value::Number(n)),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Value::String(s)),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(Value::Array(items)),
        Value::Object(fields) => {
            let pruned: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, value)| prune_empty(value).map(|v| (key, v)))
                .collect();
            if pruned.is_empty() {
                None
            } else {
                Some(Value::Object(pruned))
            }
        }
    }
}
