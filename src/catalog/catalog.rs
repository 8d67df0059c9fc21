//! Model listing and selection

use super::ranker::rank;
use crate::error::{ProviderError, Result, SolarError};
use crate::provider::ProviderClient;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const MODELS_PATH: &str = "/models";

/// Offered when the model list cannot be fetched
pub const DEFAULT_MODEL_OPTION: &str = "solar-mini";

/// Tried in order when no model is configured and none can be listed
pub const FALLBACK_MODELS: &[&str] = &["solar-pro2-preview", "solar-pro", "solar-mini"];

/// A model returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Selectable model entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&ListedModel> for ModelOption {
    fn from(model: &ListedModel) -> Self {
        Self {
            name: model.id.clone(),
            value: model.id.clone(),
            description: model.description.clone(),
        }
    }
}

/// The listing endpoint answers with either `data` or `models`
#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    models: Option<Vec<serde_json::Value>>,
}

/// Lists the provider's models and picks one when none is configured
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    provider: ProviderClient,
}

impl ModelCatalog {
    pub fn new(provider: ProviderClient) -> Self {
        Self { provider }
    }

    /// Fetch, filter by the configured marker, de-duplicate and rank
    pub async fn fetch(&self) -> Result<Vec<ListedModel>> {
        let body = self.provider.get(MODELS_PATH).await.map_err(SolarError::Models)?;
        let listed = parse_model_list(&body).map_err(SolarError::Models)?;
        let selected = select_models(listed, &self.provider.config().model_marker);

        debug!("Listed {} matching models", selected.len());
        Ok(selected)
    }

    /// Model options for a picker; falls back to a single default entry
    pub async fn options(&self) -> Vec<ModelOption> {
        match self.fetch().await {
            Ok(models) if !models.is_empty() => models.iter().map(ModelOption::from).collect(),
            Ok(_) => {
                warn!("No {} models found in API response", self.provider.config().model_marker);
                vec![default_option()]
            }
            Err(e) => {
                warn!("Error fetching models: {}", e);
                vec![default_option()]
            }
        }
    }

    /// The configured model, else the newest listed one, else the first fallback
    pub async fn resolve(&self, configured: Option<&str>) -> String {
        if let Some(model) = configured.map(str::trim).filter(|m| !m.is_empty()) {
            return model.to_string();
        }

        match self.fetch().await {
            Ok(models) if !models.is_empty() => {
                info!("Auto-selected latest model: {}", models[0].id);
                return models[0].id.clone();
            }
            Ok(_) => warn!("Model list was empty, using fallback"),
            Err(e) => warn!("Failed to fetch models dynamically, using fallback: {}", e),
        }

        let fallback = FALLBACK_MODELS[0].to_string();
        info!("Using fallback model: {}", fallback);
        fallback
    }
}

fn default_option() -> ModelOption {
    ModelOption {
        name: DEFAULT_MODEL_OPTION.to_string(),
        value: DEFAULT_MODEL_OPTION.to_string(),
        description: None,
    }
}

/// Decode a listing body into models; entries without a string `id` are skipped
pub fn parse_model_list(body: &str) -> std::result::Result<Vec<ListedModel>, ProviderError> {
    let response: ModelListResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Protocol(format!("invalid model list: {}", e)))?;

    let entries = response
        .data
        .or(response.models)
        .ok_or_else(|| ProviderError::Protocol("model list has no `data` or `models` array".to_string()))?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<ListedModel>(entry).ok())
        .collect())
}

/// Keep models whose id contains `marker` (case-insensitive), first occurrence
/// wins on duplicates, ranked newest first
pub fn select_models(models: Vec<ListedModel>, marker: &str) -> Vec<ListedModel> {
    let marker = marker.to_lowercase();
    let mut seen = HashSet::new();
    let mut matching: Vec<ListedModel> = models
        .into_iter()
        .filter(|m| m.id.to_lowercase().contains(&marker))
        .filter(|m| seen.insert(m.id.clone()))
        .collect();

    let order = rank(&matching.iter().map(|m| m.id.as_str()).collect::<Vec<_>>());
    matching.sort_by_key(|m| order.iter().position(|id| *id == m.id));
    matching
}
