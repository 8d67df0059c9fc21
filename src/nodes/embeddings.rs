//! Embeddings node: turns item text into vectors

use super::{run_items, ExecutionMode, NodeItem, NodeOutput};
use crate::config::EmbeddingConfig;
use crate::embedding::{EmbeddingClient, EmbeddingOutput};
use crate::error::{Result, SolarError};
use crate::provider::ProviderClient;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Text to embed for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "text", rename_all = "lowercase")]
pub enum EmbeddingsInput {
    /// One text, producing one vector
    Single(String),
    /// Newline-separated texts; blank lines are dropped
    Multiple(String),
}

impl Default for EmbeddingsInput {
    fn default() -> Self {
        EmbeddingsInput::Single(String::new())
    }
}

/// Parameters evaluated for one item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingsParams {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub input: EmbeddingsInput,
    /// Item field holding the single text; takes precedence over `input`
    #[serde(default)]
    pub input_field: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub strip_newlines: Option<bool>,
    #[serde(default)]
    pub show_usage: bool,
}

/// Node producing embeddings for each input item
#[derive(Debug, Clone)]
pub struct EmbeddingsNode {
    provider: ProviderClient,
    defaults: EmbeddingConfig,
}

impl EmbeddingsNode {
    pub fn new(provider: ProviderClient, defaults: EmbeddingConfig) -> Self {
        Self { provider, defaults }
    }

    /// Run every item through the embeddings endpoint
    pub async fn execute(
        &self,
        items: &[NodeItem<EmbeddingsParams>],
        mode: ExecutionMode,
    ) -> Result<Vec<NodeOutput>> {
        run_items(items, mode, |_, item| self.process(item)).await
    }

    async fn process(&self, item: &NodeItem<EmbeddingsParams>) -> Result<Value> {
        let params = &item.params;
        let client = self.client_for(params)?;
        let model = client.config().model.clone();

        match single_text(item) {
            Some(text) => {
                if text.trim().is_empty() {
                    return Err(invalid(ValidationError::EmptyInput));
                }
                let output = client.embed_many_with_usage(std::slice::from_ref(&text)).await?;
                Ok(single_output(text, output, &model, params.show_usage))
            }
            None => {
                let texts = split_lines(match &params.input {
                    EmbeddingsInput::Multiple(raw) => raw,
                    EmbeddingsInput::Single(raw) => raw,
                });
                if texts.is_empty() {
                    return Err(invalid(ValidationError::EmptyInput));
                }
                debug!("Embedding {} texts for item", texts.len());
                let output = client.embed_many_with_usage(&texts).await?;
                Ok(multiple_output(&texts, output, &model, params.show_usage))
            }
        }
    }

    fn client_for(&self, params: &EmbeddingsParams) -> Result<EmbeddingClient> {
        let mut config = self.defaults.clone();
        if let Some(model) = params.model.as_ref().filter(|m| !m.trim().is_empty()) {
            config.model = model.clone();
        }
        if let Some(batch_size) = params.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(strip) = params.strip_newlines {
            config.strip_newlines = strip;
        }
        EmbeddingClient::new(self.provider.clone(), config)
    }
}

/// The single text for an item, or `None` in multiple mode
fn single_text(item: &NodeItem<EmbeddingsParams>) -> Option<String> {
    let field_value = item
        .params
        .input_field
        .as_deref()
        .and_then(|field| item.json.get(field))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

    match (&item.params.input, field_value) {
        (_, Some(text)) => Some(text),
        (EmbeddingsInput::Single(text), None) => Some(text.clone()),
        (EmbeddingsInput::Multiple(_), None) => None,
    }
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(error: ValidationError) -> SolarError {
    SolarError::Embedding(error.into())
}

fn single_output(text: String, output: EmbeddingOutput, model: &str, show_usage: bool) -> Value {
    let embedding = output.embeddings.into_iter().next().unwrap_or_default();
    let mut record = Map::new();
    record.insert("text".into(), json!(text));
    record.insert("dimension".into(), json!(embedding.len()));
    record.insert("embedding".into(), json!(embedding));
    record.insert("model".into(), json!(model));
    if show_usage {
        record.insert("usage".into(), json!(output.usage));
    }
    Value::Object(record)
}

fn multiple_output(texts: &[String], output: EmbeddingOutput, model: &str, show_usage: bool) -> Value {
    let embeddings: Vec<Value> = texts
        .iter()
        .zip(output.embeddings)
        .enumerate()
        .map(|(index, (text, embedding))| {
            json!({
                "text": text,
                "dimension": embedding.len(),
                "embedding": embedding,
                "index": index,
            })
        })
        .collect();

    let mut record = Map::new();
    record.insert("count".into(), json!(embeddings.len()));
    record.insert("embeddings".into(), Value::Array(embeddings));
    record.insert("model".into(), json!(model));
    if show_usage {
        record.insert("usage".into(), json!(output.usage));
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::UsageStats;

    fn item(json: Value, params: EmbeddingsParams) -> NodeItem<EmbeddingsParams> {
        NodeItem::new(json, params)
    }

    #[test]
    fn test_input_field_takes_precedence() {
        let params = EmbeddingsParams {
            input: EmbeddingsInput::Single("fallback".to_string()),
            input_field: Some("body".to_string()),
            ..Default::default()
        };
        assert_eq!(single_text(&item(json!({ "body": "from item" }), params.clone())), Some("from item".to_string()));
        assert_eq!(single_text(&item(json!({}), params)), Some("fallback".to_string()));
    }

    #[test]
    fn test_multiple_mode_has_no_single_text() {
        let params = EmbeddingsParams {
            input: EmbeddingsInput::Multiple("a\nb".to_string()),
            ..Default::default()
        };
        assert_eq!(single_text(&item(json!({}), params)), None);
    }

    #[test]
    fn test_split_lines_drops_blanks() {
        assert_eq!(split_lines("first\n\n  second  \n\t\nthird"), vec!["first", "second", "third"]);
        assert!(split_lines("\n \n").is_empty());
    }

    #[test]
    fn test_params_deserialize() {
        let params: EmbeddingsParams = serde_json::from_value(json!({
            "model": "embedding-passage",
            "input": { "mode": "multiple", "text": "a\nb" },
            "batchSize": 50,
            "showUsage": true
        }))
        .unwrap();

        assert_eq!(params.input, EmbeddingsInput::Multiple("a\nb".to_string()));
        assert_eq!(params.batch_size, Some(50));
        assert!(params.show_usage);
        assert_eq!(params.strip_newlines, None);
    }

    #[test]
    fn test_output_shapes() {
        let output = EmbeddingOutput {
            embeddings: vec![vec![0.5, 0.25]],
            usage: UsageStats { prompt_tokens: 2, total_tokens: 2 },
        };
        let single = single_output("hi".to_string(), output.clone(), "embedding-query", true);
        assert_eq!(single["dimension"], 2);
        assert_eq!(single["usage"]["total_tokens"], 2);

        let multiple = multiple_output(&["hi".to_string()], output, "embedding-query", false);
        assert_eq!(multiple["count"], 1);
        assert_eq!(multiple["embeddings"][0]["index"], 0);
        assert!(multiple.get("usage").is_none());
    }
}
