use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::GenerationError;

/// Sampling parameters passed with a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl SamplingOptions {
    pub const fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            top_p: None,
            top_k: None,
        }
    }

    pub const fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub const fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Sampling parameters other than temperature, as provider options.
    pub fn extra_params(&self) -> Option<Value> {
        let mut params = Map::new();
        if let Some(top_p) = self.top_p {
            params.insert("top_p".to_string(), json!(top_p));
        }
        if let Some(top_k) = self.top_k {
            params.insert("top_k".to_string(), json!(top_k));
        }
        (!params.is_empty()).then_some(Value::Object(params))
    }
}

/// The external text-generation capability.
///
/// `generate` returns the model's reply exactly as received. Errors are returned as-is;
/// implementations do not retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model used for every call.
    fn model(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<String, GenerationError>;

    /// Lists the models the service has available. Used as the liveness probe.
    async fn list_models(&self) -> Result<Vec<String>, GenerationError>;
}
