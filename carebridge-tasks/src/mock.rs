//! Scripted generator for tests and offline runs.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generator::{SamplingOptions, TextGenerator};

/// A prompt and the options it was sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub options: SamplingOptions,
}

/// Returns a fixed reply (or failure) and records every call it receives.
pub struct MockGenerator {
    model: String,
    reply: std::result::Result<String, String>,
    probe_error: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            model: "mock".to_string(),
            reply: Ok(reply.into()),
            probe_error: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every generation call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            ..Self::replying("")
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Makes the liveness probe fail with `message`.
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.probe_error = Some(message.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                prompt: prompt.to_string(),
                options: *options,
            });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(GenerationError::Upstream(message.clone())),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        match &self.probe_error {
            Some(message) => Err(GenerationError::Unavailable(message.clone())),
            None => Ok(vec![self.model.clone()]),
        }
    }
}
