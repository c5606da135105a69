//! TaskRunner – validates a request, renders its prompt, calls the generator once and
//! shapes the reply into the task's output.
//!
//! Every call is independent: the runner holds no per-request state, so one instance
//! is built at startup and cloned into each handler.
//!
//! ```rust,ignore
//! let runner = TaskRunner::new(Arc::new(OllamaGenerator::new(DEFAULT_BASE_URL, "mistral")?));
//! let faqs = runner.generate_faqs(request).await?;
//! ```
//!
//! Nothing is retried. A generation failure, a timeout (when one is configured) or an
//! unparsable structured reply is returned to the caller immediately.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use crate::{
    error::{GenerationError, Result, TaskError},
    extract::extract_items,
    generator::TextGenerator,
    items::{CareTask, FaqItem, SequencedItem},
    task::{CareGuidanceRequest, FaqRequest, SummarizeRequest, TaskRequest, TranslateRequest},
};

/// A finished translation. `target_language` echoes the requested code unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub translated_text: String,
    pub target_language: String,
}

#[derive(Clone)]
pub struct TaskRunner {
    generator: Arc<dyn TextGenerator>,
    timeout: Option<Duration>,
}

impl TaskRunner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: None,
        }
    }

    /// Bounds each generation call. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub async fn summarize(&self, request: SummarizeRequest) -> Result<String> {
        let reply = self.complete(&TaskRequest::Summarize(request)).await?;
        Ok(reply.trim().to_string())
    }

    pub async fn generate_faqs(&self, request: FaqRequest) -> Result<Vec<FaqItem>> {
        let reply = self.complete(&TaskRequest::GenerateFaq(request)).await?;
        parse_reply(reply, "Failed to parse FAQs")
    }

    pub async fn care_guidance(&self, request: CareGuidanceRequest) -> Result<Vec<CareTask>> {
        let reply = self.complete(&TaskRequest::CareGuidance(request)).await?;
        parse_reply(reply, "Failed to parse care guidance")
    }

    pub async fn translate(&self, request: TranslateRequest) -> Result<Translation> {
        let target_language = request.target_language().to_string();
        let reply = self.complete(&TaskRequest::Translate(request)).await?;
        Ok(Translation {
            translated_text: reply.trim().to_string(),
            target_language,
        })
    }

    /// Liveness probe against the generation service.
    pub async fn probe(&self) -> std::result::Result<Vec<String>, GenerationError> {
        self.generator.list_models().await
    }

    /// Returns the reply untrimmed so parse failures can report it verbatim.
    async fn complete(&self, request: &TaskRequest) -> Result<String> {
        request.validate()?;

        let kind = request.kind();
        info!(task = %kind, model = %self.model(), "{}", request.progress_message());

        let prompt = request.prompt();
        let options = request.sampling();
        let generation = self.generator.generate(&prompt, &options);

        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .unwrap_or(Err(GenerationError::Timeout(limit))),
            None => generation.await,
        };

        reply.map_err(|e| {
            error!(task = %kind, error = %e, "Generation failed");
            TaskError::from(e)
        })
    }
}

fn parse_reply<T: SequencedItem>(reply: String, message: &str) -> Result<Vec<T>> {
    match extract_items(&reply) {
        Ok(items) => {
            info!(count = items.len(), "Parsed structured reply");
            Ok(items)
        }
        Err(source) => {
            error!(error = %source, raw_response = %reply, "{}", message);
            Err(TaskError::Parse {
                message: message.to_string(),
                raw_response: reply,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{CareCategory, Priority};
    use crate::mock::MockGenerator;
    use crate::prompt::PRESERVE_MEDICAL_TERMS_NOTE;

    const SUMMARY: &str = "Patient discharged after laparoscopic cholecystectomy.";

    fn runner(generator: &Arc<MockGenerator>) -> TaskRunner {
        TaskRunner::new(generator.clone())
    }

    #[tokio::test]
    async fn test_summarize_returns_trimmed_reply() {
        let generator =
            Arc::new(MockGenerator::replying("\n  You had your gallbladder removed.  \n"));
        let text = runner(&generator)
            .summarize(SummarizeRequest {
                text: Some(SUMMARY.to_string()),
                options: None,
            })
            .await
            .unwrap();

        assert_eq!(text, "You had your gallbladder removed.");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains(SUMMARY));
        assert_eq!(calls[0].options.top_k, Some(40));
    }

    #[tokio::test]
    async fn test_validation_happens_before_generation() {
        let generator = Arc::new(MockGenerator::replying("unused"));
        let result = runner(&generator)
            .generate_faqs(FaqRequest {
                text: Some("  ".to_string()),
                num_questions: None,
            })
            .await;

        assert!(matches!(result, Err(TaskError::Validation(_))));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_care_guidance_parses_fenced_reply() {
        let reply = r#"Sure! Here is the list:
```json
[
  {"title": "Take antibiotics", "description": "Twice daily", "priority": "High", "category": "Medication"},
  {"title": "Walk", "priority": "Low", "category": "Lifestyle"}
]
```"#;
        let generator = Arc::new(MockGenerator::replying(reply));

        let tasks = runner(&generator)
            .care_guidance(CareGuidanceRequest {
                text: Some(SUMMARY.to_string()),
                num_items: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].priority, Some(Priority::High));
        assert_eq!(tasks[1].id, 2);
        assert_eq!(tasks[1].category, Some(CareCategory::Lifestyle));
        assert!(generator.calls()[0].prompt.contains("Create 2 care tasks."));
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_raw_reply() {
        let reply = "\nI'm sorry, here are some questions: [{\"question\": \"Why?\"}]\n\n";
        let generator = Arc::new(MockGenerator::replying(reply));

        let err = runner(&generator)
            .generate_faqs(FaqRequest {
                text: Some(SUMMARY.to_string()),
                num_questions: None,
            })
            .await
            .unwrap_err();

        match err {
            TaskError::Parse {
                message,
                raw_response,
                ..
            } => {
                assert_eq!(message, "Failed to parse FAQs");
                assert_eq!(raw_response, reply);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_translate_echoes_requested_code() {
        let generator = Arc::new(MockGenerator::replying("अनुवाद"));
        let translation = runner(&generator)
            .translate(TranslateRequest {
                text: Some(SUMMARY.to_string()),
                target_language: Some("xx".to_string()),
                preserve_medical_terms: Some(false),
            })
            .await
            .unwrap();

        assert_eq!(translation.target_language, "xx");
        assert_eq!(translation.translated_text, "अनुवाद");

        let call = &generator.calls()[0];
        assert!(call.prompt.contains("English to Hindi."));
        assert!(!call.prompt.contains(PRESERVE_MEDICAL_TERMS_NOTE));
        assert_eq!(call.options.temperature, 0.3);
    }

    #[tokio::test]
    async fn test_generation_failure_is_not_retried() {
        let generator = Arc::new(MockGenerator::failing("model 'mistral' not found"));
        let err = runner(&generator)
            .summarize(SummarizeRequest {
                text: Some(SUMMARY.to_string()),
                options: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Generation(GenerationError::Upstream(_))));
        assert!(err.to_string().contains("model 'mistral' not found"));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout() {
        let generator =
            Arc::new(MockGenerator::replying("late").with_delay(Duration::from_millis(500)));
        let runner = runner(&generator).with_timeout(Some(Duration::from_millis(20)));

        let err = runner
            .summarize(SummarizeRequest {
                text: Some(SUMMARY.to_string()),
                options: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Generation(GenerationError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_probe() {
        let healthy = Arc::new(MockGenerator::replying("").with_model("mistral"));
        assert_eq!(runner(&healthy).probe().await.unwrap(), vec!["mistral"]);

        let down = Arc::new(MockGenerator::replying("").unreachable("connection refused"));
        assert!(runner(&down).probe().await.is_err());
    }
}
