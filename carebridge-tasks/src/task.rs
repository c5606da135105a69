use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TaskError},
    generator::SamplingOptions,
    prompt::{self, Language},
};

pub const DEFAULT_NUM_QUESTIONS: u32 = 6;
pub const DEFAULT_NUM_ITEMS: u32 = 7;
pub const DEFAULT_TARGET_LANGUAGE: &str = "hi";

const MISSING_TEXT: &str = "No text provided";

/// The kind of work a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Summarize,
    GenerateFaq,
    CareGuidance,
    Translate,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summarize => "summarize",
            TaskKind::GenerateFaq => "generate-faq",
            TaskKind::CareGuidance => "care-guidance",
            TaskKind::Translate => "translate",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation hints accepted with a summarize request. They are not used when
/// building the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Option<SummarizeOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaqRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub num_questions: Option<u32>,
}

impl FaqRequest {
    pub fn num_questions(&self) -> u32 {
        self.num_questions.unwrap_or(DEFAULT_NUM_QUESTIONS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareGuidanceRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub num_items: Option<u32>,
}

impl CareGuidanceRequest {
    pub fn num_items(&self) -> u32 {
        self.num_items.unwrap_or(DEFAULT_NUM_ITEMS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub preserve_medical_terms: Option<bool>,
}

impl TranslateRequest {
    /// The language code exactly as supplied, or the default code.
    pub fn target_language(&self) -> &str {
        self.target_language
            .as_deref()
            .unwrap_or(DEFAULT_TARGET_LANGUAGE)
    }

    pub fn language(&self) -> Language {
        Language::resolve(self.target_language())
    }

    pub fn preserve_medical_terms(&self) -> bool {
        self.preserve_medical_terms.unwrap_or(true)
    }
}

/// One inbound task of any kind.
#[derive(Debug, Clone)]
pub enum TaskRequest {
    Summarize(SummarizeRequest),
    GenerateFaq(FaqRequest),
    CareGuidance(CareGuidanceRequest),
    Translate(TranslateRequest),
}

impl TaskRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskRequest::Summarize(_) => TaskKind::Summarize,
            TaskRequest::GenerateFaq(_) => TaskKind::GenerateFaq,
            TaskRequest::CareGuidance(_) => TaskKind::CareGuidance,
            TaskRequest::Translate(_) => TaskKind::Translate,
        }
    }

    /// Source text, or the empty string when absent.
    pub fn text(&self) -> &str {
        let text = match self {
            TaskRequest::Summarize(r) => &r.text,
            TaskRequest::GenerateFaq(r) => &r.text,
            TaskRequest::CareGuidance(r) => &r.text,
            TaskRequest::Translate(r) => &r.text,
        };
        text.as_deref().unwrap_or_default()
    }

    /// Rejects requests that must not reach the generator.
    pub fn validate(&self) -> Result<()> {
        if self.text().trim().is_empty() {
            return Err(TaskError::Validation(MISSING_TEXT.to_string()));
        }

        match self {
            TaskRequest::GenerateFaq(r) if r.num_questions() == 0 => Err(TaskError::Validation(
                "num_questions must be at least 1".to_string(),
            )),
            TaskRequest::CareGuidance(r) if r.num_items() == 0 => Err(TaskError::Validation(
                "num_items must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn prompt(&self) -> String {
        let text = self.text();
        match self {
            TaskRequest::Summarize(_) => prompt::summarize_prompt(text),
            TaskRequest::GenerateFaq(r) => prompt::faq_prompt(text, r.num_questions()),
            TaskRequest::CareGuidance(r) => prompt::care_guidance_prompt(text, r.num_items()),
            TaskRequest::Translate(r) => {
                prompt::translate_prompt(text, r.language(), r.preserve_medical_terms())
            }
        }
    }

    pub fn sampling(&self) -> SamplingOptions {
        match self {
            TaskRequest::Summarize(_) => {
                SamplingOptions::with_temperature(0.7).top_p(0.9).top_k(40)
            }
            TaskRequest::GenerateFaq(_) | TaskRequest::CareGuidance(_) => {
                SamplingOptions::with_temperature(0.7)
            }
            TaskRequest::Translate(_) => SamplingOptions::with_temperature(0.3),
        }
    }

    /// Progress line logged before the generation call.
    pub fn progress_message(&self) -> String {
        match self {
            TaskRequest::Summarize(_) => "Generating simplified summary".to_string(),
            TaskRequest::GenerateFaq(_) => "Generating FAQs".to_string(),
            TaskRequest::CareGuidance(_) => "Generating care guidance".to_string(),
            TaskRequest::Translate(r) => format!("Translating to {}", r.language().display_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PRESERVE_MEDICAL_TERMS_NOTE;
    use serde_json::json;

    fn faq(text: Option<&str>, num_questions: Option<u32>) -> TaskRequest {
        TaskRequest::GenerateFaq(FaqRequest {
            text: text.map(str::to_string),
            num_questions,
        })
    }

    #[test]
    fn test_missing_or_blank_text_is_rejected() {
        for text in [None, Some(""), Some("   \n\t")] {
            let err = faq(text, None).validate().unwrap_err();
            assert!(matches!(err, TaskError::Validation(ref m) if m == "No text provided"));
        }
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(faq(Some("summary"), Some(0)).validate().is_err());

        let care = TaskRequest::CareGuidance(CareGuidanceRequest {
            text: Some("summary".to_string()),
            num_items: Some(0),
        });
        assert!(care.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let request: FaqRequest = serde_json::from_value(json!({ "text": "t" })).unwrap();
        assert_eq!(request.num_questions(), 6);

        let request: CareGuidanceRequest =
            serde_json::from_value(json!({ "text": "t", "num_items": null })).unwrap();
        assert_eq!(request.num_items(), 7);

        let request: TranslateRequest = serde_json::from_value(json!({ "text": "t" })).unwrap();
        assert_eq!(request.target_language(), "hi");
        assert!(request.preserve_medical_terms());
    }

    #[test]
    fn test_sampling_per_kind() {
        let summarize = TaskRequest::Summarize(SummarizeRequest::default()).sampling();
        assert_eq!(summarize.temperature, 0.7);
        assert_eq!(summarize.top_p, Some(0.9));
        assert_eq!(summarize.top_k, Some(40));

        let faq = faq(None, None).sampling();
        assert_eq!(faq, SamplingOptions::with_temperature(0.7));

        let translate = TaskRequest::Translate(TranslateRequest::default()).sampling();
        assert_eq!(translate, SamplingOptions::with_temperature(0.3));
    }

    #[test]
    fn test_unrecognised_language_prompts_in_hindi() {
        let request = TaskRequest::Translate(TranslateRequest {
            text: Some("Take rest.".to_string()),
            target_language: Some("xx".to_string()),
            preserve_medical_terms: None,
        });

        let prompt = request.prompt();
        assert!(prompt.contains("from English to Hindi."));
        assert!(prompt.contains(PRESERVE_MEDICAL_TERMS_NOTE));
        assert_eq!(request.progress_message(), "Translating to Hindi");
    }

    #[test]
    fn test_preserve_medical_terms_false_omits_note() {
        let request = TaskRequest::Translate(TranslateRequest {
            text: Some("Take rest.".to_string()),
            target_language: Some("kn".to_string()),
            preserve_medical_terms: Some(false),
        });
        assert!(!request.prompt().contains(PRESERVE_MEDICAL_TERMS_NOTE));
    }

    #[test]
    fn test_kind_and_prompt_follow_variant() {
        let request = TaskRequest::CareGuidance(CareGuidanceRequest {
            text: Some("Discharged after appendectomy.".to_string()),
            num_items: Some(3),
        });

        assert_eq!(request.kind(), TaskKind::CareGuidance);
        assert_eq!(request.kind().to_string(), "care-guidance");
        assert!(request.prompt().contains("Create 3 care tasks."));
        assert!(request.prompt().contains("Discharged after appendectomy."));
    }
}
