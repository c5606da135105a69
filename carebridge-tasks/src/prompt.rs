//! Prompt templates, one per task.
//!
//! Source text is embedded verbatim with no escaping or length limit.

/// Target language for translation. Unrecognised codes resolve to Hindi.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Hindi,
    Kannada,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hi" => Some(Language::Hindi),
            "kn" => Some(Language::Kannada),
            _ => None,
        }
    }

    /// Resolves a code, falling back to the default language.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::Kannada => "kn",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
        }
    }
}

pub const PRESERVE_MEDICAL_TERMS_NOTE: &str =
    "Keep important medical terms in English (in parentheses if needed) to avoid confusion.";

pub fn summarize_prompt(text: &str) -> String {
    format!(
        "You are a medical text simplification expert. Your task is to convert complex medical discharge summaries into clear, patient-friendly language.

Guidelines:
- Use simple, everyday words instead of medical jargon
- Organize information clearly with sections
- Maintain medical accuracy
- Be compassionate and encouraging
- Explain medical terms when necessary

Original Medical Document:
{text}

Please provide a simplified, patient-friendly version:"
    )
}

pub fn faq_prompt(text: &str, num_questions: u32) -> String {
    format!(
        r#"Based on this medical summary, generate {num_questions} frequently asked questions that a patient might have, along with clear, helpful answers.

Medical Summary:
{text}

Create {num_questions} FAQs. For each FAQ, provide:
- question: The patient's question
- answer: Clear, helpful answer
- category: One of [Medication, Treatment, Lifestyle, Symptoms, Follow-up, Emergency]

Return ONLY a valid JSON array in this exact format:
[
  {{
    "question": "What medications should I take?",
    "answer": "Clear answer here",
    "category": "Medication"
  }}
]

JSON FAQs:"#
    )
}

pub fn care_guidance_prompt(text: &str, num_items: u32) -> String {
    format!(
        r#"Based on this medical summary, create {num_items} specific, actionable care guidance tasks for the patient.

Medical Summary:
{text}

Create {num_items} care tasks. For each task, provide:
- title: Brief task title
- description: Detailed, clear instructions
- priority: One of [High, Medium, Low]
- category: One of [Medication, Appointment, Monitoring, Lifestyle, Emergency]

Return ONLY a valid JSON array in this exact format:
[
  {{
    "title": "Take Medications as Prescribed",
    "description": "Detailed instructions here",
    "priority": "High",
    "category": "Medication"
  }}
]

JSON Care Guidance:"#
    )
}

pub fn translate_prompt(text: &str, language: Language, preserve_medical_terms: bool) -> String {
    let language = language.display_name();
    let instructions = if preserve_medical_terms {
        format!(
            "Maintain a patient-friendly tone and ensure accuracy. {PRESERVE_MEDICAL_TERMS_NOTE}"
        )
    } else {
        "Maintain a patient-friendly tone and ensure accuracy.".to_string()
    };

    format!(
        "Translate the following medical discharge summary from English to {language}.
{instructions}

English Text:
{text}

{language} Translation:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "Pt admitted w/ CAP, tx'd w/ IV abx. D/C on PO amoxicillin.";

    #[test]
    fn test_language_resolution() {
        assert_eq!(Language::resolve("hi"), Language::Hindi);
        assert_eq!(Language::resolve("kn"), Language::Kannada);
        assert_eq!(Language::resolve("xx"), Language::Hindi);
        assert_eq!(Language::resolve("KN"), Language::Hindi);
        assert_eq!(Language::Kannada.code(), "kn");
    }

    #[test]
    fn test_source_text_embedded_verbatim() {
        let text = "Line one {braces} and \"quotes\"\n```json\n[]\n```";
        for prompt in [
            summarize_prompt(text),
            faq_prompt(text, 6),
            care_guidance_prompt(text, 7),
            translate_prompt(text, Language::Hindi, true),
        ] {
            assert!(prompt.contains(text));
        }
    }

    #[test]
    fn test_faq_prompt_counts_and_format() {
        let prompt = faq_prompt(SUMMARY, 4);
        assert!(prompt.starts_with("Based on this medical summary, generate 4 frequently"));
        assert!(prompt.contains("Create 4 FAQs."));
        assert!(prompt.contains("\"category\": \"Medication\"\n  }\n]"));
        assert!(prompt.ends_with("JSON FAQs:"));
    }

    #[test]
    fn test_care_guidance_prompt_counts() {
        let prompt = care_guidance_prompt(SUMMARY, 9);
        assert!(prompt.contains("create 9 specific, actionable care guidance tasks"));
        assert!(prompt.contains("Create 9 care tasks."));
        assert!(prompt.contains("priority: One of [High, Medium, Low]"));
        assert!(prompt.ends_with("JSON Care Guidance:"));
    }

    #[test]
    fn test_translate_prompt_language_and_note() {
        let with_note = translate_prompt(SUMMARY, Language::Kannada, true);
        assert!(with_note.starts_with(
            "Translate the following medical discharge summary from English to Kannada."
        ));
        assert!(with_note.contains(PRESERVE_MEDICAL_TERMS_NOTE));
        assert!(with_note.ends_with("Kannada Translation:"));

        let without_note = translate_prompt(SUMMARY, Language::Kannada, false);
        assert!(!without_note.contains(PRESERVE_MEDICAL_TERMS_NOTE));
        assert!(without_note.contains("ensure accuracy.\n"));
    }

    #[test]
    fn test_summarize_prompt_shape() {
        let prompt = summarize_prompt(SUMMARY);
        assert!(prompt.contains(&format!("Original Medical Document:\n{SUMMARY}\n")));
        assert!(prompt.ends_with("patient-friendly version:"));
    }
}
