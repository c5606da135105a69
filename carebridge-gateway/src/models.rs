use carebridge_tasks::{CareTask, FaqItem};
use serde::{Deserialize, Serialize};

pub const AVAILABLE_ENDPOINTS: [&str; 5] = [
    "GET /health",
    "POST /api/summarize",
    "POST /api/generate-faq",
    "POST /api/care-guidance",
    "POST /api/translate",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub simplified_text: String,
    pub model: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub faqs: Vec<FaqItem>,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CareGuidanceResponse {
    pub care_guidance: Vec<CareTask>,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub target_language: String,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub message: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok(model: &str) -> Self {
        Self {
            status: "ok".to_string(),
            model: Some(model.to_string()),
            message: "Backend is healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            status: "error".to_string(),
            model: None,
            message: format!("Ollama not available: {reason}"),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub available_endpoints: Vec<String>,
}

impl Default for NotFoundResponse {
    fn default() -> Self {
        Self {
            error: "Endpoint not found".to_string(),
            available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
