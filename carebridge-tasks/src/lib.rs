pub mod error;
pub mod extract;
pub mod generator;
pub mod items;
pub mod mock;
#[cfg(feature = "rig")]
pub mod ollama;
pub mod prompt;
pub mod runner;
pub mod task;

// Re-export commonly used types
pub use error::{ExtractError, GenerationError, Result, TaskError};
pub use extract::{Strategy, extract_items, extract_json_array};
pub use generator::{SamplingOptions, TextGenerator};
pub use items::{CareCategory, CareTask, FaqCategory, FaqItem, Priority, SequencedItem};
pub use mock::MockGenerator;
#[cfg(feature = "rig")]
pub use ollama::OllamaGenerator;
pub use prompt::Language;
pub use runner::{TaskRunner, Translation};
pub use task::{
    CareGuidanceRequest, FaqRequest, SummarizeOptions, SummarizeRequest, TaskKind, TaskRequest,
    TranslateRequest,
};
