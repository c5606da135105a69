//! Typed items recovered from structured model replies.
//!
//! Every field the model is asked to produce is optional: a reply that leaves out a
//! `category` or uses a label outside the known set still yields an item, with the
//! field omitted. Identifiers are never read from the reply; they are assigned by
//! position once the array has been parsed.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

/// An item whose identifier is assigned from its 1-based position in the reply.
pub trait SequencedItem: DeserializeOwned {
    fn assign_id(&mut self, position: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaqCategory {
    Medication,
    Treatment,
    Lifestyle,
    Symptoms,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareCategory {
    Medication,
    Appointment,
    Monitoring,
    Lifestyle,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A patient question with its answer, identified as `faq-N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(skip_deserializing)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(
        default,
        deserialize_with = "known_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<FaqCategory>,
}

impl SequencedItem for FaqItem {
    fn assign_id(&mut self, position: usize) {
        self.id = format!("faq-{position}");
    }
}

/// An actionable care instruction, identified by its integer position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareTask {
    #[serde(skip_deserializing)]
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "known_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    #[serde(
        default,
        deserialize_with = "known_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<CareCategory>,
}

impl SequencedItem for CareTask {
    fn assign_id(&mut self, position: usize) {
        self.id = position;
    }
}

/// Reads an enum label, mapping anything unrecognised to `None`.
fn known_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
