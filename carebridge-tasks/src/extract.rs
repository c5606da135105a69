//! Recovery of a JSON array from free-form model output.
//!
//! Models asked for "ONLY a valid JSON array" still wrap it in a fenced code block
//! often enough that the reply cannot be parsed directly. Candidates are taken in a
//! fixed order:
//!
//! 1. the body of the first ```` ```json ```` block,
//! 2. the body of the first fenced block of any kind, minus a language tag line,
//! 3. the whole trimmed reply.
//!
//! The first candidate that parses as a JSON array of the expected items wins. Nothing
//! beyond that is attempted: an array surrounded by prose without fences is a failure.

use serde_json::Value;
use tracing::debug;

use crate::error::ExtractError;
use crate::items::SequencedItem;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TaggedFence,
    AnyFence,
    Raw,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [Strategy::TaggedFence, Strategy::AnyFence, Strategy::Raw];

    /// The slice of `reply` this strategy would parse, if it applies at all.
    pub fn candidate<'a>(&self, reply: &'a str) -> Option<&'a str> {
        match self {
            Strategy::TaggedFence => fenced_body(reply, JSON_FENCE),
            Strategy::AnyFence => fenced_body(reply, FENCE).map(strip_language_tag),
            Strategy::Raw => Some(reply),
        }
        .map(str::trim)
    }
}

/// Text between `opening` and the next fence. An unterminated block runs to the end.
fn fenced_body<'a>(reply: &'a str, opening: &str) -> Option<&'a str> {
    let start = reply.find(opening)? + opening.len();
    let rest = &reply[start..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn strip_language_tag(block: &str) -> &str {
    match block.split_once('\n') {
        Some((first, body)) if is_language_tag(first.trim()) => body,
        _ => block,
    }
}

fn is_language_tag(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

/// Extracts the JSON array carried by `reply`.
pub fn extract_json_array(reply: &str) -> Result<Vec<Value>, ExtractError> {
    extract_with(reply, Ok)
}

/// Extracts the array and converts each element into `T`, numbering from 1 in reply order.
///
/// A candidate that is an array but does not hold `T` items falls through to the next
/// strategy like any other failed candidate.
pub fn extract_items<T: SequencedItem>(reply: &str) -> Result<Vec<T>, ExtractError> {
    extract_with(reply, convert_items)
}

/// Walks the strategies in order and returns the first candidate `convert` accepts.
/// When none does, the last failure is returned.
fn extract_with<T, F>(reply: &str, convert: F) -> Result<T, ExtractError>
where
    F: Fn(Vec<Value>) -> Result<T, ExtractError>,
{
    let reply = reply.trim();
    let mut last_error = ExtractError::NotAnArray;

    for strategy in Strategy::ORDER {
        let Some(candidate) = strategy.candidate(reply) else {
            continue;
        };

        let elements = match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(elements)) => elements,
            Ok(_) => {
                last_error = ExtractError::NotAnArray;
                continue;
            }
            Err(e) => {
                last_error = ExtractError::Json(e);
                continue;
            }
        };

        let count = elements.len();
        match convert(elements) {
            Ok(converted) => {
                debug!(?strategy, count, "Recovered JSON array");
                return Ok(converted);
            }
            Err(e) => {
                debug!(?strategy, error = %e, "Array rejected, trying next strategy");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

fn convert_items<T: SequencedItem>(elements: Vec<Value>) -> Result<Vec<T>, ExtractError> {
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            if !element.is_object() {
                return Err(ExtractError::NotAnObject { index });
            }
            let mut item: T = serde_json::from_value(element)
                .map_err(|source| ExtractError::Item { index, source })?;
            item.assign_id(index + 1);
            Ok(item)
        })
        .collect()
}
