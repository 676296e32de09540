//! Shared domain and wire types for the battery SOH dashboard client

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Number of cell voltage readings in one submission (U1..U21)
pub const CELL_COUNT: usize = 21;

/// Health classification derived from a prediction response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    /// Classify from the service's status string, taken verbatim: only the
    /// exact string `"Healthy"` classifies as healthy. The numeric SOH score
    /// is display-only and never re-thresholded on the client.
    pub fn from_label(label: &str) -> HealthStatus {
        if label == "Healthy" {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Get the display name for this status
    pub fn display_name(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Unhealthy => "Unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Response body of `POST /predict`
///
/// `metrics` and `importance` keep the key order of the wire body: metric
/// display order and importance tie-breaking both depend on it.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResponse {
    pub soh: f64,
    pub status: String,
    #[serde(deserialize_with = "ordered_entries")]
    pub metrics: Vec<(String, f64)>,
    #[serde(deserialize_with = "ordered_entries")]
    pub importance: Vec<(String, f64)>,
}

fn ordered_entries<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntryVisitor;

    impl<'de> Visitor<'de> for EntryVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of numeric values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, f64>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntryVisitor)
}

/// Response body of `POST /chat`; the provenance tag is optional on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReply {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Provenance of an assistant answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerSource {
    /// The domain model-explanation path
    Model,
    /// The general-purpose knowledge backend
    ExternalKnowledge,
    /// Any other tag the service may emit
    System,
    /// Local stand-in for a failed request
    Error,
}

impl AnswerSource {
    /// Resolve the wire tag into a source. An absent tag is attributed to
    /// the general-knowledge backend — the service only labels answers that
    /// came from the domain model, so missing provenance is a defined
    /// default here, not an error.
    pub fn resolve(tag: Option<&str>) -> AnswerSource {
        match tag {
            None => AnswerSource::ExternalKnowledge,
            Some("model") => AnswerSource::Model,
            Some("chatgpt") => AnswerSource::ExternalKnowledge,
            Some(_) => AnswerSource::System,
        }
    }

    /// Attribution label shown above an assistant message, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            AnswerSource::Model => Some("📊 Model"),
            AnswerSource::ExternalKnowledge => Some("🤖 ChatGPT"),
            AnswerSource::System => Some("🧩 System"),
            AnswerSource::Error => None,
        }
    }
}

/// How the next question is interpreted by the answer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssistantMode {
    #[default]
    GeneralKnowledge,
    ExplainPrediction,
}

impl AssistantMode {
    /// Get the wire value sent to the answer service
    pub fn wire_value(&self) -> &'static str {
        match self {
            AssistantMode::GeneralKnowledge => "general",
            AssistantMode::ExplainPrediction => "explain",
        }
    }

    /// Get the display name for this mode
    pub fn display_name(&self) -> &'static str {
        match self {
            AssistantMode::GeneralKnowledge => "General Knowledge",
            AssistantMode::ExplainPrediction => "Explain Prediction",
        }
    }

    /// Get all supported modes
    pub fn all() -> Vec<AssistantMode> {
        vec![
            AssistantMode::GeneralKnowledge,
            AssistantMode::ExplainPrediction,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<AssistantMode> {
        match s.to_lowercase().as_str() {
            "general" | "knowledge" => Some(AssistantMode::GeneralKnowledge),
            "explain" | "prediction" => Some(AssistantMode::ExplainPrediction),
            _ => None,
        }
    }
}

impl fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Who authored a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the append-only conversation history. Immutable once
/// appended; `source` and `label` are set for assistant messages only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub source: Option<AnswerSource>,
    pub label: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create the optimistic local echo of a user question
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            source: None,
            label: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message with its resolved source and label
    pub fn assistant(text: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            source: Some(source),
            label: source.label().map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_label_verbatim() {
        assert_eq!(HealthStatus::from_label("Healthy"), HealthStatus::Healthy);
        assert_eq!(
            HealthStatus::from_label("Unhealthy"),
            HealthStatus::Unhealthy
        );
        // Anything that is not the exact service string is unhealthy
        assert_eq!(HealthStatus::from_label("healthy"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::from_label("HEALTHY"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::from_label(""), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::from_label("ok"), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_source_resolution() {
        assert_eq!(
            AnswerSource::resolve(Some("model")),
            AnswerSource::Model
        );
        assert_eq!(
            AnswerSource::resolve(Some("chatgpt")),
            AnswerSource::ExternalKnowledge
        );
        assert_eq!(
            AnswerSource::resolve(Some("retrieval")),
            AnswerSource::System
        );
        // Missing tag defaults to the general-knowledge backend
        assert_eq!(AnswerSource::resolve(None), AnswerSource::ExternalKnowledge);
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(AnswerSource::Model.label(), Some("📊 Model"));
        assert_eq!(AnswerSource::ExternalKnowledge.label(), Some("🤖 ChatGPT"));
        assert_eq!(AnswerSource::System.label(), Some("🧩 System"));
        assert_eq!(AnswerSource::Error.label(), None);
    }

    #[test]
    fn test_mode_wire_values() {
        assert_eq!(AssistantMode::GeneralKnowledge.wire_value(), "general");
        assert_eq!(AssistantMode::ExplainPrediction.wire_value(), "explain");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            AssistantMode::from_str("general"),
            Some(AssistantMode::GeneralKnowledge)
        );
        assert_eq!(
            AssistantMode::from_str("explain"),
            Some(AssistantMode::ExplainPrediction)
        );
        assert_eq!(
            AssistantMode::from_str("EXPLAIN"),
            Some(AssistantMode::ExplainPrediction)
        );
        assert_eq!(AssistantMode::from_str("unknown"), None);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(
            AssistantMode::GeneralKnowledge.to_string(),
            "General Knowledge"
        );
        assert_eq!(
            AssistantMode::ExplainPrediction.to_string(),
            "Explain Prediction"
        );
    }

    #[test]
    fn test_prediction_response_preserves_wire_order() {
        // Keys deliberately out of alphabetical order
        let body = r#"{
            "soh": 0.91,
            "status": "Healthy",
            "metrics": {"R2": 0.95, "MSE": 0.002, "MAE": 0.01},
            "importance": {"U7": 0.08, "U3": 0.12, "U1": 0.05}
        }"#;

        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        let metric_names: Vec<&str> =
            response.metrics.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(metric_names, vec!["R2", "MSE", "MAE"]);

        let importance_names: Vec<&str> =
            response.importance.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(importance_names, vec!["U7", "U3", "U1"]);
    }

    #[test]
    fn test_answer_reply_optional_source() {
        let with_source: AnswerReply =
            serde_json::from_str(r#"{"answer": "X", "source": "model"}"#).unwrap();
        assert_eq!(with_source.source.as_deref(), Some("model"));

        let without_source: AnswerReply =
            serde_json::from_str(r#"{"answer": "X"}"#).unwrap();
        assert_eq!(without_source.answer, "X");
        assert_eq!(without_source.source, None);

        // A body with no answer field is malformed, not defaulted
        assert!(serde_json::from_str::<AnswerReply>(r#"{"source": "model"}"#).is_err());
    }

    #[test]
    fn test_assistant_message_carries_label() {
        let message = ChatMessage::assistant("hello", AnswerSource::Model);
        assert_eq!(message.sender, Sender::Assistant);
        assert_eq!(message.source, Some(AnswerSource::Model));
        assert_eq!(message.label.as_deref(), Some("📊 Model"));

        let echo = ChatMessage::user("hi");
        assert_eq!(echo.sender, Sender::User);
        assert_eq!(echo.source, None);
        assert_eq!(echo.label, None);
    }
}
