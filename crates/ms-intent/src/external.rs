//! External chat-model intent strategy (Azure OpenAI chat completions).

use std::time::Duration;

use ms_config::{AzureOpenAiConfig, IntentConfig};
use ms_core::{IntentLabel, IntentResult};
use ms_embeddings::http::check_response;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::IntentError;

/// Confidence assumed when the model omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// System prompt restricting the answer to the six categories.
pub const PROMPT: &str = "Classify the intent of this email thread. \
Return JSON only with keys: level3, confidence. \
Valid level3 values: service_request, urgent_escalation, \
status_inquiry, complaint, additional_info, requires_review.";

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for the intent deployment.
pub struct ExternalClassifier {
    http: reqwest::Client,
    url: String,
    api_key: String,
    max_chars: usize,
}

impl ExternalClassifier {
    /// Build a client, or `None` when the intent deployment is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Http`] if the HTTP client cannot be built.
    pub fn from_config(
        azure: &AzureOpenAiConfig,
        intent: &IntentConfig,
    ) -> Result<Option<Self>, IntentError> {
        if !azure.intent_configured() {
            return Ok(None);
        }
        let http = reqwest::Client::builder()
            .user_agent("mailsort/0.1")
            .timeout(Duration::from_secs(intent.timeout_secs))
            .build()?;
        Ok(Some(Self {
            http,
            url: azure.deployment_url(&azure.intent_deployment, "chat/completions"),
            api_key: azure.api_key.clone(),
            max_chars: intent.max_chars,
        }))
    }

    /// # Errors
    ///
    /// Transport, status and parse failures are returned as-is.
    pub async fn classify(&self, text: &str) -> Result<IntentResult, IntentError> {
        let body = json!({
            "messages": [
                {"role": "system", "content": PROMPT},
                {"role": "user", "content": truncate_chars(text, self.max_chars)},
            ],
            "temperature": 0,
            "response_format": {"type": "json_object"},
        });
        let resp = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(%e, "intent request failed"))?;
        let resp = check_response::<IntentError>(resp).await?;
        let chat: ChatResponse = resp.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());
        parse_content(&content)
    }
}

/// First `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices().nth(max).map_or(text, |(end, _)| &text[..end])
}

/// Parse the model's JSON answer.
///
/// Missing fields default to `requires_review` and [`DEFAULT_CONFIDENCE`].
/// A label outside the closed set also becomes `requires_review`.
fn parse_content(content: &str) -> Result<IntentResult, IntentError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| IntentError::MalformedResponse(format!("{e}: {content}")))?;
    let Value::Object(map) = value else {
        return Err(IntentError::MalformedResponse(content.to_string()));
    };

    let label = match map.get("level3") {
        None | Some(Value::Null) => IntentLabel::RequiresReview,
        Some(Value::String(raw)) => raw.parse::<IntentLabel>().unwrap_or_else(|_| {
            tracing::debug!(label = %raw, "unknown intent label from classifier");
            IntentLabel::RequiresReview
        }),
        Some(other) => {
            return Err(IntentError::MalformedResponse(format!("level3: {other}")));
        }
    };

    let confidence = match map.get("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| IntentError::MalformedResponse(format!("confidence: {n}")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| IntentError::MalformedResponse(format!("confidence: {s}")))?,
        Some(other) => {
            return Err(IntentError::MalformedResponse(format!("confidence: {other}")));
        }
    };

    Ok(IntentResult::new(label, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_answer() {
        let result = parse_content(r#"{"level3": "complaint", "confidence": 0.92}"#).unwrap();
        assert_eq!(result.label, IntentLabel::Complaint);
        assert!((result.confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let result = parse_content("{}").unwrap();
        assert_eq!(result.label, IntentLabel::RequiresReview);
        assert!((result.confidence - DEFAULT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_string_confidence_is_accepted() {
        let result = parse_content(r#"{"level3": "status_inquiry", "confidence": "0.7"}"#).unwrap();
        assert_eq!(result.label, IntentLabel::StatusInquiry);
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn unknown_label_becomes_review() {
        let result = parse_content(r#"{"level3": "billing", "confidence": 0.9}"#).unwrap();
        assert_eq!(result.label, IntentLabel::RequiresReview);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let result = parse_content(r#"{"level3": "complaint", "confidence": 3}"#).unwrap();
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_content("level3=complaint"),
            Err(IntentError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_content(r#"["complaint"]"#),
            Err(IntentError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_content(r#"{"confidence": "high"}"#),
            Err(IntentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn chat_envelope_fixture_parses() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {"role": "assistant", "content": "{\"level3\":\"urgent_escalation\",\"confidence\":0.88}"}
            }]
        }"#;
        let chat: ChatResponse = serde_json::from_str(json).unwrap();
        let content = chat.choices[0].message.content.as_deref().unwrap();
        assert_eq!(parse_content(content).unwrap().label, IntentLabel::UrgentEscalation);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("cotización", 8), "cotizaci");
        assert_eq!(truncate_chars("short", 6000), "short");
    }

    #[test]
    fn unconfigured_deployment_yields_none() {
        let client =
            ExternalClassifier::from_config(&AzureOpenAiConfig::default(), &IntentConfig::default())
                .unwrap();
        assert!(client.is_none());
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn live_classification_from_env() {
        let config = ms_config::MailsortConfig::load_with_dotenv().unwrap();
        let client = ExternalClassifier::from_config(&config.azure_openai, &config.intent)
            .unwrap()
            .unwrap();
        let result = client.classify("Where is my order? Any update?").await.unwrap();
        assert!(result.confidence > 0.0);
    }
}
