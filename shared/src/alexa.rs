//! Alexa Skills Kit request and response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Prefix applied to card titles and bodies.
const CARD_PREFIX: &str = "SessionSpeechlet - ";

/// Incoming Alexa event.
#[derive(Debug, Deserialize)]
pub struct AlexaRequest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    pub request: SkillRequest,
}

impl AlexaRequest {
    /// Attributes to echo back in the response, empty when absent.
    pub fn session_attributes(&self) -> Map<String, Value> {
        self.session
            .as_ref()
            .and_then(|s| s.attributes.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The `request` member, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    LaunchRequest(RequestMeta),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(other)]
    Unsupported,
}

impl SkillRequest {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SkillRequest::LaunchRequest(meta) => Some(&meta.request_id),
            SkillRequest::IntentRequest(req) => Some(&req.meta.request_id),
            SkillRequest::SessionEndedRequest(req) => Some(&req.meta.request_id),
            SkillRequest::Unsupported => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    pub request_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    #[serde(flatten)]
    pub meta: RequestMeta,
    pub intent: Intent,
}

#[derive(Debug, Deserialize)]
pub struct SessionEndedRequest {
    #[serde(flatten)]
    pub meta: RequestMeta,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A named user request with its slot values.
#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Trimmed, non-empty value of the named slot.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Outgoing Alexa envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: Map<String, Value>,
    pub response: SpeechletResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Build the speech, card and reprompt portion of a response.
pub fn build_speechlet_response(
    title: &str,
    output: &str,
    reprompt_text: Option<&str>,
    should_end_session: bool,
) -> SpeechletResponse {
    SpeechletResponse {
        output_speech: OutputSpeech::plain_text(output),
        card: Card {
            card_type: "Simple".to_string(),
            title: format!("{}{}", CARD_PREFIX, title),
            content: format!("{}{}", CARD_PREFIX, output),
        },
        reprompt: reprompt_text.map(|text| Reprompt {
            output_speech: OutputSpeech::plain_text(text),
        }),
        should_end_session,
    }
}

/// Wrap a speechlet response into the versioned envelope.
pub fn build_response(
    session_attributes: Map<String, Value>,
    speechlet: SpeechletResponse,
) -> ResponseEnvelope {
    ResponseEnvelope {
        version: "1.0".to_string(),
        session_attributes,
        response: speechlet,
    }
}
