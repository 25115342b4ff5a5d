//! Med-Echo request routing and response text.
//!
//! The router dispatches on the Alexa request type and intent name, calls
//! out to the label lookup or the SMS sender, and shapes the result into a
//! response envelope. No state is kept between invocations.

use tracing::{error, info, warn};

use crate::alexa::{
    build_response, build_speechlet_response, AlexaRequest, Intent, IntentRequest,
    ResponseEnvelope, SkillRequest, SpeechletResponse,
};
use crate::intents::{DrugIntent, SkillIntent};
use crate::openfda::LabelLookup;
use crate::twilio::SmsSender;
use crate::{Error, Result};

/// Slot carrying the spoken drug name.
pub const DRUG_SLOT: &str = "DrugName";

pub const WELCOME_TEXT: &str = "Welcome to Med-Echo. ";
pub const WELCOME_REPROMPT: &str = "Feel free to ask information regarding a prescription.";
pub const CLARIFY_DRUG_TEXT: &str = "Please specify a prescription for me to find info about.";
pub const NOT_ON_RECORD_TEXT: &str =
    "I wasn't able to find any information about that on record.";
pub const NOT_CAUGHT_TEXT: &str = "Sorry, I didn't catch that. Would you mind repeating that?";
pub const THANK_YOU_TEXT: &str = "No problem!";
pub const GOODBYE_TEXT: &str = "Thank you for trying Med-Echo. Have a nice day!";

/// Body of the reminder text message.
pub fn reminder_message(drug_name: &str) -> String {
    format!("Hi, Alexa here reminding you to take your {}.", drug_name)
}

fn reminder_confirmation(drug_name: &str) -> String {
    format!("Setting a text reminder for your {} prescription.", drug_name)
}

fn reminder_apology(drug_name: &str) -> String {
    format!(
        "Sorry, I couldn't send a reminder for your {} prescription right now.",
        drug_name
    )
}

fn welcome_response() -> SpeechletResponse {
    build_speechlet_response("Welcome", WELCOME_TEXT, Some(WELCOME_REPROMPT), false)
}

fn session_end_response() -> SpeechletResponse {
    build_speechlet_response("Session Ended", GOODBYE_TEXT, None, true)
}

/// The skill: routes events to the label lookup and the SMS sender.
pub struct Skill<L, S> {
    labels: L,
    sms: S,
    require_delivery: bool,
}

impl<L, S> Skill<L, S>
where
    L: LabelLookup,
    S: SmsSender,
{
    pub fn new(labels: L, sms: S) -> Self {
        Self {
            labels,
            sms,
            require_delivery: false,
        }
    }

    /// Only confirm reminders whose send was accepted.
    pub fn with_require_delivery(mut self, require_delivery: bool) -> Self {
        self.require_delivery = require_delivery;
        self
    }

    /// Handle one Alexa event.
    ///
    /// Returns `Ok(None)` for session-ended notifications, which take no
    /// response body. Unknown intents and request types are errors.
    pub async fn handle(&self, event: AlexaRequest) -> Result<Option<ResponseEnvelope>> {
        let request_id = event.request.request_id().unwrap_or("unknown");
        let session_id = event
            .session
            .as_ref()
            .map(|s| s.session_id.as_str())
            .unwrap_or("unknown");

        if let Some(application) = event.session.as_ref().and_then(|s| s.application.as_ref()) {
            info!(application_id = %application.application_id, "Received skill event");
        }
        if event.session.as_ref().is_some_and(|s| s.new) {
            info!(request_id, session_id, "Session started");
        }

        let speechlet = match &event.request {
            SkillRequest::LaunchRequest(meta) => {
                info!(
                    request_id,
                    session_id,
                    locale = ?meta.locale,
                    timestamp = ?meta.timestamp,
                    "Launch"
                );
                welcome_response()
            }
            SkillRequest::IntentRequest(request) => {
                info!(
                    request_id,
                    session_id,
                    intent = %request.intent.name,
                    timestamp = ?request.meta.timestamp,
                    "Intent"
                );
                self.on_intent(request).await?
            }
            SkillRequest::SessionEndedRequest(request) => {
                info!(request_id, session_id, reason = ?request.reason, "Session ended");
                return Ok(None);
            }
            SkillRequest::Unsupported => {
                return Err(Error::InvalidRequest("Unsupported request type".to_string()));
            }
        };

        Ok(Some(build_response(event.session_attributes(), speechlet)))
    }

    async fn on_intent(&self, request: &IntentRequest) -> Result<SpeechletResponse> {
        let intent = &request.intent;

        let response = match intent.name.parse::<SkillIntent>()? {
            SkillIntent::Drug(drug_intent) => self.drug_info(intent, drug_intent).await,
            SkillIntent::SetReminder => self.set_reminder(intent).await,
            SkillIntent::ThankYou => {
                build_speechlet_response(&intent.name, THANK_YOU_TEXT, None, true)
            }
            SkillIntent::Help => welcome_response(),
            SkillIntent::Stop | SkillIntent::Cancel => session_end_response(),
        };

        Ok(response)
    }

    /// Answer a drug-information intent from the label record.
    pub async fn drug_info(&self, intent: &Intent, drug_intent: DrugIntent) -> SpeechletResponse {
        let title = drug_intent.name();

        let Some(drug_name) = intent.slot_value(DRUG_SLOT) else {
            return build_speechlet_response(title, CLARIFY_DRUG_TEXT, Some(CLARIFY_DRUG_TEXT), false);
        };

        let label = match self.labels.fetch_label(drug_name).await {
            Ok(label) => label,
            Err(e) => {
                warn!(drug = %drug_name, error = %e, "Label lookup failed");
                return build_speechlet_response(
                    title,
                    CLARIFY_DRUG_TEXT,
                    Some(CLARIFY_DRUG_TEXT),
                    false,
                );
            }
        };

        match label.describe(drug_name, drug_intent) {
            Some(text) => build_speechlet_response(title, &text, None, false),
            None => {
                info!(drug = %drug_name, intent = title, "No mapped label fields on record");
                build_speechlet_response(title, NOT_ON_RECORD_TEXT, Some(NOT_ON_RECORD_TEXT), false)
            }
        }
    }

    /// Text a reminder for the named drug.
    pub async fn set_reminder(&self, intent: &Intent) -> SpeechletResponse {
        let title = SkillIntent::SetReminder.name();

        let Some(drug_name) = intent.slot_value(DRUG_SLOT) else {
            return build_speechlet_response(title, NOT_CAUGHT_TEXT, Some(CLARIFY_DRUG_TEXT), false);
        };

        let text = match self.sms.send_sms(&reminder_message(drug_name)).await {
            Ok(sid) => {
                info!(drug = %drug_name, sid = %sid, "Reminder sent");
                reminder_confirmation(drug_name)
            }
            Err(e) => {
                error!(drug = %drug_name, error = %e, "Failed to send reminder");
                if self.require_delivery {
                    reminder_apology(drug_name)
                } else {
                    reminder_confirmation(drug_name)
                }
            }
        };

        build_speechlet_response(title, &text, None, false)
    }
}
