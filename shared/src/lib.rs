//! Shared library for the Med-Echo Alexa skill.
//!
//! This crate provides the request router, the Alexa envelope types, and the
//! OpenFDA and Twilio clients used by the Lambda binary.

pub mod alexa;
pub mod config;
pub mod error;
pub mod intents;
pub mod openfda;
pub mod secrets;
pub mod skill;
pub mod twilio;

#[cfg(test)]
mod testutils;

pub use alexa::{AlexaRequest, ResponseEnvelope};
pub use config::Config;
pub use error::{Error, Result};
pub use intents::{DrugIntent, SkillIntent};
pub use openfda::{LabelLookup, LabelRecord, OpenFdaClient};
pub use secrets::{get_secret, get_twilio_credentials, TwilioCredentials};
pub use skill::Skill;
pub use twilio::{SmsSender, TwilioClient};
