//! Configuration management for the skill Lambda.

use std::env;

use crate::{Error, Result};

/// Default OpenFDA drug label endpoint.
pub const DEFAULT_LABEL_ENDPOINT: &str = "https://api.fda.gov/drug/label.json";

/// Default Twilio REST API base.
pub const DEFAULT_MESSAGING_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Drug label lookup endpoint
    pub label_endpoint: String,
    /// Messaging API base URL (account path is appended)
    pub messaging_base_url: String,
    /// ARN of the secret containing Twilio credentials
    pub twilio_secret_arn: String,
    /// Phone number that receives reminder texts
    pub reminder_phone_number: String,
    /// Only confirm a reminder once the send was accepted
    pub require_delivery: bool,
    /// AWS region
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} not set", key)))
        };

        let require_delivery = match lookup("REMINDER_REQUIRE_DELIVERY") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("REMINDER_REQUIRE_DELIVERY is not a boolean: {}", raw))
            })?,
            None => false,
        };

        Ok(Self {
            label_endpoint: lookup("LABEL_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_LABEL_ENDPOINT.to_string()),
            messaging_base_url: lookup("MESSAGING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MESSAGING_BASE_URL.to_string()),
            twilio_secret_arn: required("TWILIO_SECRET_ARN")?,
            reminder_phone_number: required("REMINDER_PHONE_NUMBER")?,
            require_delivery,
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
