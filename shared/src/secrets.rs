//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Twilio credentials from Secrets Manager.
///
/// The `key`/`secret`/`number` spellings are accepted for secrets created
/// from the legacy credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioCredentials {
    #[serde(alias = "key")]
    pub account_sid: String,
    #[serde(alias = "secret")]
    pub auth_token: String,
    #[serde(alias = "number")]
    pub from_number: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    // Check cache first
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Get Twilio credentials from Secrets Manager.
pub async fn get_twilio_credentials(
    client: &SecretsClient,
    secret_arn: &str,
) -> Result<TwilioCredentials> {
    let secret_string = get_secret(client, secret_arn).await?;
    parse_twilio_credentials(&secret_string)
}

fn parse_twilio_credentials(secret_string: &str) -> Result<TwilioCredentials> {
    serde_json::from_str(secret_string)
        .map_err(|e| Error::Aws(format!("Failed to parse Twilio credentials: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials() {
        let json = r#"{"account_sid":"AC123","auth_token":"secret123","from_number":"+15555550123"}"#;
        let creds = parse_twilio_credentials(json).unwrap();
        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(creds.auth_token, "secret123");
        assert_eq!(creds.from_number, "+15555550123");
    }

    #[test]
    fn test_parse_legacy_credentials() {
        let json = r#"{"key":"AC999","secret":"tok","number":"+15555550199"}"#;
        let creds = parse_twilio_credentials(json).unwrap();
        assert_eq!(creds.account_sid, "AC999");
        assert_eq!(creds.from_number, "+15555550199");
    }

    #[test]
    fn test_parse_credentials_missing_field() {
        let err = parse_twilio_credentials(r#"{"account_sid":"AC123"}"#).unwrap_err();
        assert!(matches!(err, Error::Aws(msg) if msg.contains("Twilio credentials")));
    }
}
