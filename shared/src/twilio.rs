//! Twilio SMS delivery.

use serde::Deserialize;
use std::future::Future;
use tracing::{error, info};

use crate::secrets::TwilioCredentials;
use crate::{Error, Result};

/// Sends text messages to the configured recipient.
pub trait SmsSender {
    /// Send `body`, returning the provider's message id.
    fn send_sms(&self, body: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Subset of Twilio's message resource we care about.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// Twilio Messages API client bound to a single recipient.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Option<TwilioCredentials>,
    to_number: String,
}

impl TwilioClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: TwilioCredentials,
        to_number: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            credentials: Some(credentials),
            to_number: to_number.into(),
        }
    }

    /// Client for when credentials could not be loaded; every send fails
    /// with `Error::Delivery` without touching the network.
    pub fn without_credentials(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        to_number: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            credentials: None,
            to_number: to_number.into(),
        }
    }

    fn messages_url(&self, credentials: &TwilioCredentials) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            credentials.account_sid
        )
    }
}

impl SmsSender for TwilioClient {
    async fn send_sms(&self, body: &str) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Delivery("Twilio credentials unavailable".to_string()))?;

        let form = [
            ("To", self.to_number.as_str()),
            ("From", credentials.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .http_client
            .post(self.messages_url(credentials))
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Twilio send failed: {} - {}", status, body);
            return Err(Error::Delivery(format!("Twilio returned {}", status)));
        }

        let message: MessageResource = response.json().await?;
        info!(
            sid = %message.sid,
            status = message.status.as_deref().unwrap_or("unknown"),
            "Reminder text queued"
        );

        Ok(message.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{http_client, refused_url, serve_once};

    fn credentials() -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15555550123".to_string(),
        }
    }

    fn client(base_url: &str) -> TwilioClient {
        TwilioClient::new(http_client(), base_url, credentials(), "+15555550100")
    }

    #[test]
    fn test_messages_url() {
        assert_eq!(
            client("https://api.twilio.com/2010-04-01").messages_url(&credentials()),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(
            client("http://localhost:4010/").messages_url(&credentials()),
            "http://localhost:4010/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_parse_message_resource() {
        let message: MessageResource =
            serde_json::from_str(r#"{"sid":"SM1","status":"queued","to":"+15555550100"}"#).unwrap();
        assert_eq!(message.sid, "SM1");
        assert_eq!(message.status.as_deref(), Some("queued"));
    }

    #[tokio::test]
    async fn test_send_posts_form_with_basic_auth() {
        let (base_url, server) =
            serve_once("201 Created", r#"{"sid":"SM9","status":"queued"}"#).await;

        let sid = client(&base_url).send_sms("Hi there.").await.unwrap();
        assert_eq!(sid, "SM9");

        let request = server.await.unwrap();
        assert_eq!(
            request.request_line(),
            "POST /Accounts/AC123/Messages.json HTTP/1.1"
        );
        // base64("AC123:token")
        assert_eq!(request.header("authorization"), Some("Basic QUMxMjM6dG9rZW4="));
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.body,
            "To=%2B15555550100&From=%2B15555550123&Body=Hi+there."
        );
    }

    #[tokio::test]
    async fn test_send_rejected_is_delivery_error() {
        let (base_url, server) = serve_once(
            "401 Unauthorized",
            r#"{"code":20003,"message":"Authenticate"}"#,
        )
        .await;

        let err = client(&base_url).send_sms("Hi there.").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(msg) if msg == "Twilio returned 401 Unauthorized"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_http_error() {
        let base_url = refused_url().await;
        let err = client(&base_url).send_sms("Hi there.").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[tokio::test]
    async fn test_send_without_credentials_skips_network() {
        // A refused address would surface as Error::Http if a send were attempted.
        let base_url = refused_url().await;
        let client = TwilioClient::without_credentials(http_client(), base_url, "+15555550100");

        let err = client.send_sms("Hi there.").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(msg) if msg.contains("credentials unavailable")));
    }
}
