//! Med-Echo Alexa Skill Lambda - Answers drug label questions and texts
//! medication reminders.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{
    get_twilio_credentials, AlexaRequest, Config, OpenFdaClient, ResponseEnvelope, Skill,
    TwilioClient,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    skill: Skill<OpenFdaClient, TwilioClient>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

        let http_client = reqwest::Client::new();
        let labels = OpenFdaClient::new(http_client.clone(), config.label_endpoint.clone());

        // Drug lookups do not need Twilio, so a bad secret only disables reminders.
        let sms = match get_twilio_credentials(&secrets_client, &config.twilio_secret_arn).await {
            Ok(credentials) => TwilioClient::new(
                http_client,
                config.messaging_base_url.clone(),
                credentials,
                config.reminder_phone_number.clone(),
            ),
            Err(e) => {
                error!(error = %e, "Failed to load Twilio credentials, reminders disabled");
                TwilioClient::without_credentials(
                    http_client,
                    config.messaging_base_url.clone(),
                    config.reminder_phone_number.clone(),
                )
            }
        };

        info!(
            label_endpoint = %config.label_endpoint,
            require_delivery = config.require_delivery,
            "Skill initialized"
        );

        Ok(Self {
            skill: Skill::new(labels, sms).with_require_delivery(config.require_delivery),
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<AlexaRequest>,
) -> Result<Option<ResponseEnvelope>, Error> {
    let (payload, context) = event.into_parts();

    match state.skill.handle(payload).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(aws_request_id = %context.request_id, error = %e, "Skill request failed");
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
