//! Mailing-list signup against Mailchimp's members endpoint.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::WaitlistCredentials;

#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error("Valid email is required")]
    InvalidEmail,
    #[error("Waitlist service not configured")]
    NotConfigured,
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Provider { status: u16, detail: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitlistOutcome {
    Subscribed,
    AlreadySubscribed,
}

impl WaitlistOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Subscribed => "Successfully added to waitlist!",
            Self::AlreadySubscribed => "You are already on the waitlist!",
        }
    }
}

#[derive(Serialize)]
struct MemberRequest<'a> {
    email_address: &'a str,
    status: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

pub fn validate_email(email: &str) -> Result<&str, WaitlistError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(WaitlistError::InvalidEmail);
    }
    Ok(trimmed)
}

/// Mailchimp keys end in `-<datacenter>`, e.g. `abc123-us21`.
pub fn datacenter_from_key(api_key: &str) -> Option<&str> {
    api_key
        .rsplit_once('-')
        .map(|(_, dc)| dc)
        .filter(|dc| !dc.is_empty())
}

pub fn members_url(credentials: &WaitlistCredentials) -> Option<String> {
    let datacenter = datacenter_from_key(&credentials.api_key)?;
    Some(format!(
        "https://{datacenter}.api.mailchimp.com/3.0/lists/{}/members",
        credentials.list_id
    ))
}

/// Maps the provider's reply onto an outcome. An existing member is a success.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<WaitlistOutcome, WaitlistError> {
    if status.is_success() {
        return Ok(WaitlistOutcome::Subscribed);
    }

    let parsed: ProviderError = serde_json::from_str(body).unwrap_or_default();
    if status == StatusCode::BAD_REQUEST && parsed.title.as_deref() == Some("Member Exists") {
        return Ok(WaitlistOutcome::AlreadySubscribed);
    }

    Err(WaitlistError::Provider {
        status: status.as_u16(),
        detail: parsed
            .detail
            .unwrap_or_else(|| "Failed to add to waitlist".to_string()),
    })
}

#[derive(Clone)]
pub struct WaitlistClient {
    http: Client,
    credentials: Option<WaitlistCredentials>,
}

impl WaitlistClient {
    pub fn new(credentials: Option<WaitlistCredentials>) -> Self {
        Self {
            http: Client::new(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn subscribe(&self, email: &str) -> Result<WaitlistOutcome, WaitlistError> {
        let email = validate_email(email)?;
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            error!("Mailchimp credentials not configured");
            WaitlistError::NotConfigured
        })?;
        let url = members_url(credentials).ok_or_else(|| {
            error!("Mailchimp API key has no datacenter suffix");
            WaitlistError::NotConfigured
        })?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&credentials.api_key)
            .json(&MemberRequest {
                email_address: email,
                status: "subscribed",
            })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let outcome = interpret_response(status, &body);
        match &outcome {
            Ok(result) => info!(?result, "Waitlist signup handled"),
            Err(err) => error!("Waitlist subscription error: {err}"),
        }
        outcome
    }
}
