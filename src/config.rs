//! Runtime settings read from the environment.

use std::env;

use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

const API_URL_VAR: &str = "DEAL_PRICER_API_URL";
const API_TOKEN_VAR: &str = "DEAL_PRICER_API_TOKEN";
const MAILCHIMP_KEY_VAR: &str = "MAILCHIMP_API_KEY";
const MAILCHIMP_LIST_VAR: &str = "MAILCHIMP_LIST_ID";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub waitlist: Option<WaitlistCredentials>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct WaitlistCredentials {
    pub api_key: String,
    pub list_id: String,
}

// Keep the key out of logs.
impl std::fmt::Debug for WaitlistCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistCredentials")
            .field("api_key", &"***")
            .field("list_id", &self.list_id)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            waitlist: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = var(API_URL_VAR).unwrap_or_else(|| {
            info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let api_token = var(API_TOKEN_VAR);
        if api_token.is_none() {
            info!("{API_TOKEN_VAR} not set, backend requests will be anonymous");
        }

        let waitlist = match (var(MAILCHIMP_KEY_VAR), var(MAILCHIMP_LIST_VAR)) {
            (Some(api_key), Some(list_id)) => Some(WaitlistCredentials { api_key, list_id }),
            (None, None) => None,
            _ => {
                warn!("Only one of {MAILCHIMP_KEY_VAR}/{MAILCHIMP_LIST_VAR} is set, waitlist disabled");
                None
            }
        };

        Self {
            api_url,
            api_token,
            waitlist,
        }
    }
}
