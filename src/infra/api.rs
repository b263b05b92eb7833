//! Thin asynchronous client for the negotiation backend.
//!
//! - Only covers the vehicle data the pricing page consumes: preferences,
//!   the model catalogue and trims.
//! - Keeps the model catalogue in a 60-minute in-memory cache with a stale
//!   fallback when the backend is unreachable.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::{PreferencesUpdate, Trim, VehicleModels, VehiclePreferences};

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const USER_AGENT: &str = concat!("deal-pricer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct BackendCache {
    models: Option<Cached<VehicleModels>>,
}

/// `{ "error": "..." }` as the backend writes it on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    cache: Arc<Mutex<BackendCache>>,
    ttl: Duration,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(&config.api_url, config.api_token.clone())
    }

    pub fn with_base_url(base: &str, token: Option<String>) -> Result<Self, ApiClientError> {
        let base_url = parse_base_url(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            token,
            cache: Arc::new(Mutex::new(BackendCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `Ok(None)` when the user has not saved a vehicle yet.
    pub async fn get_preferences(&self) -> Result<Option<VehiclePreferences>, ApiClientError> {
        let url = self.url("preferences")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            info!("No preferences stored for this user");
            return Ok(None);
        }
        let prefs: VehiclePreferences = decode(response).await?;
        debug!(make = %prefs.make, model = %prefs.model, "Loaded preferences");
        Ok(Some(prefs))
    }

    pub async fn create_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<VehiclePreferences, ApiClientError> {
        let url = self.url("preferences")?;
        self.fetch(self.http.post(url).json(update)).await
    }

    pub async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<VehiclePreferences, ApiClientError> {
        let url = self.url("preferences")?;
        self.fetch(self.http.put(url).json(update)).await
    }

    /// Stores the vehicle, creating the record on first save. A create that
    /// hits an existing record (409) is retried as an update.
    pub async fn save_preferences(
        &self,
        update: &PreferencesUpdate,
        exists: bool,
    ) -> Result<VehiclePreferences, ApiClientError> {
        if exists {
            return self.update_preferences(update).await;
        }
        match self.create_preferences(update).await {
            Err(ApiClientError::Api { status: 409, .. }) => {
                debug!("Preferences already exist, updating instead");
                self.update_preferences(update).await
            }
            other => other,
        }
    }

    pub async fn get_models(&self) -> Result<CachedPayload<VehicleModels>, ApiClientError> {
        if let Some(payload) = self.cached_models().await {
            return Ok(payload);
        }

        let url = self.url("models")?;
        match self.fetch::<VehicleModels>(self.http.get(url)).await {
            Ok(models) => {
                info!("Fetched model catalogue for {} makes", models.len());
                Ok(self.store_models(models, CacheStatus::Fresh).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_models_stale().await {
                    warn!("Model catalogue request failed ({error}); serving stale copy");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn get_trims(
        &self,
        make: &str,
        model: &str,
        year: u16,
    ) -> Result<Vec<Trim>, ApiClientError> {
        let mut url = self.url("trims")?;
        url.query_pairs_mut()
            .append_pair("make", make)
            .append_pair("model", model)
            .append_pair("year", &year.to_string());
        debug!("Requesting trims from {url}");
        self.fetch(self.http.get(url)).await
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.models = None;
    }

    async fn cached_models(&self) -> Option<CachedPayload<VehicleModels>> {
        let cache = self.cache.lock().await;
        cache
            .models
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_models_stale(&self) -> Option<CachedPayload<VehicleModels>> {
        let cache = self.cache.lock().await;
        cache.models.as_ref().map(Cached::stale)
    }

    async fn store_models(
        &self,
        data: VehicleModels,
        status: CacheStatus,
    ) -> CachedPayload<VehicleModels> {
        self.store_models_at(data, SystemTime::now(), status).await
    }

    async fn store_models_at(
        &self,
        data: VehicleModels,
        fetched_at: SystemTime,
        status: CacheStatus,
    ) -> CachedPayload<VehicleModels> {
        let payload = CachedPayload::new(data.clone(), fetched_at, status);
        let mut cache = self.cache.lock().await;
        cache.models = Some(Cached::new(data, fetched_at));
        payload
    }

    async fn fetch<T>(&self, builder: RequestBuilder) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.authorized(builder).send().await?;
        decode(response).await
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// `Url::join` drops the last segment unless the base ends in `/`.
fn parse_base_url(base: &str) -> Result<Url, url::ParseError> {
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
}

async fn decode<T>(response: Response) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &str) -> ApiClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });
    ApiClientError::Api {
        status: status.as_u16(),
        message,
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}
