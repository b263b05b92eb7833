use std::time::{Duration, SystemTime};

use dioxus::{prelude::*, signals::Signal};

use deal_pricer::{
    config::AppConfig,
    domain::{AppState, CacheResource, Trim},
    infra::{
        api::{BackendClient, CacheStatus},
        waitlist::WaitlistClient,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

use crate::ui::{
    components::toast::{push_toast, Toast, ToastKind, ToastMessage},
    pages::{PricingPage, SettingsPage},
    shell::Shell,
};

/// Shared TTL for API cache before a refresh is triggered.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Pricing {},
    #[route("/settings")]
    Settings {},
}

/// Clients built once from the environment and shared through context.
#[derive(Clone)]
pub struct Services {
    pub config: AppConfig,
    pub backend: Option<BackendClient>,
    pub waitlist: WaitlistClient,
}

impl Services {
    fn from_config(config: AppConfig) -> Self {
        let backend = match BackendClient::new(&config) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::error!("Backend client unavailable: {err}");
                None
            }
        };
        let waitlist = WaitlistClient::new(config.waitlist.clone());
        Self {
            config,
            backend,
            waitlist,
        }
    }
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let services = use_hook(|| Services::from_config(AppConfig::load()));
    use_context_provider(|| services.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    let _models = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let services = services.clone();
        move || {
            let services = services.clone();
            async move { fetch_models(state.clone(), toasts.clone(), services).await }
        }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!("Failed to persist user state: {err}");
    }
}

async fn fetch_models(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    services: Services,
) -> Option<CacheStatus> {
    let Some(client) = services.backend else {
        push_toast(toasts, ToastKind::Error, "Backend client is not configured.");
        return None;
    };

    match client.get_models().await {
        Ok(payload) => {
            state.with_mut(|st| {
                st.models = payload.data.clone();
                st.cache.record_fetch(CacheResource::Models, payload.fetched_at);
            });
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "Loaded cached model list; data might be stale.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            tracing::warn!("Model catalogue unavailable: {err}");
            push_toast(
                toasts,
                ToastKind::Warning,
                format!("Model suggestions unavailable: {err}"),
            );
            None
        }
    }
}

/// Pulls the saved vehicle from the backend and copies it into the form.
pub async fn load_preferences(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    services: Services,
) {
    let Some(client) = services.backend else {
        push_toast(toasts, ToastKind::Error, "Backend client is not configured.");
        return;
    };

    match client.get_preferences().await {
        Ok(Some(prefs)) => {
            let label = prefs.display_name();
            let has_msrp = state.with_mut(|st| {
                let has_msrp = st.draft.apply_preferences(&prefs);
                st.preferences = Some(prefs);
                st.cache
                    .record_fetch(CacheResource::Preferences, SystemTime::now());
                has_msrp
            });
            persist_user_state(&state);
            if !has_msrp {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    format!("Loaded {label}, but no MSRP is on file. Enter it to see estimates."),
                );
            } else {
                push_toast(toasts, ToastKind::Success, format!("Loaded {label}."));
            }
        }
        Ok(None) => {
            push_toast(
                toasts,
                ToastKind::Info,
                "No saved vehicle yet. Fill in the form instead.",
            );
        }
        Err(err) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to load preferences: {err}"),
            );
        }
    }
}

/// Saves the form's vehicle as the user's preferences. The reply carries the
/// chosen trim's base MSRP, which replaces the typed one when present.
pub async fn save_preferences(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    services: Services,
) {
    let Some(client) = services.backend else {
        push_toast(toasts, ToastKind::Error, "Backend client is not configured.");
        return;
    };
    let (update, exists) = state.with(|st| (st.draft.preferences_update(), st.preferences.is_some()));
    let Some(update) = update else {
        push_toast(toasts, ToastKind::Warning, "Pick a make and model before saving.");
        return;
    };

    match client.save_preferences(&update, exists).await {
        Ok(prefs) => {
            let label = prefs.display_name();
            let has_msrp = state.with_mut(|st| {
                let has_msrp = st.draft.apply_preferences(&prefs);
                st.preferences = Some(prefs);
                st.cache
                    .record_fetch(CacheResource::Preferences, SystemTime::now());
                has_msrp
            });
            persist_user_state(&state);
            let message = if has_msrp {
                format!("Saved {label}. MSRP filled from the trim.")
            } else {
                format!("Saved {label}.")
            };
            push_toast(toasts, ToastKind::Success, message);
        }
        Err(err) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to save preferences: {err}"),
            );
        }
    }
}

/// Trims for the form's vehicle; empty when the vehicle is incomplete or the
/// backend has none.
pub async fn fetch_trims(services: Services, make: String, model: String, year: u16) -> Vec<Trim> {
    let Some(client) = services.backend else {
        return Vec::new();
    };
    if make.trim().is_empty() || model.trim().is_empty() {
        return Vec::new();
    }
    match client.get_trims(make.trim(), model.trim(), year).await {
        Ok(trims) => trims,
        Err(err) => {
            tracing::warn!("Trims unavailable for {year} {make} {model}: {err}");
            Vec::new()
        }
    }
}

#[component]
pub fn Pricing() -> Element {
    rsx! { Shell { PricingPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
