use dioxus::prelude::*;

use deal_pricer::{
    domain::AppState,
    infra::waitlist::WaitlistError,
    util::format::humanize_age,
};

use crate::{
    app::{Services, CACHE_TTL},
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let services = use_context::<Services>();

    let mut email_input = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let backend_url = services
        .backend
        .as_ref()
        .map(|client| client.base_url().to_string())
        .unwrap_or_else(|| format!("{} (invalid)", services.config.api_url));
    let token_status = if services.config.api_token.is_some() {
        "Bearer token set"
    } else {
        "No token"
    };
    let waitlist_ready = services.waitlist.is_configured();

    let cache_entries = state.with(|st| {
        st.cache
            .iter()
            .map(|(resource, time)| {
                let stale = st.is_stale(resource, CACHE_TTL);
                (resource.label(), humanize_age(*time), stale)
            })
            .collect::<Vec<_>>()
    });

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let services = services.clone();
        move |_| {
            state.with_mut(|st| st.cache.clear());
            if let Some(client) = services.backend.clone() {
                spawn(async move { client.clear_cache().await });
            }
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared cached data. It will refresh on next fetch.",
            );
        }
    };

    let on_join = {
        let toasts = toasts.clone();
        let services = services.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if submitting() {
                return;
            }
            submitting.set(true);
            let email = email_input();
            let waitlist = services.waitlist.clone();
            spawn(async move {
                match waitlist.subscribe(&email).await {
                    Ok(outcome) => {
                        email_input.set(String::new());
                        push_toast(toasts.clone(), ToastKind::Success, outcome.message());
                    }
                    Err(WaitlistError::InvalidEmail) => {
                        push_toast(toasts.clone(), ToastKind::Warning, "Enter a valid email address.");
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Could not join the waitlist: {err}"),
                        );
                    }
                }
                submitting.set(false);
            });
        }
    };

    rsx! {
        section {
            class: "panel",
            h2 { "Backend" }
            table { class: "kv",
                tr { td { "API base URL" } td { "{backend_url}" } }
                tr { td { "Authentication" } td { "{token_status}" } }
            }
            p { style: "color: var(--muted); font-size: 0.8rem;",
                "Set DEAL_PRICER_API_URL and DEAL_PRICER_API_TOKEN before launch to change these."
            }
        }

        section {
            class: "panel",
            h2 { "Cache Status" }
            if cache_entries.is_empty() {
                p { "No cached fetches yet." }
            } else {
                table { class: "kv",
                    for (label, age, stale) in cache_entries {
                        tr {
                            td { "{label}" }
                            td {
                                "{age}"
                                if stale { " (stale)" }
                            }
                        }
                    }
                }
            }
            button { style: "margin-top: 1rem;", onclick: on_clear_cache, "Clear Cache" }
        }

        section {
            class: "panel",
            h2 { "Waitlist" }
            p { "Get notified when live dealer quotes launch." }
            if waitlist_ready {
                form {
                    onsubmit: on_join,
                    div { class: "grid",
                        label { class: "field", "Email"
                            input {
                                r#type: "email",
                                value: "{email_input}",
                                placeholder: "you@example.com",
                                oninput: move |evt| email_input.set(evt.value()),
                            }
                        }
                    }
                    button {
                        class: "primary",
                        style: "margin-top: 1rem;",
                        r#type: "submit",
                        disabled: submitting(),
                        if submitting() { "Joining..." } else { "Join waitlist" }
                    }
                }
            } else {
                p { style: "color: var(--muted); font-size: 0.8rem;",
                    "Signup is unavailable: MAILCHIMP_API_KEY and MAILCHIMP_LIST_ID are not set."
                }
            }
        }
    }
}
