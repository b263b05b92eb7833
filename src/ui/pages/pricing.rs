use dioxus::prelude::*;

use deal_pricer::{
    domain::{
        brand_margin_profile, vehicle_years, AppState, VehicleDraft, BODY_TYPES, VEHICLE_MAKES,
    },
    util::format::{format_currency, format_percent},
};

use crate::{
    app::{fetch_trims, load_preferences, persist_user_state, save_preferences, Services},
    ui::components::{
        kpi_card::KpiCard,
        target_badge::TargetBadge,
        toast::ToastMessage,
    },
};

#[component]
pub fn PricingPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let services = use_context::<Services>();
    let mut loading = use_signal(|| false);
    let mut saving = use_signal(|| false);

    let trim_key = use_memo(move || {
        state.with(|st| (st.draft.make.clone(), st.draft.model.clone(), st.draft.year))
    });
    let trims_resource = use_resource({
        let services = services.clone();
        move || {
            let services = services.clone();
            let (make, model, year) = trim_key();
            async move { fetch_trims(services, make, model, year).await }
        }
    });
    let trims = trims_resource.read().as_ref().cloned().unwrap_or_default();
    let has_trims = !trims.is_empty();

    let draft = state.with(|st| st.draft.clone());
    let saved = state.with(|st| {
        st.preferences
            .as_ref()
            .map(|prefs| (prefs.display_name(), prefs.saved_on()))
    });
    let model_options = state.with(|st| st.models_for_make());
    let estimate = draft.estimate();
    let profile = brand_margin_profile(&draft.make);
    let has_estimate = !estimate.result.is_empty();

    let update_draft = move |apply: fn(&mut VehicleDraft, String), value: String| {
        let mut state = state.clone();
        state.with_mut(|st| apply(&mut st.draft, value));
        persist_user_state(&state);
    };

    let on_load = {
        let services = services.clone();
        move |_| {
            if loading() {
                return;
            }
            loading.set(true);
            let services = services.clone();
            spawn(async move {
                load_preferences(state.clone(), toasts.clone(), services).await;
                loading.set(false);
            });
        }
    };

    let on_save = {
        let services = services.clone();
        move |_| {
            if saving() {
                return;
            }
            saving.set(true);
            let services = services.clone();
            spawn(async move {
                save_preferences(state.clone(), toasts.clone(), services).await;
                saving.set(false);
            });
        }
    };

    let margin_hint = if profile.is_direct_to_consumer {
        "Direct-to-consumer brand: no dealer spread.".to_string()
    } else {
        format!(
            "Dealer margin {}-{} of MSRP, holdback {} of {}.",
            format_percent(profile.invoice_margin_min_percent),
            format_percent(profile.invoice_margin_max_percent),
            format_percent(profile.dealer_holdback_percent),
            profile.holdback_base.label(),
        )
    };

    rsx! {
        section {
            class: "panel",
            h2 { "Vehicle" }
            div { class: "grid",
                label { class: "field", "Year"
                    select {
                        value: "{draft.year}",
                        onchange: move |evt| update_draft(|d, v| {
                            if let Ok(year) = v.parse() {
                                d.set_year(year);
                            }
                        }, evt.value()),
                        for year in vehicle_years() {
                            option { value: "{year}", selected: draft.year == year, "{year}" }
                        }
                    }
                }
                label { class: "field", "Make"
                    select {
                        value: "{draft.make}",
                        onchange: move |evt| update_draft(|d, v| d.set_make(v), evt.value()),
                        option { value: "", "Select a make" }
                        for make in VEHICLE_MAKES.iter() {
                            option { value: "{make}", selected: draft.make == *make, "{make}" }
                        }
                    }
                }
                label { class: "field", "Model"
                    input {
                        list: "model-options",
                        value: "{draft.model}",
                        placeholder: "e.g. Camry Hybrid",
                        oninput: move |evt| update_draft(|d, v| d.set_model(v), evt.value()),
                    }
                    datalist { id: "model-options",
                        for model in model_options {
                            option { value: "{model}" }
                        }
                    }
                }
                label { class: "field", "Trim"
                    select {
                        value: draft.trim_id.clone().unwrap_or_default(),
                        disabled: !has_trims,
                        onchange: move |evt| update_draft(|d, v| {
                            d.trim_id = Some(v).filter(|id| !id.is_empty());
                        }, evt.value()),
                        option { value: "", "Unspecified" }
                        for trim in trims {
                            option {
                                value: "{trim.id}",
                                selected: draft.trim_id.as_deref() == Some(trim.id.as_str()),
                                "{trim.trim_name}"
                            }
                        }
                    }
                }
                label { class: "field", "Body type"
                    select {
                        value: "{draft.body_type}",
                        onchange: move |evt| update_draft(|d, v| d.body_type = v, evt.value()),
                        option { value: "", "Any" }
                        for body in BODY_TYPES.iter() {
                            option { value: "{body}", selected: draft.body_type == *body, "{body}" }
                        }
                    }
                }
                label { class: "field", "MSRP"
                    input {
                        inputmode: "decimal",
                        value: "{draft.msrp}",
                        placeholder: "$42,500",
                        oninput: move |evt| update_draft(|d, v| d.msrp = v, evt.value()),
                    }
                }
                label { class: "field", "ZIP code"
                    input {
                        inputmode: "numeric",
                        value: "{draft.zip_code}",
                        placeholder: "Optional",
                        oninput: move |evt| update_draft(|d, v| d.zip_code = v, evt.value()),
                    }
                }
            }
            div { style: "margin-top: 1rem; display: flex; gap: 0.5rem;",
                button {
                    class: "primary",
                    disabled: loading(),
                    onclick: on_load,
                    if loading() { "Loading..." } else { "Load from my preferences" }
                }
                button {
                    disabled: saving(),
                    onclick: on_save,
                    if saving() { "Saving..." } else { "Save as my vehicle" }
                }
            }
            if let Some((name, saved_on)) = saved {
                p { style: "color: var(--muted); font-size: 0.8rem;",
                    "Saved vehicle: {name}"
                    if let Some(date) = saved_on { " (since {date})" }
                }
            }
            p { style: "color: var(--muted); font-size: 0.8rem;",
                "Saving with a trim selected fills the MSRP from that trim's base price."
            }
        }

        section {
            class: "panel",
            h2 { "Dealer economics" }
            if !draft.make.trim().is_empty() {
                p { style: "color: var(--muted); font-size: 0.85rem;", "{margin_hint}" }
            }
            div { class: "grid",
                KpiCard {
                    title: "MSRP".to_string(),
                    value: format_currency(estimate.msrp),
                }
                KpiCard {
                    title: "Estimated invoice".to_string(),
                    value: format_currency(estimate.result.estimated_invoice),
                    description: Some("What the dealer likely paid the manufacturer.".to_string()),
                }
                KpiCard {
                    title: "Dealer holdback".to_string(),
                    value: format_currency(estimate.result.estimated_holdback),
                    description: Some("Rebated to the dealer after the sale.".to_string()),
                }
                KpiCard {
                    title: "Net-net price".to_string(),
                    value: format_currency(estimate.result.net_net_price),
                    description: Some("Invoice minus holdback: the dealer's floor.".to_string()),
                }
            }
        }

        section {
            class: "panel",
            h2 { "Negotiation target" }
            TargetBadge { target: estimate.target }
            div { class: "grid", style: "margin-top: 1rem;",
                KpiCard {
                    title: format!("Target ({})", estimate.target),
                    value: format_currency(estimate.target_price),
                    description: Some(estimate.target.description().to_string()),
                }
            }
            if !has_estimate {
                p { style: "color: var(--muted); font-size: 0.85rem;",
                    "Enter a make and a positive MSRP to see estimates."
                }
            }
        }
    }
}
