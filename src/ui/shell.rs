use dioxus::prelude::*;

use crate::{app::Route, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        header {
            class: "shell",
            div {
                h1 { "{APP_NAME}" }
                p { "know the dealer's numbers before you walk in" }
            }
            nav {
                class: "tabs",
                NavButton {
                    active: matches!(current_route, Route::Pricing {}),
                    onclick: move |_| { nav.push(Route::Pricing {}); },
                    label: "Pricing",
                }
                NavButton {
                    active: matches!(current_route, Route::Settings {}),
                    onclick: move |_| { nav.push(Route::Settings {}); },
                    label: "⚙️ Settings",
                }
            }
        }
        main { class: "content", {children} }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: if active { "active" } else { "" },
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
