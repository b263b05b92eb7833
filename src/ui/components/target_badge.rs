use dioxus::prelude::*;

use deal_pricer::domain::TargetPriceType;

#[component]
pub fn TargetBadge(target: TargetPriceType) -> Element {
    let class = match target {
        TargetPriceType::Msrp => "badge msrp",
        TargetPriceType::Invoice => "badge invoice",
        TargetPriceType::NetNet => "badge net-net",
    };

    rsx! {
        span {
            class: "{class}",
            title: "{target.description()}",
            "Target: {target}"
        }
    }
}
