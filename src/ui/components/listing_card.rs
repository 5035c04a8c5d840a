use dioxus::prelude::*;

use crate::domain::{
    format::{found_label, time_ago_from},
    Listing,
};
use crate::ui::theme;

#[component]
pub fn ListingCard(listing: Listing) -> Element {
    let found = found_label(&listing.found_date);
    let found_ago = time_ago_from(&listing.found_date);
    let mileage = listing.mileage_label();
    let badge_class = theme::condition_badge(&listing.condition);
    let primary_link = listing.primary_link().to_string();
    let condition = listing.condition_label();
    let badge = listing.badge_label();
    let dealership = listing.dealership_label().to_string();
    let price = listing.price_label();

    rsx! {
        div { class: "vehicle-card",
            div { class: "vehicle-header",
                div { class: "vehicle-info",
                    div { class: "vehicle-title", "{listing.title}" }
                    div { class: "vehicle-details",
                        strong { "Year:" }
                        " {listing.year} | "
                        strong { "Type:" }
                        " {condition}"
                        if let Some(miles) = mileage {
                            " | "
                            strong { "Mileage:" }
                            " {miles}"
                        }
                    }
                    div { class: "vehicle-details",
                        strong { "Dealership:" }
                        " {dealership}"
                    }
                    div { class: "vehicle-details",
                        strong { "Found:" }
                        " {found}"
                        if let Some(ago) = found_ago {
                            " ({ago})"
                        }
                    }
                    div { class: "vehicle-price",
                        strong { "Price:" }
                        " {price}"
                    }
                }
                div { class: "{badge_class}", "{badge}" }
            }
            div { class: "vehicle-actions",
                a {
                    class: "btn",
                    href: "{primary_link}",
                    target: "_blank",
                    rel: "noreferrer",
                    "↗ View Vehicle"
                }
                a {
                    class: "btn secondary",
                    href: "{listing.link}",
                    target: "_blank",
                    rel: "noreferrer",
                    "🔍 Browse Similar"
                }
            }
        }
    }
}

/// Placeholder shown while the feed has no listings.
#[component]
pub fn NoResults() -> Element {
    rsx! {
        div { class: "no-results",
            h3 { "No vehicles found yet" }
            p { "The search is running automatically. New matches will appear here when found." }
        }
    }
}
