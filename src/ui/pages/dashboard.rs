use dioxus::prelude::*;

use crate::{
    app::{start_refresh, start_search, AppContext},
    domain::Busy,
    ui::{
        components::{
            kpi_card::KpiCard,
            listing_card::{ListingCard, NoResults},
            setup_panel::SetupPanel,
            status_line::StatusLine,
        },
        theme,
    },
};

#[component]
pub fn DashboardPage() -> Element {
    let ctx = use_context::<AppContext>();

    let snapshot = ctx.state.read();
    let last_updated = snapshot.last_updated_label();
    let refreshing = snapshot.is_busy(Busy::Refreshing);
    let searching = snapshot.is_busy(Busy::Searching);
    let polling = snapshot.is_busy(Busy::Polling);
    let source_badge = snapshot
        .source
        .map(|source| (theme::source_badge(source), source.label()));
    let stats = snapshot.stats.clone();
    let loaded = snapshot.results.is_some();
    let listings = snapshot
        .results
        .as_ref()
        .filter(|results| !results.is_empty())
        .map(|results| results.matches.clone())
        .unwrap_or_default();
    let (status_kind, status_text) = match snapshot.search_status.as_ref() {
        Some(status) => (Some(status.kind), Some(status.text.clone())),
        None => (None, None),
    };
    drop(snapshot);

    let on_refresh = move |_| start_refresh(ctx);
    let on_search = move |_| start_search(ctx);

    let search_icon = if searching { "⏳" } else { "🔍" };
    let refresh_icon_class = theme::icon(refreshing);
    let search_icon_class = theme::icon(searching);

    rsx! {
        div {
            div { class: "toolbar",
                div { class: "meta",
                    "Last updated: "
                    span { class: "last-updated", "{last_updated}" }
                    if let Some((badge_class, badge_label)) = source_badge {
                        span { class: "{badge_class}", "{badge_label}" }
                    }
                    if polling {
                        span { class: "source-badge", "Watching for new results" }
                    }
                }
                div { class: "actions",
                    button {
                        class: "btn secondary refresh-btn",
                        disabled: refreshing,
                        onclick: on_refresh,
                        span { class: "{refresh_icon_class}", "⟳" }
                        "Refresh"
                    }
                    button {
                        class: "btn",
                        id: "search-now-btn",
                        disabled: searching,
                        onclick: on_search,
                        span { class: "{search_icon_class}", "{search_icon}" }
                        "Search Now"
                    }
                }
            }

            StatusLine { base: "search-status", kind: status_kind, text: status_text }

            SetupPanel {}

            div { class: "stats-grid",
                KpiCard {
                    title: "Total Searches".to_string(),
                    value: stats.total_searches_label(),
                    description: None,
                }
                KpiCard {
                    title: "Vehicles Tracked".to_string(),
                    value: stats.vehicles_tracked_label(),
                    description: None,
                }
                KpiCard {
                    title: "Dealerships".to_string(),
                    value: stats.dealerships_label(),
                    description: None,
                }
                KpiCard {
                    title: "Last Search".to_string(),
                    value: stats.last_search_label(),
                    description: Some("Most recent scraper run".to_string()),
                }
            }

            div { class: "results",
                if !loaded {
                    p { class: "meta", "Loading listings..." }
                } else if listings.is_empty() {
                    NoResults {}
                } else {
                    for (idx, listing) in listings.into_iter().enumerate() {
                        ListingCard { key: "{idx}", listing }
                    }
                }
            }
        }
    }
}
