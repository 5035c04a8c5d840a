use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    config::DashboardConfig,
    domain::{ApiToken, AppState, StatusKind, StatusLine as Status},
    ui::components::status_line::StatusLine,
    util::persistence::PersistSaveError,
};

pub const TOKEN_LOADED: &str = "Token loaded from browser storage";
pub const TOKEN_SAVED: &str = "Token saved successfully! \"Search Now\" will trigger live scraping.";
pub const TOKEN_CLEARED: &str = "Token cleared. \"Search Now\" will use demo mode.";

/// Status for a token change that was applied in memory and then written to disk.
fn persist_status(done: &str, saved: Result<(), PersistSaveError>) -> (StatusKind, String) {
    match saved {
        Ok(()) => (StatusKind::Success, done.to_string()),
        Err(err) => (
            StatusKind::Error,
            format!(
                "Could not write the token to disk: {err}. The change lasts until the app closes."
            ),
        ),
    }
}

/// Collapsible panel for storing the GitHub token used by "Search Now".
#[component]
pub fn SetupPanel() -> Element {
    let state = use_context::<Signal<AppState>>();
    let config = use_context::<Signal<DashboardConfig>>();

    let mut open = use_signal(|| false);
    let mut token_input = use_signal(String::new);
    let setup_status = use_signal(|| None::<Status>);

    let show_status = move |kind: StatusKind, text: &str| {
        let mut setup_status = setup_status;
        let status = Status::new(kind, text);
        let id = status.id.clone();
        setup_status.set(Some(status));
        let delay = config.peek().setup_status_clear_delay();
        spawn(async move {
            tokio::time::sleep(delay).await;
            if setup_status.peek().as_ref().is_some_and(|s| s.id == id) {
                setup_status.set(None);
            }
        });
    };

    let on_toggle = {
        move |_| {
            let opening = !open();
            open.set(opening);
            if opening {
                if let Some(token) = state.peek().token.as_ref() {
                    token_input.set(token.masked());
                    show_status(StatusKind::Success, TOKEN_LOADED);
                }
            }
        }
    };

    let on_save = {
        let mut state = state;
        move |_| {
            let raw = token_input();
            let unchanged = state
                .peek()
                .token
                .as_ref()
                .is_some_and(|token| token.masked() == raw.trim());
            if unchanged {
                show_status(StatusKind::Success, TOKEN_SAVED);
                return;
            }
            match ApiToken::parse(&raw) {
                Ok(token) => {
                    token_input.set(token.masked());
                    state.with_mut(|st| st.token = Some(token));
                    let (kind, text) = persist_status(TOKEN_SAVED, persist_user_state(&state));
                    show_status(kind, &text);
                }
                Err(err) => show_status(StatusKind::Error, &err.to_string()),
            }
        }
    };

    let on_clear = {
        let mut state = state;
        move |_| {
            state.with_mut(|st| st.token = None);
            token_input.set(String::new());
            let (kind, text) = persist_status(TOKEN_CLEARED, persist_user_state(&state));
            show_status(kind, &text);
        }
    };

    let is_open = open();
    let arrow = if is_open { "▲" } else { "▼" };
    let arrow_class = if is_open { "setup-arrow rotated" } else { "setup-arrow" };
    let (status_kind, status_text) = match setup_status() {
        Some(status) => (Some(status.kind), Some(status.text)),
        None => (None, None),
    };

    rsx! {
        section { class: "setup-panel",
            button { class: "setup-toggle", onclick: on_toggle,
                span { "🔑 Live search setup" }
                span { class: "{arrow_class}", "{arrow}" }
            }
            if is_open {
                div { class: "setup-content",
                    p {
                        "Store a GitHub personal access token to let \"Search Now\" dispatch the search workflow. "
                        "Without one the button refreshes the current data in demo mode."
                    }
                    div { class: "setup-row",
                        input {
                            class: "text-input",
                            r#type: "password",
                            placeholder: "ghp_... or github_pat_...",
                            value: "{token_input}",
                            oninput: move |evt| token_input.set(evt.value()),
                        }
                        button { class: "btn", onclick: on_save, "Save" }
                        button { class: "btn danger", onclick: on_clear, "Clear" }
                    }
                    StatusLine { base: "setup-status", kind: status_kind, text: status_text }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_changes_report_whether_they_reached_disk() {
        assert_eq!(
            persist_status(TOKEN_SAVED, Ok(())),
            (StatusKind::Success, TOKEN_SAVED.to_string())
        );

        let (kind, text) =
            persist_status(TOKEN_CLEARED, Err(PersistSaveError::StorageUnavailable));
        assert_eq!(kind, StatusKind::Error);
        assert!(text.starts_with("Could not write the token to disk"));
        assert!(text.ends_with("The change lasts until the app closes."));
    }
}
