use dioxus::prelude::*;

use crate::{
    app::AppContext,
    config::{DashboardConfig, GithubConfig},
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[derive(Clone, Debug, PartialEq)]
struct SettingsForm {
    data_url: String,
    refresh_secs: String,
    poll_secs: String,
    max_polls: String,
    owner: String,
    repo: String,
    workflow: String,
    git_ref: String,
}

impl SettingsForm {
    fn from_config(config: &DashboardConfig) -> Self {
        Self {
            data_url: config.data_url.clone(),
            refresh_secs: config.refresh_interval_secs.to_string(),
            poll_secs: config.poll_interval_secs.to_string(),
            max_polls: config.max_polls.to_string(),
            owner: config.github.owner.clone(),
            repo: config.github.repo.clone(),
            workflow: config.github.workflow.clone(),
            git_ref: config.github.git_ref.clone(),
        }
    }

    /// Merges the edited fields over `base`, keeping settings the form does not show.
    fn apply_to(&self, base: &DashboardConfig) -> Result<DashboardConfig, String> {
        let refresh_interval_secs: u64 = self
            .refresh_secs
            .trim()
            .parse()
            .map_err(|_| "Refresh interval must be a whole number of seconds")?;
        let poll_interval_secs: u64 = self
            .poll_secs
            .trim()
            .parse()
            .map_err(|_| "Poll interval must be a whole number of seconds")?;
        let max_polls: u32 = self
            .max_polls
            .trim()
            .parse()
            .map_err(|_| "Poll attempts must be a whole number")?;

        let config = DashboardConfig {
            data_url: self.data_url.trim().to_string(),
            refresh_interval_secs,
            poll_interval_secs,
            max_polls,
            github: GithubConfig {
                owner: self.owner.trim().to_string(),
                repo: self.repo.trim().to_string(),
                workflow: self.workflow.trim().to_string(),
                git_ref: self.git_ref.trim().to_string(),
                ..base.github.clone()
            },
            ..base.clone()
        };
        config.validate().map_err(|err| err.to_string())?;
        Ok(config)
    }
}

#[component]
pub fn SettingsPage() -> Element {
    let config = use_context::<Signal<DashboardConfig>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let snapshots = use_context::<AppContext>().snapshots;

    let mut form = use_signal(|| SettingsForm::from_config(&config.peek()));

    let snapshot_info = use_memo(move || {
        let store = snapshots.read();
        store.load().map(|snapshot| {
            (
                store.path().display().to_string(),
                snapshot.results.matches.len(),
                snapshot.age_string(),
            )
        })
    });

    let on_save = {
        let mut config = config.clone();
        let toasts = toasts.clone();
        move |_| {
            let current = config.peek().clone();
            match form.read().apply_to(&current) {
                Ok(updated) => match updated.save() {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "settings saved");
                        config.set(updated);
                        push_toast(toasts.clone(), ToastKind::Success, "Settings saved.");
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Could not save settings: {err}"),
                        );
                    }
                },
                Err(message) => push_toast(toasts.clone(), ToastKind::Error, message),
            }
        }
    };

    let on_reset = {
        let mut config = config.clone();
        let toasts = toasts.clone();
        move |_| {
            let defaults = DashboardConfig::default();
            form.set(SettingsForm::from_config(&defaults));
            if let Err(err) = defaults.save() {
                tracing::warn!("failed to save default settings: {err}");
            }
            config.set(defaults);
            push_toast(toasts.clone(), ToastKind::Info, "Restored default settings.");
        }
    };

    let values = form.read().clone();

    rsx! {
        div { class: "settings-form",
            section { class: "settings-section",
                h2 { "Listing Feed" }
                div { class: "setup-row",
                    label { "Data URL or file" }
                    input {
                        class: "text-input",
                        value: "{values.data_url}",
                        oninput: move |evt| form.with_mut(|f| f.data_url = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Auto-refresh (seconds)" }
                    input {
                        class: "text-input",
                        value: "{values.refresh_secs}",
                        oninput: move |evt| form.with_mut(|f| f.refresh_secs = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Poll interval after a search (seconds)" }
                    input {
                        class: "text-input",
                        value: "{values.poll_secs}",
                        oninput: move |evt| form.with_mut(|f| f.poll_secs = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Poll attempts" }
                    input {
                        class: "text-input",
                        value: "{values.max_polls}",
                        oninput: move |evt| form.with_mut(|f| f.max_polls = evt.value()),
                    }
                }
            }

            section { class: "settings-section",
                h2 { "Search Workflow" }
                p { class: "meta", "Leave owner or repository empty to run Search Now in demo mode." }
                div { class: "setup-row",
                    label { "Repository owner" }
                    input {
                        class: "text-input",
                        value: "{values.owner}",
                        oninput: move |evt| form.with_mut(|f| f.owner = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Repository name" }
                    input {
                        class: "text-input",
                        value: "{values.repo}",
                        oninput: move |evt| form.with_mut(|f| f.repo = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Workflow file" }
                    input {
                        class: "text-input",
                        value: "{values.workflow}",
                        oninput: move |evt| form.with_mut(|f| f.workflow = evt.value()),
                    }
                }
                div { class: "setup-row",
                    label { "Git ref" }
                    input {
                        class: "text-input",
                        value: "{values.git_ref}",
                        oninput: move |evt| form.with_mut(|f| f.git_ref = evt.value()),
                    }
                }
            }

            div { class: "actions",
                button { class: "btn", onclick: on_save, "Save" }
                button { class: "btn secondary", onclick: on_reset, "Reset Defaults" }
            }

            section { class: "settings-section",
                h2 { "Offline Snapshot" }
                match snapshot_info() {
                    Some((path, count, age)) => rsx! {
                        p { class: "meta", "{count} listings saved {age} ago" }
                        p { class: "meta", "{path}" }
                    },
                    None => rsx! { p { class: "meta", "No snapshot saved yet." } },
                }
            }
        }
    }
}
