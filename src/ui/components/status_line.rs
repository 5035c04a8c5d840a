use dioxus::prelude::*;

use crate::domain::StatusKind;
use crate::ui::theme;

/// A one-line status message; renders an empty placeholder when there is none.
#[component]
pub fn StatusLine(base: &'static str, kind: Option<StatusKind>, text: Option<String>) -> Element {
    let class = theme::status(base, kind);
    rsx! {
        div {
            class: "{class}",
            role: "status",
            if let Some(text) = text {
                "{text}"
            }
        }
    }
}
