use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::theme;
use crate::util::{APP_NAME, APP_VERSION};

const TAGLINE: &str = "Fresh dealer listings from the search robot";

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div { class: "shell",
            header { class: "shell-header",
                div {
                    h1 { "{APP_NAME}" }
                    p { class: "meta", "{TAGLINE}" }
                }
                nav { class: "shell-nav",
                    NavButton {
                        active: matches!(current_route, Route::Dashboard {}),
                        onclick: move |_| { nav.push(Route::Dashboard {}); },
                        label: "Dashboard",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Settings",
                    }
                }
            }
            main { class: "shell-main",
                {children}
            }
            footer { class: "meta", "v{APP_VERSION}" }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
