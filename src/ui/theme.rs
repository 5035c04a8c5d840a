//! Class-name helpers shared across pages.

use crate::domain::{Condition, LoadSource, StatusKind};

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn active"
    } else {
        "nav-btn"
    }
}

pub fn condition_badge(condition: &Condition) -> &'static str {
    match condition {
        Condition::New => "vehicle-badge new",
        Condition::Used => "vehicle-badge used",
        Condition::Other(_) => "vehicle-badge",
    }
}

pub fn source_badge(source: LoadSource) -> &'static str {
    match source {
        LoadSource::Live => "source-badge live",
        LoadSource::Cached => "source-badge cached",
        LoadSource::Sample => "source-badge sample",
    }
}

/// `base` plus the kind modifier, e.g. `search-status success`.
pub fn status(base: &str, kind: Option<StatusKind>) -> String {
    match kind {
        Some(kind) => format!("{base} {}", kind.class()),
        None => base.to_string(),
    }
}

pub fn icon(spinning: bool) -> &'static str {
    if spinning {
        "icon spinning"
    } else {
        "icon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(status("search-status", None), "search-status");
        assert_eq!(
            status("setup-status", Some(StatusKind::Error)),
            "setup-status error"
        );
    }

    #[test]
    fn badge_classes_follow_condition() {
        assert_eq!(condition_badge(&Condition::New), "vehicle-badge new");
        assert_eq!(
            condition_badge(&Condition::Other("demo".into())),
            "vehicle-badge"
        );
    }
}
