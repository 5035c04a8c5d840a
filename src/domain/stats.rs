use super::{format::short_date, listing::ResultSet};

const PLACEHOLDER: &str = "—";

/// Counters shown above the listing cards.
///
/// Values only change when a fetched result set carries them, so a feed that
/// omits a counter leaves the previous number on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_searches: Option<u64>,
    pub vehicles_tracked: Option<u64>,
    pub dealerships_count: Option<u64>,
    pub last_search: Option<String>,
}

impl DashboardStats {
    pub fn apply(&mut self, results: &ResultSet) {
        if let Some(total) = results.total_searches.filter(|total| *total > 0) {
            self.total_searches = Some(total);
        }
        if let Some(tracked) = results.vehicles_tracked {
            self.vehicles_tracked = Some(tracked);
        }
        if let Some(dealerships) = results.dealerships_count {
            self.dealerships_count = Some(dealerships);
        }
        if let Some(last) = results
            .last_search
            .as_deref()
            .filter(|last| !last.trim().is_empty())
        {
            self.last_search = Some(last.to_string());
        }
    }

    pub fn total_searches_label(&self) -> String {
        count_label(self.total_searches)
    }

    pub fn vehicles_tracked_label(&self) -> String {
        count_label(self.vehicles_tracked)
    }

    pub fn dealerships_label(&self) -> String {
        count_label(self.dealerships_count)
    }

    pub fn last_search_label(&self) -> String {
        self.last_search
            .as_deref()
            .map(short_date)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

fn count_label(value: Option<u64>) -> String {
    value
        .map(|count| count.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
