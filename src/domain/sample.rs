use super::listing::{Condition, Listing, Price, ResultSet};

/// Result set shown when neither the feed nor a saved snapshot is reachable.
pub fn sample_results() -> ResultSet {
    ResultSet {
        last_updated: None,
        last_search: Some("2025-10-09T19:03:13.087245".to_string()),
        total_searches: Some(14),
        vehicles_tracked: Some(3),
        dealerships_count: None,
        notifications_sent: Some(2),
        matches: vec![
            sample_listing(
                "2024",
                "Hybrid",
                Condition::New,
                "$28,500",
                None,
                "2025-10-09T19:03:12.600085",
                "https://www.autoparkhonda.com/new-inventory/index.htm?make=Honda&model=Civic%20Hybrid",
                "https://www.autoparkhonda.com/VehicleDetails/new-2024-Honda-Civic-Hybrid-4dr_Sedan-Cary-NC/5438262784",
            ),
            sample_listing(
                "2023",
                "Sport",
                Condition::Used,
                "$24,995",
                Some("15,420"),
                "2025-10-09T18:33:08.951741",
                "https://www.autoparkhonda.com/used-inventory/index.htm?make=Honda&model=Civic",
                "https://www.autoparkhonda.com/VehicleDetails/used-2023-Honda-Civic-Sport-4dr_Sedan-Cary-NC/5441238791",
            ),
            sample_listing(
                "2025",
                "Hybrid",
                Condition::New,
                "$29,200",
                None,
                "2025-10-09T19:03:12.600105",
                "https://www.autoparkhonda.com/new-inventory/index.htm?make=Honda&model=Civic%20Hybrid",
                "https://www.autoparkhonda.com/VehicleDetails/new-2025-Honda-Civic-Hybrid-4dr_Sedan-Cary-NC/5445672834",
            ),
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_listing(
    year: &str,
    trim: &str,
    condition: Condition,
    price: &str,
    mileage: Option<&str>,
    found_date: &str,
    link: &str,
    dealer_link: &str,
) -> Listing {
    Listing {
        title: format!("{year} Honda Civic {trim}"),
        year: year.to_string(),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        trim: trim.to_string(),
        condition,
        price: Some(Price::Text(price.to_string())),
        mileage: mileage.map(str::to_string),
        found_date: found_date.to_string(),
        dealership: None,
        link: link.to_string(),
        dealer_link: Some(dealer_link.to_string()),
    }
}
