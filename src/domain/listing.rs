use serde::{Deserialize, Deserializer, Serialize};

use super::format::format_price;

/// Shown when a listing doesn't name the dealership it was found at.
pub const DEFAULT_DEALERSHIP: &str = "Honda Dealership";

/// Whether a listing is new stock, used stock, or something the feed made up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    New,
    Used,
    Other(String),
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Other(String::new())
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => Condition::New,
            "used" => Condition::Used,
            _ => Condition::Other(raw),
        }
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::New => "new".to_string(),
            Condition::Used => "used".to_string(),
            Condition::Other(raw) => raw,
        }
    }
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Other(raw) => raw.as_str(),
        }
    }

    /// "New", "Used", or the feed's own value with its first letter raised.
    pub fn label(&self) -> String {
        let raw = self.as_str().trim();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Unknown".to_string(),
        }
    }

    pub fn badge(&self) -> String {
        match self.as_str().trim() {
            "" => "UNKNOWN".to_string(),
            raw => raw.to_uppercase(),
        }
    }
}

/// Listing price as the feed delivers it: preformatted text or a bare number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

/// One vehicle record from the listing feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub year: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub trim: String,
    #[serde(rename = "type", default)]
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(
        default,
        deserialize_with = "optional_string_from_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub mileage: Option<String>,
    #[serde(default)]
    pub found_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealership: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_link: Option<String>,
}

impl Listing {
    pub fn condition_label(&self) -> String {
        self.condition.label()
    }

    pub fn badge_label(&self) -> String {
        self.condition.badge()
    }

    /// Detail page when the feed has one, otherwise the search page.
    pub fn primary_link(&self) -> &str {
        self.dealer_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
            .unwrap_or(&self.link)
    }

    pub fn dealership_label(&self) -> &str {
        self.dealership
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_DEALERSHIP)
    }

    pub fn price_label(&self) -> String {
        match &self.price {
            Some(price) => format_price(Some(price)),
            None => "Not available".to_string(),
        }
    }

    pub fn mileage_label(&self) -> Option<String> {
        self.mileage
            .as_deref()
            .map(str::trim)
            .filter(|miles| !miles.is_empty())
            .map(|miles| format!("{miles} miles"))
    }
}

/// The whole feed document: bookkeeping counters plus the listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_searches: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles_tracked: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealerships_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_sent: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matches: Vec<Listing>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Listing>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Listing>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct Textual(#[serde(deserialize_with = "string_from_json")] String);

fn optional_string_from_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Textual>::deserialize(deserializer)?.map(|text| text.0))
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "last_updated": "2025-10-11T13:30:00",
        "last_search": "2025-10-11T13:28:00.857456",
        "total_searches": 14,
        "vehicles_tracked": 2,
        "dealerships_count": 1,
        "matches": [
            {
                "title": "2023 Honda Civic Sport",
                "year": 2023,
                "make": "Honda",
                "model": "Civic",
                "trim": "Sport",
                "type": "used",
                "price": 24995,
                "mileage": 15420,
                "found_date": "2025-10-09T18:33:08.951741",
                "dealership": "AutoPark Honda",
                "link": "https://dealer.example/used",
                "dealer_link": "https://dealer.example/used/5441238791",
                "vin": "ignored"
            },
            {
                "title": "2025 Honda Civic Hybrid",
                "year": "2025",
                "type": "New",
                "price": "$29,200",
                "found_date": "2025-10-09T19:03:12.600105",
                "link": "https://dealer.example/new",
                "dealer_link": ""
            }
        ]
    }"#;

    #[test]
    fn decodes_numbers_where_text_is_expected() {
        let set: ResultSet = serde_json::from_str(FEED).unwrap();
        assert_eq!(set.matches.len(), 2);

        let used = &set.matches[0];
        assert_eq!(used.year, "2023");
        assert_eq!(used.mileage.as_deref(), Some("15420"));
        assert_eq!(used.price, Some(Price::Amount(24995.0)));
        assert_eq!(used.condition, Condition::Used);
        assert_eq!(set.total_searches, Some(14));
        assert_eq!(set.notifications_sent, None);
    }

    #[test]
    fn condition_labels() {
        let set: ResultSet = serde_json::from_str(FEED).unwrap();
        assert_eq!(set.matches[0].condition_label(), "Used");
        assert_eq!(set.matches[0].badge_label(), "USED");
        assert_eq!(set.matches[1].condition, Condition::New);
        assert_eq!(Condition::from("certified".to_string()).label(), "Certified");
        assert_eq!(Condition::default().label(), "Unknown");
    }

    #[test]
    fn primary_link_falls_back_to_search_page() {
        let set: ResultSet = serde_json::from_str(FEED).unwrap();
        assert_eq!(
            set.matches[0].primary_link(),
            "https://dealer.example/used/5441238791"
        );
        assert_eq!(set.matches[1].primary_link(), "https://dealer.example/new");
    }

    #[test]
    fn missing_optionals_use_fallback_labels() {
        let set: ResultSet = serde_json::from_str(FEED).unwrap();
        let hybrid = &set.matches[1];
        assert_eq!(hybrid.dealership_label(), DEFAULT_DEALERSHIP);
        assert_eq!(hybrid.mileage_label(), None);
        assert_eq!(hybrid.price_label(), "$29,200");
        assert_eq!(set.matches[0].mileage_label().as_deref(), Some("15420 miles"));

        let bare = Listing::default();
        assert_eq!(bare.price_label(), "Not available");
    }

    #[test]
    fn null_or_missing_matches_is_empty() {
        let set: ResultSet = serde_json::from_str(r#"{"matches": null}"#).unwrap();
        assert!(set.is_empty());
        let set: ResultSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.total_searches, None);
    }

    #[test]
    fn condition_survives_snapshot_encoding() {
        let set: ResultSet = serde_json::from_str(FEED).unwrap();
        let json = serde_json::to_value(&set.matches[0]).unwrap();
        assert_eq!(json["type"], "used");
    }
}
