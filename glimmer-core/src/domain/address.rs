//! Address domain types and the street grouping key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire;

/// Street key used when an address carries no usable text at all
pub const UNKNOWN_STREET: &str = "Unknown Street";

/// One physical location targeted by a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "wire::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Address {
    /// Grouping key for the flyer library
    ///
    /// Uses the explicit street when present, otherwise strips a trailing
    /// house number from the full address. Best effort: two spellings of the
    /// same street produce two keys.
    pub fn street_name(&self) -> String {
        if let Some(street) = non_blank(self.street.as_deref()) {
            return street.to_string();
        }

        match non_blank(self.full_address.as_deref()) {
            Some(full) => strip_trailing_house_number(full),
            None => UNKNOWN_STREET.to_string(),
        }
    }

    /// Human readable address line
    pub fn display_address(&self) -> String {
        if let Some(full) = non_blank(self.full_address.as_deref()) {
            return full.to_string();
        }

        let street = match (
            non_blank(self.house_number.as_deref()),
            non_blank(self.street.as_deref()),
        ) {
            (Some(number), Some(street)) => Some(format!("{} {}", number, street)),
            (None, Some(street)) => Some(street.to_string()),
            (Some(number), None) => Some(number.to_string()),
            (None, None) => None,
        };

        let parts: Vec<String> = [
            street,
            non_blank(self.city.as_deref()).map(str::to_string),
            non_blank(self.state.as_deref()).map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            UNKNOWN_STREET.to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_house_number(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
}

/// Removes one trailing house-number token, e.g. `"Maple Ridge 47"` -> `"Maple Ridge"`
pub fn strip_trailing_house_number(full: &str) -> String {
    let trimmed = full.trim().trim_end_matches(',').trim_end();

    if let Some((head, last)) = trimmed.rsplit_once(char::is_whitespace) {
        if is_house_number(last) {
            let head = head.trim_end().trim_end_matches(',').trim_end();
            if !head.is_empty() {
                return head.to_string();
            }
        }
    }

    if trimmed.is_empty() {
        UNKNOWN_STREET.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(street: Option<&str>, full: Option<&str>) -> Address {
        Address {
            id: "a1".to_string(),
            job_id: Some("j1".to_string()),
            street: street.map(str::to_string),
            house_number: None,
            full_address: full.map(str::to_string),
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            created_at: None,
        }
    }

    #[test]
    fn test_trailing_number_stripped() {
        let a = address(None, Some("Maple Ridge 47"));
        assert_eq!(a.street_name(), "Maple Ridge");
    }

    #[test]
    fn test_explicit_street_wins() {
        let a = address(Some(" Oak St "), Some("Maple Ridge 47"));
        assert_eq!(a.street_name(), "Oak St");
    }

    #[test]
    fn test_house_number_variants() {
        assert_eq!(strip_trailing_house_number("Elm Court 12b"), "Elm Court");
        assert_eq!(strip_trailing_house_number("Elm Court 12-14,"), "Elm Court");
        assert_eq!(strip_trailing_house_number("Elm Court, 3"), "Elm Court");
        assert_eq!(strip_trailing_house_number("4th Street Deluxe"), "4th Street Deluxe");
    }

    #[test]
    fn test_only_number_kept() {
        assert_eq!(strip_trailing_house_number("47"), "47");
        assert_eq!(strip_trailing_house_number("   "), UNKNOWN_STREET);
    }

    #[test]
    fn test_no_text_is_unknown() {
        assert_eq!(address(None, None).street_name(), UNKNOWN_STREET);
        assert_eq!(address(Some(""), Some(" ")).street_name(), UNKNOWN_STREET);
    }

    #[test]
    fn test_street_name_deterministic() {
        let a = address(None, Some("Pine Ave 456"));
        assert_eq!(a.street_name(), a.clone().street_name());
    }

    #[test]
    fn test_display_address_composed() {
        let mut a = address(Some("Oak St"), None);
        a.house_number = Some("12".to_string());
        a.city = Some("Springfield".to_string());
        a.state = Some("IL".to_string());
        assert_eq!(a.display_address(), "12 Oak St, Springfield, IL");
    }

    #[test]
    fn test_decode_numeric_job_id() {
        let a: Address =
            serde_json::from_str(r#"{"id": 5, "job_id": 9, "street": "Oak St"}"#).unwrap();
        assert_eq!(a.id, "5");
        assert_eq!(a.job_id.as_deref(), Some("9"));
    }
}
