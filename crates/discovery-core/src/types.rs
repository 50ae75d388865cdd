//! Domain types shared by the query, search, wallet and engine crates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Closed set of content domains a query can be classified into.
///
/// Declaration order is the classifier's iteration order; ties are resolved
/// in favour of the earlier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Movies,
    Restaurants,
    Travel,
    Events,
    Tech,
    Default,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Movies,
        Topic::Restaurants,
        Topic::Travel,
        Topic::Events,
        Topic::Tech,
        Topic::Default,
    ];

    /// Numeric identifier used in stored preferences.
    pub fn code(self) -> u32 {
        match self {
            Topic::Movies => 64,
            Topic::Restaurants => 128,
            Topic::Travel => 256,
            Topic::Events => 512,
            Topic::Tech => 1024,
            Topic::Default => 0,
        }
    }

    pub fn from_code(code: u32) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Lowercase name, also the dataset file stem.
    pub fn slug(self) -> &'static str {
        match self {
            Topic::Movies => "movies",
            Topic::Restaurants => "restaurants",
            Topic::Travel => "travel",
            Topic::Events => "events",
            Topic::Tech => "tech",
            Topic::Default => "default",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Topic {
    type Err = Error;

    /// Accepts a slug (`"movies"`) or a numeric code (`"64"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u32>() {
            return Topic::from_code(code).ok_or_else(|| Error::NotFound(format!("topic code {}", code)));
        }
        Topic::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::NotFound(format!("topic '{}'", s)))
    }
}

/// UI control kind of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "multi-select")]
    MultiSelect,
    #[serde(rename = "slider")]
    Slider,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::Checkbox => "checkbox",
            FilterKind::MultiSelect => "multi-select",
            FilterKind::Slider => "slider",
        })
    }
}

/// Static description of one adjustable search refinement.
///
/// - `id`: unique within its topic; also the data item field the filter reads
/// - `kind`: checkbox, multi-select or slider
/// - `options`: selectable values for multi-select filters
/// - `min`/`max`/`step`: slider bounds
/// - `newsletter_relevant`: whether the newsletter mentions the filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(rename = "newsletter", default)]
    pub newsletter_relevant: bool,
}

impl FilterDescriptor {
    pub fn checkbox(id: &str, label: &str, newsletter_relevant: bool) -> Self {
        Self {
            id: id.to_string(),
            kind: FilterKind::Checkbox,
            label: label.to_string(),
            options: None,
            min: None,
            max: None,
            step: None,
            newsletter_relevant,
        }
    }

    pub fn multi_select(id: &str, label: &str, options: &[&str], newsletter_relevant: bool) -> Self {
        Self {
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            kind: FilterKind::MultiSelect,
            ..Self::checkbox(id, label, newsletter_relevant)
        }
    }

    pub fn slider(id: &str, label: &str, min: f64, max: f64, newsletter_relevant: bool) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            kind: FilterKind::Slider,
            ..Self::checkbox(id, label, newsletter_relevant)
        }
    }
}

/// The user's current value for one filter.
///
/// Deserializes from plain JSON: `true`, `["vegan", "halal"]`,
/// `{"min": 0, "max": 500}`. Any array of scalars is a multi-select; numbers
/// and booleans are kept in their JSON text form (`[2024]` selects `"2024"`).
/// Anything else lands in `Other` and never excludes an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActiveFilterValue {
    Checkbox(bool),
    MultiSelect(#[serde(deserialize_with = "deserialize_selection")] BTreeSet<String>),
    Range { min: f64, max: f64 },
    Other(serde_json::Value),
}

fn deserialize_selection<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!("unsupported selection value {}", other))),
        })
        .collect()
}

/// Active filter values keyed by `FilterDescriptor::id`.
pub type ActiveFilters = BTreeMap<String, ActiveFilterValue>;

/// One read-only record of a topic dataset. Shape depends on the topic.
pub type DataItem = serde_json::Map<String, serde_json::Value>;

/// Items matched by a query, in dataset order.
pub type SearchResult = Vec<DataItem>;

/// User preferences handed to the wallet-backed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub filters: ActiveFilters,
}

/// Wallet account exposed by a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub name: Option<String>,
    pub source: String,
}

/// Identifier of a submitted preference transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHandle(pub String);

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub is_connected: bool,
    pub account: Option<Account>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_codes_round_trip_and_parse() {
        for t in Topic::ALL {
            assert_eq!(Topic::from_code(t.code()), Some(t));
        }
        assert_eq!("64".parse::<Topic>().unwrap(), Topic::Movies);
        assert_eq!("Tech".parse::<Topic>().unwrap(), Topic::Tech);
        assert!("weather".parse::<Topic>().is_err());
        assert!(Topic::from_code(65).is_none());
    }

    #[test]
    fn active_filter_values_deserialize_by_shape() {
        let raw = r#"{"showtimes": true, "dietary": ["vegan"], "prices": {"min": 0, "max": 500}, "odd": "x"}"#;
        let filters: ActiveFilters = serde_json::from_str(raw).unwrap();
        assert_eq!(filters["showtimes"], ActiveFilterValue::Checkbox(true));
        assert_eq!(filters["dietary"], ActiveFilterValue::MultiSelect(["vegan".to_string()].into_iter().collect()));
        assert_eq!(filters["prices"], ActiveFilterValue::Range { min: 0.0, max: 500.0 });
        assert_eq!(filters["odd"], ActiveFilterValue::Other(serde_json::json!("x")));
    }

    #[test]
    fn numeric_selections_are_multi_select() {
        let filters: ActiveFilters = serde_json::from_str(r#"{"year": [2024, "2023"], "nested": [{"a": 1}]}"#).unwrap();
        let expected: BTreeSet<String> = ["2024".to_string(), "2023".to_string()].into_iter().collect();
        assert_eq!(filters["year"], ActiveFilterValue::MultiSelect(expected));
        assert!(matches!(filters["nested"], ActiveFilterValue::Other(_)));
    }

    #[test]
    fn filter_descriptor_uses_template_field_names() {
        let f: FilterDescriptor = serde_json::from_str(
            r#"{"id":"ambiance","type":"multi-select","label":"Ambiance","options":["romantic","casual"],"newsletter":false}"#,
        )
        .unwrap();
        assert_eq!(f.kind, FilterKind::MultiSelect);
        assert_eq!(f, FilterDescriptor::multi_select("ambiance", "Ambiance", &["romantic", "casual"], false));
    }
}
