use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://www.hemnet.se";

/// Search parameters for a sold-price crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-text area query sent to the location lookup
    pub query: String,
    /// Hemnet location ids; resolved from `query` when empty
    pub location_ids: Vec<String>,
    /// Item types, e.g. "bostadsratt", "villa"
    pub item_types: Vec<String>,
    /// Sold-age window, e.g. "3m", "6m", "12m", "all"
    pub sold_age: String,
    pub base_url: String,
    /// Where the binary writes the JSON result
    pub output: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: "Södermalm".to_string(),
            location_ids: Vec::new(),
            item_types: vec!["bostadsratt".to_string()],
            sold_age: "12m".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output: "sold_prices.json".to_string(),
        }
    }
}

impl SearchParams {
    /// Defaults overridden by `HEMNET_*` variables (a `.env` file is read first)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut params = Self::default();

        if let Some(query) = lookup("HEMNET_QUERY") {
            params.query = query;
        }
        if let Some(ids) = lookup("HEMNET_LOCATION_IDS") {
            params.location_ids = split_list(&ids);
        }
        if let Some(types) = lookup("HEMNET_ITEM_TYPES") {
            params.item_types = split_list(&types);
        }
        if let Some(sold_age) = lookup("HEMNET_SOLD_AGE") {
            params.sold_age = sold_age;
        }
        if let Some(base_url) = lookup("HEMNET_BASE_URL") {
            params.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(output) = lookup("HEMNET_OUTPUT") {
            params.output = output;
        }

        params
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
