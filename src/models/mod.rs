use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A location candidate returned by the Hemnet location lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationRecord {
    pub id: i64,
    pub name: String,
    pub location_type: String,
    pub slug: String,
    #[serde(default, rename = "parent_location")]
    pub parent: Option<Box<LocationRecord>>,
}

impl LocationRecord {
    /// Name of the enclosing area, taken from the parent location
    pub fn area_name(&self) -> Option<&str> {
        self.parent.as_deref().map(|parent| parent.name.as_str())
    }
}

/// One completed sale extracted from a sold-listings page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Living area in m²
    pub living_size: f64,
    pub rooms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yard_size: Option<f64>,
    /// Supplemental area (biarea), e.g. attic or basement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bi_size: Option<f64>,
    /// Final sale price in SEK
    pub price: f64,
    pub sold_at: NaiveDate,
    /// Change versus asking price, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
}

impl PriceRecord {
    pub fn price_per_sqm(&self) -> f64 {
        self.price / self.living_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_name_comes_from_parent() {
        let json = r#"[
            {"id": 17744, "name": "Södermalm", "location_type": "district", "slug": "sodermalm",
             "parent_location": {"id": 18031, "name": "Stockholms kommun", "location_type": "municipality", "slug": "stockholms-kommun"}},
            {"id": 18031, "name": "Stockholms kommun", "location_type": "municipality", "slug": "stockholms-kommun"}
        ]"#;

        let locations: Vec<LocationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(locations[0].area_name(), Some("Stockholms kommun"));
        assert_eq!(locations[1].area_name(), None);
    }

    #[test]
    fn price_record_json_keeps_unset_fields_unset() {
        let record = PriceRecord {
            address: "Götgatan 120".to_string(),
            area: Some("Södermalm".to_string()),
            city: None,
            living_size: 54.5,
            rooms: 2.0,
            yard_size: None,
            bi_size: Some(12.0),
            price: 5_195_000.0,
            sold_at: NaiveDate::from_ymd_opt(2019, 3, 12).unwrap(),
            price_change: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("yard_size"));

        let back: PriceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.city.is_none());
        assert!(back.price_change.is_none());
    }

    #[test]
    fn price_per_sqm() {
        let record = PriceRecord {
            address: "Ringvägen 11A".to_string(),
            area: None,
            city: None,
            living_size: 50.0,
            rooms: 2.0,
            yard_size: None,
            bi_size: None,
            price: 4_000_000.0,
            sold_at: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            price_change: None,
        };
        assert_eq!(record.price_per_sqm(), 80_000.0);
    }
}
