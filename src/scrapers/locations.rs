use crate::models::LocationRecord;
use crate::scrapers::error::HemnetError;
use crate::scrapers::traits::Fetcher;
use tracing::{debug, info};

/// Looks up Hemnet location ids for a free-text area query
pub struct LocationResolver<'a, F: Fetcher> {
    fetcher: &'a F,
    base_url: &'a str,
}

impl<'a, F: Fetcher> LocationResolver<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    pub async fn resolve(&self, query: &str) -> Result<Vec<LocationRecord>, HemnetError> {
        let url = format!("{}/locations/show?q={}", self.base_url, query);
        info!("Resolving locations for '{}'", query);

        let body = self.fetcher.fetch(&url).await?;
        let locations: Vec<LocationRecord> =
            serde_json::from_str(&body).map_err(|source| HemnetError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!("{} location candidates for '{}'", locations.len(), query);
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::http::HttpFetcher;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOCATIONS: &str = r#"[
        {"id": 898741, "name": "Södermalm", "location_type": "district", "slug": "sodermalm-stockholms-kommun",
         "parent_location": {"id": 18031, "name": "Stockholms kommun", "location_type": "municipality", "slug": "stockholms-kommun"}},
        {"id": 473360, "name": "Södermalmsgatan", "location_type": "street", "slug": "sodermalmsgatan"}
    ]"#;

    #[tokio::test]
    async fn resolve_decodes_locations() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/locations/show"))
            .and(query_param("q", "Södermalm"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCATIONS))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let base_url = mock_server.uri();
        let resolver = LocationResolver::new(&fetcher, &base_url);

        let first = resolver.resolve("Södermalm").await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, 898741);
        assert_eq!(first[0].area_name(), Some("Stockholms kommun"));
        assert!(first[1].parent.is_none());

        let second = resolver.resolve("Södermalm").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/locations/show"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let base_url = mock_server.uri();
        let err = LocationResolver::new(&fetcher, &base_url)
            .resolve("Kungsholmen")
            .await
            .unwrap_err();
        assert!(matches!(err, HemnetError::Decode { .. }));
    }

    #[tokio::test]
    async fn server_error_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/locations/show"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let base_url = mock_server.uri();
        let err = LocationResolver::new(&fetcher, &base_url)
            .resolve("Vasastan")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
