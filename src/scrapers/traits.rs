use crate::scrapers::error::HemnetError;
use async_trait::async_trait;

/// Transport used by the scrapers: GET a URL and return the body as text.
/// Lets the crawler run against a real client or an in-memory stub.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HemnetError>;
}
