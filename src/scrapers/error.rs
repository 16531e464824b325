use crate::models::PriceRecord;

/// Errors raised while talking to Hemnet or reading its pages
#[derive(thiserror::Error, Debug)]
pub enum HemnetError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing {field} in listing {fragment} on page {page} ({url})")]
    Extraction {
        url: String,
        page: u32,
        fragment: usize,
        field: &'static str,
    },
}

impl HemnetError {
    /// True for failures of the fetch itself (network, timeout, bad status)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }
}

/// A crawl that stopped early; records from earlier listings are kept
#[derive(thiserror::Error, Debug)]
#[error("crawl aborted after {} records: {error}", .partial.len())]
pub struct CrawlError {
    #[source]
    pub error: HemnetError,
    pub partial: Vec<PriceRecord>,
}
