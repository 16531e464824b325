use crate::models::PriceRecord;
use crate::scrapers::error::{CrawlError, HemnetError};
use crate::scrapers::listing::{extract_listing, Exclusion, Extracted};
use crate::scrapers::traits::Fetcher;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

const LISTING_SELECTOR: &str = r#"div[class="sold-property-listing"]"#;

/// Crawls Hemnet's sold listings page by page until a page has no listings
pub struct HemnetCrawler<'a, F: Fetcher> {
    fetcher: &'a F,
    base_url: &'a str,
}

impl<'a, F: Fetcher> HemnetCrawler<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    /// Build the results URL for one page
    pub fn page_url(
        &self,
        location_ids: &[String],
        item_types: &[String],
        sold_age: &str,
        page: u32,
    ) -> String {
        let mut url = format!("{}/salda/bostader?", self.base_url);
        for id in location_ids {
            url.push_str(&format!("&location_ids[]={}", id));
        }
        for item_type in item_types {
            url.push_str(&format!("&item_types[]={}", item_type));
        }
        url.push_str(&format!("&sold_age={}&page={}", sold_age, page));
        url
    }

    /// Fetch pages one at a time and collect every kept listing.
    ///
    /// On failure the records gathered so far are returned inside the
    /// `CrawlError`.
    pub async fn crawl(
        &self,
        location_ids: &[String],
        item_types: &[String],
        sold_age: &str,
    ) -> Result<Vec<PriceRecord>, CrawlError> {
        let mut records = Vec::new();
        let mut page = 1;

        info!(
            "Starting Hemnet crawl for locations {:?}, item types {:?}, sold age {}",
            location_ids, item_types, sold_age
        );

        loop {
            let url = self.page_url(location_ids, item_types, sold_age, page);

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(error) => return Err(CrawlError { error, partial: records }),
            };

            match parse_page(&body, &url, page, &mut records) {
                Ok(0) => {
                    debug!("Page {} has no listings, stopping", page);
                    break;
                }
                Ok(count) => debug!("Parsed {} listings on page {}", count, page),
                Err(error) => return Err(CrawlError { error, partial: records }),
            }

            page += 1;
        }

        info!("Collected {} sold listings from {} pages", records.len(), page - 1);
        Ok(records)
    }
}

/// Parse one results page, appending kept records. Returns the number of
/// listing fragments found.
fn parse_page(
    body: &str,
    url: &str,
    page: u32,
    records: &mut Vec<PriceRecord>,
) -> Result<usize, HemnetError> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(LISTING_SELECTOR).expect("listing selector is valid CSS");
    let fragments: Vec<_> = document.select(&selector).collect();

    for (idx, fragment) in fragments.iter().enumerate() {
        match extract_listing(*fragment) {
            Ok(Extracted::Record(record)) => records.push(record),
            Ok(Extracted::Excluded(Exclusion::Unparseable(field))) => {
                warn!("Skipped listing {} on page {}: unreadable {}", idx, page, field);
            }
            Ok(Extracted::Excluded(reason)) => {
                debug!("Skipped listing {} on page {}: {:?}", idx, page, reason);
            }
            Err(missing) => {
                return Err(HemnetError::Extraction {
                    url: url.to_string(),
                    page,
                    fragment: idx,
                    field: missing.0,
                });
            }
        }
    }

    Ok(fragments.len())
}
