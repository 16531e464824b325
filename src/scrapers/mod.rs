pub mod error;
pub mod hemnet;
pub mod http;
pub mod listing;
pub mod locations;
pub mod traits;
pub mod types;

pub use hemnet::HemnetCrawler;
pub use http::HttpFetcher;
pub use locations::LocationResolver;
pub use types::SearchParams;
