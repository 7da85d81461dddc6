pub mod output;
pub mod parser;
pub mod pipeline;
pub mod scraper;
pub mod timestamp;
pub mod types;

pub use pipeline::{Pipeline, PipelineConfig};
pub use scraper::{ScraperError, WebScraper};

pub const BASE_URL: &str = "https://infinitediscs.com";
