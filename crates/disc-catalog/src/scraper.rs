use crate::parser::{ParseError, parse_disc_record, parse_menu, scan_category_panels};
use crate::types::{DiscRecord, FieldValue, ManufacturerRef, ProductRef};

use reqwest::Client;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn absolute_url(&self, url_or_path: &str) -> String {
        if url_or_path.starts_with("http://") || url_or_path.starts_with("https://") {
            url_or_path.to_string()
        } else if url_or_path.starts_with('/') {
            format!("{}{}", self.base_url, url_or_path)
        } else {
            format!("{}/{}", self.base_url, url_or_path)
        }
    }

    pub async fn fetch_manufacturers(&self) -> Result<Vec<ManufacturerRef>, ScraperError> {
        log::info!("Fetching manufacturer menu from {}...", self.base_url);
        let html = self.get_html(&self.base_url).await?;
        Ok(parse_menu(&html)?)
    }

    pub async fn fetch_manufacturer_products(
        &self,
        manufacturer: &ManufacturerRef,
    ) -> Result<Vec<ProductRef>, ScraperError> {
        log::debug!("Scanning categories of {}", manufacturer.name);
        let url = self.absolute_url(&manufacturer.category_path);
        let html = self.get_html(&url).await?;

        let mut products = Vec::new();
        for (category, links) in scan_category_panels(&html) {
            log::debug!(
                "{}: {} {} disc(s)",
                manufacturer.name,
                links.len(),
                category
            );
            products.extend(links.iter().map(|link| ProductRef {
                manufacturer: manufacturer.name.clone(),
                link: self.absolute_url(link),
            }));
        }

        Ok(products)
    }

    pub async fn fetch_product(&self, product: &ProductRef) -> Result<DiscRecord, ScraperError> {
        let html = self.get_html(&product.link).await?;
        let mut record = parse_disc_record(&html, product);
        if let Some(img) = record.text("img").map(|src| self.absolute_url(src)) {
            record.set("img", FieldValue::Text(img));
        }
        log::debug!("Parsed {} - {}", record.manufacturer, record.name());
        Ok(record)
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        log::debug!("GET {}", url);
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
