use futures::{StreamExt, TryStreamExt, stream};

use crate::scraper::{ScraperError, WebScraper};
use crate::types::{DiscRecord, ProductRef};

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    scraper: WebScraper,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(scraper: WebScraper, config: PipelineConfig) -> Self {
        Self { scraper, config }
    }

    fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    pub async fn collect_products(&self) -> Result<Vec<ProductRef>, ScraperError> {
        let manufacturers = self.scraper.fetch_manufacturers().await?;
        log::info!("Found {} manufacturers", manufacturers.len());

        let total = manufacturers.len();
        let grouped: Vec<Vec<ProductRef>> = stream::iter(manufacturers.iter().enumerate().map(
            |(i, m)| async move {
                log::info!(
                    "Researching manufacturer: {} - {}",
                    m.name,
                    progress_label(i, total)
                );
                self.scraper.fetch_manufacturer_products(m).await
            },
        ))
        .buffered(self.workers())
        .try_collect()
        .await?;

        Ok(grouped.into_iter().flatten().collect())
    }

    pub async fn fetch_records(
        &self,
        products: &[ProductRef],
    ) -> Result<Vec<DiscRecord>, ScraperError> {
        let total = products.len();
        stream::iter(products.iter().enumerate().map(|(i, p)| async move {
            let record = self.scraper.fetch_product(p).await?;
            log::info!(
                "\t{} {} - {}",
                progress_label(i, total),
                record.manufacturer,
                record.name()
            );
            Ok::<_, ScraperError>(record)
        }))
        .buffered(self.workers())
        .try_collect()
        .await
    }

    pub async fn run(&self) -> Result<Vec<DiscRecord>, ScraperError> {
        let products = self.collect_products().await?;

        log::info!("Researching {} discs...", products.len());
        let records = self.fetch_records(&products).await?;

        Ok(finalize(records))
    }
}

pub fn progress_label(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("({:0width$}/{})", index + 1, total)
}

pub fn finalize(mut records: Vec<DiscRecord>) -> Vec<DiscRecord> {
    for record in &mut records {
        record.derive_stability();
    }
    records.sort_by(DiscRecord::sort_cmp);
    records
}
