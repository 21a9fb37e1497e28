use metrics::counter;
use serde::Serialize;
use tracing::{info, instrument};

use crate::app::ports::{OwnerOutputPort, OwnerSource};
use crate::constants;
use crate::error::{NowiError, Result};
use crate::plss::PlssQueue;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    pub county: String,
    pub locations: usize,
    pub owners: usize,
    pub output_file: String,
}

/// Use case for running a queue of PLSS locations through an owner source and saving
/// the result as an importable sheet
pub struct ScrapeUseCase {
    source: Box<dyn OwnerSource>,
    output: Box<dyn OwnerOutputPort>,
}

impl ScrapeUseCase {
    pub fn new(source: Box<dyn OwnerSource>, output: Box<dyn OwnerOutputPort>) -> Self {
        Self { source, output }
    }

    #[instrument(skip(self, queue), fields(source = self.source.source_name(), locations = queue.len()))]
    pub async fn execute(&self, queue: &PlssQueue) -> Result<ScrapeReport> {
        if queue.is_empty() {
            return Err(NowiError::EmptyQueue);
        }
        let county = queue.county().unwrap_or(constants::GARFIELD).to_string();

        info!("Fetching owners for {} locations in {}", queue.len(), county);
        let owners = self.source.fetch_owners(&county, queue.entries()).await?;
        counter!("nowi_scraped_owners_total", "source" => self.source.source_name()).increment(owners.len() as u64);

        let output_file = self.output.write_owners(&owners).await?;
        info!("Saved {} owners to {}", owners.len(), output_file);

        Ok(ScrapeReport {
            source: self.source.source_name().to_string(),
            county,
            locations: queue.len(),
            owners: owners.len(),
            output_file,
        })
    }
}
