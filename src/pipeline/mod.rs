// Import pipeline: validate -> normalize -> dedup

pub mod dedup;
pub mod normalize;
pub mod validate;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::ImportConfig;
use crate::constants;
use crate::error::{NowiError, Result, RowError};
use crate::types::{OwnerRecord, RawRow};

pub use dedup::dedup_owners;
pub use normalize::canonical_name;
pub use validate::validate_row;

/// Receives `(rows_processed, rows_total)` after each row
pub trait ProgressObserver {
    fn on_progress(&self, processed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize),
{
    fn on_progress(&self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Observer that ignores progress
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _processed: usize, _total: usize) {}
}

/// Counts reported back to the user after an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows read from the sheet
    pub total: usize,
    /// Records remaining after deduplication
    pub successful: usize,
    pub duplicates_removed: usize,
    /// Every rejected row, including ones not listed in `errors`
    pub error_count: usize,
    /// First `error_display_cap` error messages
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn has_hidden_errors(&self) -> bool {
        self.error_count > self.errors.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub owners: Vec<OwnerRecord>,
    /// Full error list in row order
    #[serde(skip)]
    pub errors: Vec<RowError>,
    pub summary: ImportSummary,
}

/// Validates, normalizes and deduplicates raw sheet rows. Holds no state between runs.
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    error_display_cap: usize,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportPipeline {
    pub fn new() -> Self {
        Self {
            error_display_cap: constants::DEFAULT_ERROR_DISPLAY_CAP,
        }
    }

    pub fn with_error_cap(error_display_cap: usize) -> Self {
        Self { error_display_cap }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::with_error_cap(config.error_display_cap)
    }

    pub fn error_display_cap(&self) -> usize {
        self.error_display_cap
    }

    pub fn run(&self, rows: &[RawRow]) -> Result<ImportOutcome> {
        self.run_with_progress(rows, &NoProgress)
    }

    /// Run the pipeline over `rows` in order. Only an empty input is fatal; bad rows are
    /// skipped and reported.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn run_with_progress(
        &self,
        rows: &[RawRow],
        progress: &dyn ProgressObserver,
    ) -> Result<ImportOutcome> {
        if rows.is_empty() {
            return Err(NowiError::EmptyInput);
        }

        let total = rows.len();
        let mut valid = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            match validate_row(row, i) {
                Ok(owner) => valid.push(owner),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }

            progress.on_progress(i + 1, total);
            if (i + 1) % 10 == 0 {
                debug!("Validated {}/{} rows", i + 1, total);
            }
        }

        let validated = valid.len();
        let (owners, duplicates_removed) = dedup_owners(valid);

        info!(
            "Imported {} owners from {} rows ({} rejected, {} duplicates removed)",
            owners.len(),
            total,
            errors.len(),
            duplicates_removed
        );
        debug!("{} rows passed validation", validated);

        let summary = ImportSummary {
            total,
            successful: owners.len(),
            duplicates_removed,
            error_count: errors.len(),
            errors: errors
                .iter()
                .take(self.error_display_cap)
                .map(|e| e.to_string())
                .collect(),
        };

        Ok(ImportOutcome {
            owners,
            errors,
            summary,
        })
    }
}
