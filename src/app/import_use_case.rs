use metrics::counter;
use serde::Serialize;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::app::ports::{OwnerOutputPort, TabularInputPort};
use crate::error::Result;
use crate::pipeline::{ImportOutcome, ImportPipeline, NoProgress, ProgressObserver};

/// Result of one import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub source: String,
    pub outcome: ImportOutcome,
    /// Where the cleaned dataset was written, if an output was configured
    pub output_file: Option<String>,
}

/// Use case for loading a user-supplied sheet and turning it into a clean owner dataset
pub struct ImportUseCase {
    input: Box<dyn TabularInputPort>,
    pipeline: ImportPipeline,
    output: Option<Box<dyn OwnerOutputPort>>,
}

impl ImportUseCase {
    pub fn new(input: Box<dyn TabularInputPort>, pipeline: ImportPipeline) -> Self {
        Self {
            input,
            pipeline,
            output: None,
        }
    }

    /// Also write the deduplicated owners once the run succeeds
    pub fn with_output(mut self, output: Box<dyn OwnerOutputPort>) -> Self {
        self.output = Some(output);
        self
    }

    pub async fn execute(&self) -> Result<ImportReport> {
        self.execute_with_progress(&NoProgress).await
    }

    pub async fn execute_with_progress(&self, progress: &dyn ProgressObserver) -> Result<ImportReport> {
        let run_id = Uuid::new_v4();
        let source = self.input.describe();
        let span = tracing::info_span!("import", run_id = %run_id, source = %source);

        async move {
            info!("Starting import");

            let outcome = match self.load_and_run(progress).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Import failed: {}", e);
                    counter!("nowi_import_failures_total").increment(1);
                    return Err(e);
                }
            };

            counter!("nowi_import_rows_total").increment(outcome.summary.total as u64);
            counter!("nowi_import_rows_rejected_total").increment(outcome.summary.error_count as u64);
            counter!("nowi_import_duplicates_total").increment(outcome.summary.duplicates_removed as u64);

            let output_file = match &self.output {
                Some(output) => Some(output.write_owners(&outcome.owners).await?),
                None => None,
            };
            if let Some(file) = &output_file {
                info!("Saved {} owners to {}", outcome.owners.len(), file);
            }

            Ok(ImportReport {
                run_id,
                source,
                outcome,
                output_file,
            })
        }
        .instrument(span)
        .await
    }

    async fn load_and_run(&self, progress: &dyn ProgressObserver) -> Result<ImportOutcome> {
        let rows = self.input.load_rows().await?;
        self.pipeline.run_with_progress(&rows, progress)
    }
}
