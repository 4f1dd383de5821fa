//! The CSV load job.

use super::cleaning::{prepare_data_for_loading, RowRejection};
use super::frame::RawTable;
use crate::app::review_service::ReviewService;
use crate::error::{LoadError, PipelineError};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of a load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    /// Rows read from the file.
    pub read: usize,
    pub inserted_ids: Vec<i64>,
    pub rejected: Vec<RowRejection>,
}

impl LoadSummary {
    pub fn loaded(&self) -> usize {
        self.inserted_ids.len()
    }
}

/// Reads `path`, cleans it and inserts the valid rows into `reviews` in one transaction.
pub async fn load_data(service: &ReviewService, path: &Path) -> Result<LoadSummary, LoadError> {
    let table = RawTable::from_path(path).map_err(PipelineError::from)?;
    load_table(service, table).await
}

/// Same as [`load_data`] for a table already in memory.
pub async fn load_table(service: &ReviewService, table: RawTable) -> Result<LoadSummary, LoadError> {
    let read = table.len();
    let report = prepare_data_for_loading(table, service.countries())?;
    info!(target: "data_loader", "expected to load {} rows", report.rows.len());

    let inserted_ids = service.insert_cleaned(&report.rows).await?;
    info!(
        target: "data_loader",
        "loaded {} rows ({} read, {} rejected)",
        inserted_ids.len(),
        read,
        report.rejected.len()
    );

    Ok(LoadSummary {
        read,
        inserted_ids,
        rejected: report.rejected,
    })
}
