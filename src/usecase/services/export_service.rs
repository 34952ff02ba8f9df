use std::path::Path;

use anyhow::Result;

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::snapshot::Snapshot;
use crate::infra::export::csv::export_tickets_to_csv;

pub struct ExportService;

impl ExportService {
    pub fn export_csv(&self, path: &Path, dataset: DatasetKind, view: &Snapshot) -> Result<usize> {
        let written = export_tickets_to_csv(path, dataset.config(), view)?;
        tracing::info!(?dataset, rows = written, path = %path.display(), "tickets exported");
        Ok(written)
    }
}
