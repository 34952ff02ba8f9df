use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::dataset::DatasetConfig;
use crate::domain::entities::edit::TicketField;
use crate::domain::entities::snapshot::Snapshot;

pub fn export_tickets_to_csv(path: &Path, config: &DatasetConfig, view: &Snapshot) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create csv: {}", path.display()))?;
    write_tickets_csv(file, config, view)
}

/// Writes the grid as shown: a running `Nº` column and one column per
/// editable field. Returns the number of data rows written.
pub fn write_tickets_csv<W: Write>(writer: W, config: &DatasetConfig, view: &Snapshot) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut headers = vec!["Nº"];
    headers.extend(TicketField::EDITABLE.iter().map(|field| field.header(config)));
    writer
        .write_record(&headers)
        .context("failed to write csv header")?;

    for (idx, ticket) in view.iter().enumerate() {
        let mut record = vec![(idx + 1).to_string()];
        record.extend(
            TicketField::EDITABLE
                .iter()
                .map(|field| field.read(&ticket.fields)),
        );
        writer
            .write_record(&record)
            .with_context(|| format!("failed to write csv row for ticket {}", ticket.id))?;
    }

    writer.flush().context("failed to flush csv")?;
    Ok(view.len())
}
