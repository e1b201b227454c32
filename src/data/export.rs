use crate::config::EXPORT_DELIMITER;

use super::error::PipelineError;
use super::filter::FilteredTable;
use super::model::ColumnId;

/// Serialise `filtered` projected onto `columns` as UTF-8 CSV.
///
/// One header line with the column labels in the given order, then one line
/// per row. Fields containing the delimiter, a quote or a newline are quoted.
pub fn export(filtered: &FilteredTable, columns: &[ColumnId]) -> Result<Vec<u8>, PipelineError> {
    if columns.is_empty() {
        return Err(PipelineError::EmptySelection);
    }
    let labels = columns
        .iter()
        .map(|&id| filtered.column(id).map(|c| c.label.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let write_err = |e: csv::Error| PipelineError::Write(e.to_string());
    writer.write_record(&labels).map_err(write_err)?;
    for row in filtered.rows() {
        writer
            .write_record(columns.iter().map(|id| row[id.0].export_text()))
            .map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Write(e.to_string()))?;
    log::info!(
        "Exported {} rows x {} columns ({} bytes)",
        filtered.row_count(),
        columns.len(),
        bytes.len()
    );
    Ok(bytes)
}
