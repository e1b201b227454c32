use super::error::PipelineError;
use super::model::{CellValue, HeaderIndex, RawTable, Table};

/// Promote row `header_index` of `raw` to column labels.
///
/// Rows above the header are dropped, rows below become the data rows
/// (re-indexed from zero). `raw` is left untouched so a different index can
/// be promoted later from the same source.
pub fn promote_header(raw: &RawTable, header_index: HeaderIndex) -> Result<Table, PipelineError> {
    let index = header_index.get();
    let header_row = raw.row(index).ok_or_else(|| {
        PipelineError::invalid_header(
            index,
            format!("the file only has {} rows", raw.row_count()),
        )
    })?;

    let labels = header_row
        .iter()
        .enumerate()
        .map(|(col, cell)| match cell {
            CellValue::Error(code) => Err(PipelineError::invalid_header(
                index,
                format!("cell {col} holds the spreadsheet error {code}"),
            )),
            other => Ok(other.coerce()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = raw.rows()[index + 1..].to_vec();
    log::info!(
        "Promoted row {index} to header: {} columns, {} data rows",
        labels.len(),
        rows.len()
    );
    Ok(Table::new(labels, rows))
}
