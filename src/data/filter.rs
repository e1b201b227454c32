use std::collections::BTreeSet;

use super::error::PipelineError;
use super::model::{CellValue, ColumnId, Table};
use super::options::{rank_options, OptionEntry};

// ---------------------------------------------------------------------------
// Predicate: one resolved (column, value) selection
// ---------------------------------------------------------------------------

/// Equality constraint on a column.
///
/// Cells are compared after string coercion, so a numeric cell `1.0` does
/// not match the value `"1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: ColumnId,
    pub value: String,
}

impl Predicate {
    pub fn new(column: ColumnId, value: impl Into<String>) -> Self {
        Predicate {
            column,
            value: value.into(),
        }
    }

    fn matches(&self, row: &[CellValue]) -> bool {
        row.get(self.column.0)
            .is_some_and(|cell| cell.coerce() == self.value)
    }
}

/// Rows of a [`Table`] that passed every predicate; same columns as the source.
pub type FilteredTable = Table;

fn check_columns(table: &Table, predicates: &[Predicate]) -> Result<(), PipelineError> {
    for p in predicates {
        table.column(p.column)?;
    }
    Ok(())
}

fn matching_rows<'a>(
    table: &'a Table,
    predicates: &'a [Predicate],
) -> impl Iterator<Item = &'a Vec<CellValue>> + 'a {
    table
        .rows()
        .iter()
        .filter(move |row| predicates.iter().all(|p| p.matches(row)))
}

/// Distinct coerced values of `column` among rows passing all `predicates`.
pub fn distinct_values(
    table: &Table,
    column: ColumnId,
    predicates: &[Predicate],
) -> Result<BTreeSet<String>, PipelineError> {
    table.column(column)?;
    check_columns(table, predicates)?;

    Ok(matching_rows(table, predicates)
        .map(|row| row[column.0].coerce())
        .collect())
}

/// [`distinct_values`] in presentation order, ready for a selection widget.
///
/// Labels are exactly what [`sort_options`](super::options::sort_options)
/// yields; each entry also carries the cell value to filter on.
pub fn candidate_options(
    table: &Table,
    column: ColumnId,
    predicates: &[Predicate],
) -> Result<Vec<OptionEntry>, PipelineError> {
    let distinct: Vec<String> = distinct_values(table, column, predicates)?
        .into_iter()
        .collect();
    Ok(rank_options(&distinct))
}

/// Keep the rows matching every predicate, in their original order.
///
/// An empty predicate list returns the whole table.
pub fn apply_filters(table: &Table, predicates: &[Predicate]) -> Result<FilteredTable, PipelineError> {
    check_columns(table, predicates)?;
    let rows = matching_rows(table, predicates).cloned().collect();
    Ok(table.with_rows(rows))
}
