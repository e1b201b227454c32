use std::fmt;

use crate::config::{MAX_HEADER_INDEX, NULL_LABEL};

use super::error::PipelineError;
use super::options::canonical_float;

// ---------------------------------------------------------------------------
// CellValue – a single decoded cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the file decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date / time / duration kept as ISO-8601 text.
    DateTime(String),
    /// Spreadsheet error cell (`#DIV/0!`, `#N/A`, ...).
    Error(String),
    Empty,
}

impl CellValue {
    /// String coercion used for labels, option lists and equality filters.
    ///
    /// Blank cells coerce to [`NULL_LABEL`], floats to their canonical form
    /// (`7.0`, `2.5`, `1e+20`).
    pub fn coerce(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => canonical_float(*v),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::Empty => NULL_LABEL.to_string(),
        }
    }

    /// Text written to an exported CSV field. Blank cells stay empty.
    pub fn export_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            other => other.coerce(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            other => write!(f, "{}", other.coerce()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – decoded rows, no header semantics
// ---------------------------------------------------------------------------

/// Rectangular grid of decoded cells. Never mutated after decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl RawTable {
    /// Build a table, padding short rows with [`CellValue::Empty`] up to the
    /// widest row.
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        RawTable { rows, width }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in every row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// The first `n` rows (or fewer).
    pub fn preview(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

// ---------------------------------------------------------------------------
// HeaderIndex – bounded row choice
// ---------------------------------------------------------------------------

/// 0-based index of the row holding the column labels, within
/// `0..=MAX_HEADER_INDEX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeaderIndex(usize);

impl HeaderIndex {
    pub fn new(value: i64) -> Result<Self, PipelineError> {
        match usize::try_from(value) {
            Ok(index) if index <= MAX_HEADER_INDEX => Ok(HeaderIndex(index)),
            _ => Err(PipelineError::InvalidHeader {
                index: value,
                reason: format!("the header row must be between 0 and {MAX_HEADER_INDEX}"),
            }),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Table – headered view of a RawTable
// ---------------------------------------------------------------------------

/// Positional handle of a column. Labels may repeat, positions never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub label: String,
}

/// Column labels plus the data rows beneath the header row.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub(crate) fn new(labels: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Column {
                id: ColumnId(i),
                label,
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id).collect()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by position.
    pub fn column(&self, id: ColumnId) -> Result<&Column, PipelineError> {
        self.columns
            .get(id.0)
            .ok_or_else(|| PipelineError::ColumnNotFound(format!("#{}", id.0)))
    }

    /// Resolve a label to the first column carrying it.
    pub fn column_id(&self, label: &str) -> Result<ColumnId, PipelineError> {
        self.columns
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.id)
            .ok_or_else(|| PipelineError::ColumnNotFound(format!("'{label}'")))
    }

    pub(crate) fn with_rows(&self, rows: Vec<Vec<CellValue>>) -> Self {
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn coerce_follows_cell_type() {
        assert_eq!(text("SCSE").coerce(), "SCSE");
        assert_eq!(CellValue::Integer(42).coerce(), "42");
        assert_eq!(CellValue::Float(7.0).coerce(), "7.0");
        assert_eq!(CellValue::Float(2.5).coerce(), "2.5");
        assert_eq!(CellValue::Bool(true).coerce(), "True");
        assert_eq!(CellValue::Empty.coerce(), "nan");
    }

    #[test]
    fn export_text_leaves_blank_cells_empty() {
        assert_eq!(CellValue::Empty.export_text(), "");
        assert_eq!(CellValue::Float(1.0).export_text(), "1.0");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn raw_table_pads_ragged_rows() {
        let raw = RawTable::from_rows(vec![
            vec![text("a")],
            vec![text("b"), text("c"), text("d")],
            vec![],
        ]);
        assert_eq!(raw.width(), 3);
        assert!(raw.rows().iter().all(|r| r.len() == 3));
        assert_eq!(raw.row(0), Some(&[text("a"), CellValue::Empty, CellValue::Empty][..]));
        assert_eq!(raw.row(3), None);
    }

    #[test]
    fn preview_is_bounded_by_row_count() {
        let raw = RawTable::from_rows(vec![vec![text("a")], vec![text("b")]]);
        assert_eq!(raw.preview(11).len(), 2);
        assert_eq!(raw.preview(1).len(), 1);
        assert!(RawTable::default().preview(5).is_empty());
    }

    #[test]
    fn header_index_is_bounded() {
        assert_eq!(HeaderIndex::new(0).map(HeaderIndex::get), Ok(0));
        assert_eq!(HeaderIndex::new(10).map(HeaderIndex::get), Ok(10));
        assert!(matches!(
            HeaderIndex::new(11),
            Err(PipelineError::InvalidHeader { .. })
        ));
        assert!(matches!(
            HeaderIndex::new(-1),
            Err(PipelineError::InvalidHeader { index: -1, .. })
        ));
    }

    #[test]
    fn rejected_header_index_is_reported_as_given() {
        let message = HeaderIndex::new(-3).err().map(|e| e.to_string());
        assert_eq!(
            message.as_deref(),
            Some("row -3 cannot be used as the header: the header row must be between 0 and 10")
        );
        let message = HeaderIndex::new(12).err().map(|e| e.to_string());
        assert!(message.is_some_and(|m| m.starts_with("row 12 ")));
    }

    #[test]
    fn column_lookup_by_label_and_position() {
        let table = Table::new(
            vec!["Day".into(), "Room".into(), "Day".into()],
            Vec::new(),
        );
        assert_eq!(table.column_id("Day"), Ok(ColumnId(0)));
        assert_eq!(table.column_id("Room"), Ok(ColumnId(1)));
        assert_eq!(
            table.column_id("Time"),
            Err(PipelineError::ColumnNotFound("'Time'".into()))
        );
        assert_eq!(table.column(ColumnId(2)).map(|c| c.label.as_str()), Ok("Day"));
        assert!(table.column(ColumnId(3)).is_err());
    }
}
