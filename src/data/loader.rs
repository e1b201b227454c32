use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, ExcelDateTime, Reader, Xls, Xlsx};

use super::error::DecodeError;
use super::model::{CellValue, RawTable};
use super::options::canonical_float;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Formats the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xls,
    Xlsx,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Result<Self, DecodeError> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xls" => Ok(SourceFormat::Xls),
            "xlsx" => Ok(SourceFormat::Xlsx),
            other => Err(DecodeError::UnsupportedExtension(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

/// Read and decode a file, dispatching on its extension.
pub fn load_file(path: &Path) -> Result<RawTable, DecodeError> {
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode(&bytes, format)
}

/// Decode uploaded bytes into a [`RawTable`]. No row is treated as a header.
///
/// Spreadsheets contribute their first worksheet only.
pub fn decode(bytes: &[u8], format: SourceFormat) -> Result<RawTable, DecodeError> {
    let raw = match format {
        SourceFormat::Csv => decode_csv(bytes)?,
        SourceFormat::Xls => {
            decode_workbook(open_workbook_from_rs::<Xls<_>, _>(Cursor::new(bytes)))?
        }
        SourceFormat::Xlsx => {
            decode_workbook(open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes)))?
        }
    };
    log::info!(
        "Decoded {format:?} source: {} rows x {} columns",
        raw.row_count(),
        raw.width()
    );
    Ok(raw)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Every field is kept as text; empty fields become blank cells and blank
/// lines are skipped. Rows may have different lengths.
fn decode_csv(bytes: &[u8]) -> Result<RawTable, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(text_cell).collect());
    }
    Ok(RawTable::from_rows(rows))
}

fn text_cell(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(field.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheets (.xls / .xlsx)
// ---------------------------------------------------------------------------

fn decode_workbook<'a, R, E>(opened: Result<R, E>) -> Result<RawTable, DecodeError>
where
    R: Reader<Cursor<&'a [u8]>, Error = E>,
    E: Display,
{
    let mut workbook = opened.map_err(|e| DecodeError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoWorksheet)?
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;

    let rows = range
        .rows()
        .map(|r| r.iter().map(cell_from_data).collect())
        .collect();
    Ok(RawTable::from_rows(rows))
}

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Convert a workbook cell. Spreadsheets store every number as a float;
/// integral ones are read back as integers.
pub fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => {
            CellValue::Integer(*v as i64)
        }
        Data::Float(v) => CellValue::Float(*v),
        Data::Int(v) => CellValue::Integer(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(v) => CellValue::DateTime(excel_datetime_text(v)),
        Data::DateTimeIso(v) | Data::DurationIso(v) => CellValue::DateTime(v.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// Render a serial date/time cell as ISO text.
///
/// Pure times (serial below one day) drop the date part, durations print as
/// `HH:MM:SS` with hours past 24 kept. The serial number is the fallback
/// when the value is out of range.
fn excel_datetime_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        if let Some(duration) = value.as_duration() {
            let secs = duration.num_seconds();
            let sign = if secs < 0 { "-" } else { "" };
            let secs = secs.unsigned_abs();
            return format!("{sign}{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
        }
    } else if let Some(datetime) = value.as_datetime() {
        let pattern = if (0.0..1.0).contains(&value.as_f64()) {
            "%H:%M:%S"
        } else {
            "%Y-%m-%d %H:%M:%S"
        };
        return datetime.format(pattern).to_string();
    }
    canonical_float(value.as_f64())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use calamine::{CellErrorType, ExcelDateTimeType};

    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_path(Path::new("timetable.XLSX")).ok(),
            Some(SourceFormat::Xlsx)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b/list.csv")).ok(),
            Some(SourceFormat::Csv)
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("notes.txt")),
            Err(DecodeError::UnsupportedExtension(ext)) if ext == "txt"
        ));
        assert!(matches!(
            SourceFormat::from_path(Path::new("no_extension")),
            Err(DecodeError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn csv_is_decoded_without_header() {
        let raw = decode(b"Sem,Sec\n1,A\n2,B\n", SourceFormat::Csv)
            .unwrap_or_else(|e| panic!("decode: {e}"));
        assert_eq!(raw.row_count(), 3);
        assert_eq!(raw.row(0), Some(&[text("Sem"), text("Sec")][..]));
        assert_eq!(raw.row(2), Some(&[text("2"), text("B")][..]));
    }

    #[test]
    fn csv_fields_keep_their_text() {
        let raw = decode(b"007,1.50,\"a,b\"\n", SourceFormat::Csv)
            .unwrap_or_else(|e| panic!("decode: {e}"));
        assert_eq!(raw.row(0), Some(&[text("007"), text("1.50"), text("a,b")][..]));
    }

    #[test]
    fn ragged_csv_rows_are_padded() {
        let raw = decode(b"Title\n\nSem,Sec,Sch\n1,,SCSE\n2\n", SourceFormat::Csv)
            .unwrap_or_else(|e| panic!("decode: {e}"));
        assert_eq!(raw.row_count(), 4);
        assert_eq!(raw.width(), 3);
        assert_eq!(
            raw.row(0),
            Some(&[text("Title"), CellValue::Empty, CellValue::Empty][..])
        );
        assert_eq!(raw.row(2), Some(&[text("1"), CellValue::Empty, text("SCSE")][..]));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let result = decode(b"ok\n\xff\xfe\n", SourceFormat::Csv);
        assert!(matches!(result, Err(DecodeError::Csv(_))));
    }

    #[test]
    fn corrupt_workbook_is_a_decode_error() {
        let garbage = b"definitely not a zip archive";
        assert!(matches!(
            decode(garbage, SourceFormat::Xlsx),
            Err(DecodeError::Workbook(_))
        ));
        assert!(matches!(
            decode(garbage, SourceFormat::Xls),
            Err(DecodeError::Workbook(_))
        ));
    }

    #[test]
    fn workbook_cells_are_converted() {
        assert_eq!(cell_from_data(&Data::Float(3.0)), CellValue::Integer(3));
        assert_eq!(cell_from_data(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Integer(7));
        assert_eq!(cell_from_data(&Data::String("SCSE".into())), text("SCSE"));
        assert_eq!(cell_from_data(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert!(matches!(
            cell_from_data(&Data::Error(CellErrorType::Ref)),
            CellValue::Error(_)
        ));
    }

    fn serial(value: f64, kind: ExcelDateTimeType) -> CellValue {
        cell_from_data(&Data::DateTime(ExcelDateTime::new(value, kind, false)))
    }

    #[test]
    fn serial_dates_and_times_become_iso_text() {
        let date = serial(45292.0, ExcelDateTimeType::DateTime);
        assert_eq!(date, CellValue::DateTime("2024-01-01 00:00:00".into()));
        assert_eq!(date.coerce(), "2024-01-01 00:00:00");

        let stamp = serial(45292.5, ExcelDateTimeType::DateTime);
        assert_eq!(stamp.coerce(), "2024-01-01 12:00:00");

        let time = serial(0.375, ExcelDateTimeType::DateTime);
        assert_eq!(time.coerce(), "09:00:00");
        assert!(time.export_text().contains(':'));

        let length = serial(1.5, ExcelDateTimeType::TimeDelta);
        assert_eq!(length.coerce(), "36:00:00");

        let date_1904 = cell_from_data(&Data::DateTime(ExcelDateTime::new(
            1.0,
            ExcelDateTimeType::DateTime,
            true,
        )));
        assert_eq!(date_1904.coerce(), "1904-01-02 00:00:00");
    }

    #[test]
    fn iso_cells_pass_through() {
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-01-01T09:00:00".into())),
            CellValue::DateTime("2024-01-01T09:00:00".into())
        );
        assert_eq!(
            cell_from_data(&Data::DurationIso("PT1H".into())).coerce(),
            "PT1H"
        );
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
        let path = dir.path().join("schedule.csv");
        let mut file = std::fs::File::create(&path).unwrap_or_else(|e| panic!("create: {e}"));
        file.write_all(b"Sem,Sec\n1,A\n")
            .unwrap_or_else(|e| panic!("write: {e}"));

        let raw = load_file(&path).unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(raw.row_count(), 2);

        let missing = dir.path().join("missing.xlsx");
        assert!(matches!(load_file(&missing), Err(DecodeError::Io { .. })));
    }
}
