// ---------------------------------------------------------------------------
// Application constants
// ---------------------------------------------------------------------------

/// Window title.
pub const APP_TITLE: &str = "Lecture Finder – Know Your Lecture's Schedule";

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

/// Highest row index (0-based) that may be promoted to the header row.
pub const MAX_HEADER_INDEX: usize = 10;

/// Number of leading rows shown in the previews; one per selectable header index.
pub const PREVIEW_ROWS: usize = MAX_HEADER_INDEX + 1;

/// File extensions accepted by the decoder.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

pub const EXPORT_FILE_NAME: &str = "filtered_results.csv";
pub const EXPORT_MIME: &str = "text/csv";
pub const EXPORT_DELIMITER: u8 = b',';

/// Text a blank cell coerces to.
pub const NULL_LABEL: &str = "nan";
