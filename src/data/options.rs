//! Option ordering for the selection widgets.
//!
//! Ordering is all-or-nothing: when every value parses as a number the list
//! is sorted numerically and re-rendered in canonical float form, otherwise
//! the untouched strings are sorted lexicographically.

use super::model::Column;

/// Parse a value the way the numeric branch of [`sort_options`] does.
///
/// Surrounding whitespace is ignored; `inf` and `nan` are accepted, and so
/// are single underscores between digits (`1_000`).
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if !value.contains('_') {
        return value.parse::<f64>().ok();
    }
    let bytes = value.as_bytes();
    let grouped = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !grouped {
        return None;
    }
    value.replace('_', "").parse::<f64>().ok()
}

fn numeric_keys<S: AsRef<str>>(values: &[S]) -> Option<Vec<f64>> {
    values.iter().map(|v| parse_number(v.as_ref())).collect()
}

/// Positions of `values` in presentation order. Stable, so equal keys keep
/// their input order.
fn sorted_positions<S: AsRef<str>>(values: &[S], numbers: Option<&[f64]>) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..values.len()).collect();
    match numbers {
        Some(numbers) => positions.sort_by(|&a, &b| numbers[a].total_cmp(&numbers[b])),
        None => positions.sort_by(|&a, &b| values[a].as_ref().cmp(values[b].as_ref())),
    }
    positions
}

/// A selectable option: the text shown in a widget and the cell value it
/// stands for. They differ only when numeric canonicalisation applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub label: String,
    pub value: String,
}

/// Order values for presentation, keeping each original value next to its
/// displayed label. Duplicates are kept.
pub fn rank_options<S: AsRef<str>>(values: &[S]) -> Vec<OptionEntry> {
    let numbers = numeric_keys(values);
    let positions = sorted_positions(values, numbers.as_deref());
    sort_options(values)
        .into_iter()
        .zip(positions)
        .map(|(label, i)| OptionEntry {
            label,
            value: values[i].as_ref().to_string(),
        })
        .collect()
}

/// Sort option values for presentation. Duplicates are kept.
///
/// `["10", "2", "1"]` becomes `["1.0", "2.0", "10.0"]`; `["b", "10", "a"]`
/// becomes `["10", "a", "b"]`.
pub fn sort_options<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let numbers = numeric_keys(values);
    let positions = sorted_positions(values, numbers.as_deref());
    match numbers {
        Some(numbers) => positions
            .into_iter()
            .map(|i| canonical_float(numbers[i]))
            .collect(),
        None => positions
            .into_iter()
            .map(|i| values[i].as_ref().to_string())
            .collect(),
    }
}

/// Order columns for the column pickers.
///
/// Same all-or-nothing rule as [`sort_options`], applied to the labels, but
/// the original label text is kept so positions and labels stay paired.
pub fn sort_columns(columns: &[Column]) -> Vec<Column> {
    let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    let numbers = numeric_keys(&labels);
    sorted_positions(&labels, numbers.as_deref())
        .into_iter()
        .map(|i| columns[i].clone())
        .collect()
}

/// Render a float in its canonical decimal form.
///
/// Integral values keep a trailing `.0`, magnitudes outside `[1e-4, 1e16)`
/// switch to exponent notation with a signed two-digit exponent.
pub fn canonical_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or_default();
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            None => sci,
        };
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
