//! Spreadsheet (XLSX/XLS/ODS) decoding. Only the first sheet is read; its
//! first row is the header row.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use serde_json::{Number, Value};

use crate::error::EngineError;
use crate::extract::RawRow;

/// Decodes the first worksheet of a workbook into header → cell rows.
///
/// Typed cells keep their type: integers and floats become JSON numbers,
/// dates become `YYYY-MM-DD` strings. Columns with a blank header and rows
/// with no filled cell are skipped.
///
/// # Errors
///
/// Returns [`EngineError::Workbook`] when the bytes are not a readable
/// workbook or the first sheet cannot be loaded.
pub fn decode_workbook(file: &str, bytes: &[u8]) -> Result<Vec<RawRow>, EngineError> {
    let workbook_err = |source| EngineError::Workbook {
        file: file.to_owned(),
        source,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_err)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        tracing::warn!(file, "workbook has no sheets");
        return Ok(Vec::new());
    };
    let range = range.map_err(workbook_err)?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|cells| cells.iter().map(header_text).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let mut row = RawRow::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() || row.contains_key(header) {
                continue;
            }
            row.insert(
                header.clone(),
                cells.get(idx).map_or(Value::Null, cell_value),
            );
        }
        if row.values().all(Value::is_null) {
            continue;
        }
        rows.push(row);
    }

    tracing::debug!(file, columns = headers.len(), rows = rows.len(), "decoded workbook");
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_owned())
            }
        }
        Data::DateTime(_) => cell
            .as_date()
            .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_value_keeps_typed_cells() {
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Int(12)), Value::from(12));
        assert_eq!(cell_value(&Data::Float(350.5)), Value::from(350.5));
        assert_eq!(
            cell_value(&Data::String("  Felicita 1643 ".to_owned())),
            Value::from("Felicita 1643")
        );
        assert_eq!(cell_value(&Data::String("   ".to_owned())), Value::Null);
        assert_eq!(cell_value(&Data::Float(f64::NAN)), Value::Null);
    }

    #[test]
    fn header_text_renders_numeric_headers() {
        assert_eq!(header_text(&Data::String(" Título ".to_owned())), "Título");
        assert_eq!(header_text(&Data::Int(2024)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
    }

    #[test]
    fn garbage_bytes_are_a_workbook_error() {
        let err = decode_workbook("meta.xlsx", b"PK\x03\x04not really a zip").unwrap_err();
        assert!(matches!(err, EngineError::Workbook { ref file, .. } if file == "meta.xlsx"));
        assert!(!err.is_input_shape());
    }
}
