//! Upload decoding into header → cell rows: CSV here, workbooks in
//! [`crate::workbook`].

use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;

use crate::error::EngineError;
use crate::extract::RawRow;
use crate::workbook::decode_workbook;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Workbook,
}

/// Workbook when the bytes open with a ZIP or OLE signature or the file name
/// has a spreadsheet extension; CSV otherwise.
#[must_use]
pub fn detect_format(file: &str, bytes: &[u8]) -> UploadFormat {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        return UploadFormat::Workbook;
    }
    let has_workbook_extension = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });
    if has_workbook_extension {
        UploadFormat::Workbook
    } else {
        UploadFormat::Csv
    }
}

/// Decodes an uploaded file of either format.
///
/// # Errors
///
/// Propagates the error of [`decode_csv`] or [`decode_workbook`].
pub fn decode_upload(file: &str, bytes: &[u8]) -> Result<Vec<RawRow>, EngineError> {
    match detect_format(file, bytes) {
        UploadFormat::Csv => decode_csv(file, bytes),
        UploadFormat::Workbook => decode_workbook(file, bytes),
    }
}

/// Decodes CSV bytes into rows keyed by (trimmed) header, in column order.
/// Every non-empty cell is a string.
///
/// The delimiter is `;` when the header line holds more semicolons than
/// commas, else `,`. Short records are padded with nulls and surplus cells
/// are ignored. When a header repeats, the first column wins.
///
/// # Errors
///
/// Returns [`EngineError::Encoding`] for non-UTF-8 input and
/// [`EngineError::Decode`] for malformed CSV. `file` names the upload in
/// both.
pub fn decode_csv(file: &str, bytes: &[u8]) -> Result<Vec<RawRow>, EngineError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|_| EngineError::Encoding {
        file: file.to_owned(),
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(text))
        .from_reader(text.as_bytes());

    let decode_err = |source| EngineError::Decode {
        file: file.to_owned(),
        source,
    };

    let headers: Vec<String> = rdr
        .headers()
        .map_err(decode_err)?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(decode_err)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut row = RawRow::new();
        for (idx, header) in headers.iter().enumerate() {
            if row.contains_key(header) {
                continue;
            }
            row.insert(header.clone(), coerce_cell(record.get(idx).unwrap_or("")));
        }
        rows.push(row);
    }

    tracing::debug!(file, columns = headers.len(), rows = rows.len(), "decoded csv");
    Ok(rows)
}

fn detect_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or_default();
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Empty → null, anything else → trimmed string. Numeric columns are parsed
/// later by the extractors, so text columns keep their exact spelling.
fn coerce_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use leadrecon_core::SourceFile;

    use super::*;
    use crate::extract::{extract_campaigns, extract_leads};

    #[test]
    fn decodes_comma_separated_rows_in_column_order() {
        let csv = "Nome da campanha,Resultados,Valor usado (BRL)\nFelicita 1643,12,350.5\n";
        let rows = decode_csv("a.csv", csv.as_bytes()).expect("decode");
        assert_eq!(rows.len(), 1);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Nome da campanha", "Resultados", "Valor usado (BRL)"]);
        assert_eq!(rows[0]["Resultados"], Value::from("12"));
        assert_eq!(rows[0]["Valor usado (BRL)"], Value::from("350.5"));
    }

    #[test]
    fn detects_semicolon_delimiter_and_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Título;Status\n[4219] João;Arquivado\n".as_bytes());
        let rows = decode_csv("leads.csv", &bytes).expect("decode");
        assert_eq!(rows[0]["Título"], Value::from("[4219] João"));
        assert_eq!(rows[0]["Status"], Value::from("Arquivado"));
    }

    #[test]
    fn quoted_cells_keep_embedded_delimiters() {
        let csv = "Título,Fonte\n\"Silva, João\",\"Landing Page, Site\"\n";
        let rows = decode_csv("leads.csv", csv.as_bytes()).expect("decode");
        assert_eq!(rows[0]["Título"], Value::from("Silva, João"));
    }

    #[test]
    fn short_records_pad_with_null_and_blank_lines_are_skipped() {
        let csv = "Título,Status,Responsável\n[1643] Ana,Novo\n,,\n[1643] Bia,Novo,Carla\n";
        let rows = decode_csv("leads.csv", csv.as_bytes()).expect("decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Responsável"], Value::Null);
        assert_eq!(rows[1]["Responsável"], Value::from("Carla"));
    }

    #[test]
    fn headers_are_trimmed_and_first_duplicate_wins() {
        let csv = " Título ,Status,Status\nAna,Novo,Velho\n";
        let rows = decode_csv("leads.csv", csv.as_bytes()).expect("decode");
        assert_eq!(rows[0]["Título"], Value::from("Ana"));
        assert_eq!(rows[0]["Status"], Value::from("Novo"));
    }

    #[test]
    fn coerce_cell_keeps_cells_verbatim() {
        assert_eq!(coerce_cell("  "), Value::Null);
        assert_eq!(coerce_cell(" 42 "), Value::from("42"));
        assert_eq!(coerce_cell("0123"), Value::from("0123"));
        assert_eq!(coerce_cell("2024.10"), Value::from("2024.10"));
        assert_eq!(coerce_cell("12,5"), Value::from("12,5"));
    }

    #[test]
    fn numeric_looking_names_and_titles_survive_extraction() {
        let csv = r#"Nome da campanha,Início dos relatórios,Resultados,Valor usado (BRL)
                   2024.10,2024-03-01,5,"12,5"
                   1e3,2024-03-01,1.50,0
                   12345678901234567890,2024-03-01,0,0
"#;
        let rows = decode_csv("meta.csv", csv.as_bytes()).expect("decode");
        let campaigns = extract_campaigns(&rows, SourceFile::AdPlatform(1));
        let names: Vec<&str> = campaigns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2024.10", "1e3", "12345678901234567890"]);
        assert!((campaigns[0].result_count - 5.0).abs() < f64::EPSILON);
        assert!((campaigns[0].amount_spent - 12.5).abs() < f64::EPSILON);
        assert!((campaigns[1].result_count - 1.5).abs() < f64::EPSILON);

        let leads_csv = "Título;Status
1.50;Novo
0042;Novo
";
        let rows = decode_csv("leads.csv", leads_csv.as_bytes()).expect("decode");
        let titles: Vec<String> = extract_leads(&rows).into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["1.50", "0042"]);
    }

    #[test]
    fn detects_workbooks_by_signature_or_extension() {
        assert_eq!(detect_format("meta.bin", b"PK\x03\x04rest"), UploadFormat::Workbook);
        assert_eq!(detect_format("old", OLE_MAGIC), UploadFormat::Workbook);
        assert_eq!(detect_format("Meta 1.XLSX", b""), UploadFormat::Workbook);
        assert_eq!(detect_format("leads.csv", b"T\xc3\xadtulo\n"), UploadFormat::Csv);
        assert_eq!(detect_format("leads", b"a,b\n"), UploadFormat::Csv);
    }

    #[test]
    fn decode_upload_dispatches_on_format() {
        let rows = decode_upload("leads.csv", "Título\n[1643] Ana\n".as_bytes()).expect("csv");
        assert_eq!(rows[0]["Título"], Value::from("[1643] Ana"));

        let err = decode_upload("meta.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, EngineError::Workbook { .. }));
    }

    #[test]
    fn non_utf8_input_is_an_encoding_error() {
        let err = decode_csv("bad.csv", &[0x66, 0xff, 0xfe, 0x0a]).unwrap_err();
        assert!(matches!(err, EngineError::Encoding { ref file } if file == "bad.csv"));
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let rows = decode_csv("empty.csv", b"Nome da campanha,Resultados\n").expect("decode");
        assert!(rows.is_empty());
        let rows = decode_csv("blank.csv", b"").expect("decode");
        assert!(rows.is_empty());
    }
}
