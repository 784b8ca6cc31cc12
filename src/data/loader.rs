use std::path::Path;

use crate::data::error::LoadError;

/// Extensions accepted by the file dialog and by drag-and-drop.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "ods", "csv"];

/// One data row of an uploaded sheet, before any numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub index: String,
    pub measurement: String,
}

/// The first two columns of an uploaded sheet with the header row removed.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub source_name: String,
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Display name for a path: the file name, or the whole path when it has none.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Load a CSV or spreadsheet file and split it into header and two-column rows.
pub fn load_file(path: &Path) -> Result<RawSheet, LoadError> {
    let file = source_name(path);
    let ext = extension_of(path);

    let all_rows = match ext.as_str() {
        "csv" => read_csv(path, &file)?,
        "xls" | "xlsx" | "xlsm" | "ods" => read_workbook(path, &file)?,
        _ => {
            return Err(LoadError::Unsupported {
                file,
                extension: ext,
            })
        }
    };

    split_header(file, all_rows)
}

fn split_header(file: String, all_rows: Vec<Vec<String>>) -> Result<RawSheet, LoadError> {
    let mut rows_iter = all_rows.into_iter();
    let header: Vec<String> = match rows_iter.next() {
        Some(h) => h.iter().map(|s| s.trim().to_string()).collect(),
        None => {
            return Err(LoadError::Read {
                file,
                cause: "sheet is empty".to_string(),
            })
        }
    };

    if header.len() < 2 {
        return Err(LoadError::MissingColumns {
            file,
            found: header.len(),
        });
    }

    let rows = rows_iter
        .map(|row| {
            let mut cells = row.into_iter();
            RawRow {
                index: cells.next().unwrap_or_default(),
                measurement: cells.next().unwrap_or_default(),
            }
        })
        .collect();

    Ok(RawSheet {
        source_name: file,
        header,
        rows,
    })
}

/// Semicolon-separated exports are common where the decimal separator is a
/// comma, so the first line decides the delimiter.
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.contains(';') {
        b';'
    } else if first_line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn read_csv(path: &Path, file: &str) -> Result<Vec<Vec<String>>, LoadError> {
    let content = std::fs::read(path).map_err(|e| LoadError::Read {
        file: file.to_string(),
        cause: format!("cannot read file: {e}"),
    })?;
    // Fall back to latin1 (each byte maps to the same code point).
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(&text))
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::debug!("Skipping malformed CSV record in {file}: {e}"),
        }
    }
    Ok(all_rows)
}

fn read_workbook(path: &Path, file: &str) -> Result<Vec<Vec<String>>, LoadError> {
    use calamine::{open_workbook_auto, Reader};

    let read_err = |cause: String| LoadError::Read {
        file: file.to_string(),
        cause,
    };

    let mut workbook =
        open_workbook_auto(path).map_err(|e| read_err(format!("cannot open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| read_err("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| read_err(format!("cannot read sheet {sheet_name}: {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_header_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "water.csv", "No.,Water\n1,91.2\n2,90.8\n");
        let sheet = load_file(&path).unwrap();
        assert_eq!(sheet.source_name, "water.csv");
        assert_eq!(sheet.header, vec!["No.", "Water"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].index, "1");
        assert_eq!(sheet.rows[1].measurement, "90.8");
    }

    #[test]
    fn test_semicolon_csv_keeps_decimal_comma() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "de.csv", "Nr;Winkel\n1;12,34\n2;13,5\n");
        let sheet = load_file(&path).unwrap();
        assert_eq!(sheet.rows[0].measurement, "12,34");
        assert_eq!(sheet.rows[1].measurement, "13,5");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "ragged.csv", "No.,Water\n1\n2,88.0\n");
        let sheet = load_file(&path).unwrap();
        assert_eq!(sheet.rows[0].measurement, "");
        assert_eq!(sheet.rows[1].measurement, "88.0");
    }

    #[test]
    fn test_single_column_is_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "narrow.csv", "Water\n91.2\n");
        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingColumns {
                file: "narrow.csv".to_string(),
                found: 1
            }
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", "hello");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Unsupported { ref extension, .. } if extension == "txt"));
        assert!(!is_supported(&path));
    }

    #[test]
    fn test_corrupt_workbook_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.xlsx", "this is not a zip archive");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(err.file(), "broken.xlsx");
    }

    #[test]
    fn test_xlsx_round_trip_through_calamine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("angles.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "No.").unwrap();
        sheet.write_string(0, 1, "Water").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(1, 1, 95.5).unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_string(2, 1, "96,25").unwrap();
        workbook.save(&path).unwrap();

        let sheet = load_file(&path).unwrap();
        assert_eq!(sheet.header, vec!["No.", "Water"]);
        assert_eq!(
            sheet.rows,
            vec![
                RawRow {
                    index: "1".to_string(),
                    measurement: "95.5".to_string()
                },
                RawRow {
                    index: "2".to_string(),
                    measurement: "96,25".to_string()
                },
            ]
        );
    }
}
