use serde::{Deserialize, Serialize};

use crate::data::error::LoadError;
use crate::data::loader::{RawRow, RawSheet};
use crate::state::measurement::MeasurementSeries;

/// Which rows survive cleaning besides the measurement having to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Drop rows with an empty index or measurement cell.
    DropIncomplete,
    /// Keep only rows whose index cell is itself a number.
    NumericIndexOnly,
}

impl Default for RowPolicy {
    fn default() -> Self {
        RowPolicy::DropIncomplete
    }
}

impl RowPolicy {
    pub const ALL: [RowPolicy; 2] = [RowPolicy::DropIncomplete, RowPolicy::NumericIndexOnly];

    pub fn label(&self) -> &'static str {
        match self {
            RowPolicy::DropIncomplete => "Drop incomplete rows",
            RowPolicy::NumericIndexOnly => "Numeric index rows only",
        }
    }

    fn keeps(&self, row: &RawRow) -> bool {
        match self {
            RowPolicy::DropIncomplete => !row.index.trim().is_empty(),
            RowPolicy::NumericIndexOnly => parse_decimal(&row.index).is_some(),
        }
    }
}

/// Parse a cell as a finite number, accepting a comma decimal separator.
///
/// Returns `None` for anything that is not a number; callers discard those
/// rows instead of treating them as zero.
pub fn parse_decimal(cell: &str) -> Option<f64> {
    let normalized = cell.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turn a raw sheet into a measurement series under the given row policy.
pub fn clean(sheet: RawSheet, policy: RowPolicy) -> Result<MeasurementSeries, LoadError> {
    let total = sheet.rows.len();
    let values: Vec<f64> = sheet
        .rows
        .iter()
        .filter(|row| policy.keeps(row))
        .filter_map(|row| parse_decimal(&row.measurement))
        .collect();

    if values.is_empty() {
        return Err(LoadError::NoUsableRows {
            file: sheet.source_name,
        });
    }

    let discarded = total - values.len();
    if discarded > 0 {
        tracing::debug!(
            "{}: kept {} of {total} rows of column {:?} ({discarded} discarded)",
            sheet.source_name,
            values.len(),
            sheet.header.get(1).map(String::as_str).unwrap_or_default()
        );
    }

    Ok(MeasurementSeries::new(sheet.source_name, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[(&str, &str)]) -> RawSheet {
        RawSheet {
            source_name: "sample.xlsx".to_string(),
            header: vec!["No.".to_string(), "Water".to_string()],
            rows: rows
                .iter()
                .map(|(i, m)| RawRow {
                    index: i.to_string(),
                    measurement: m.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_decimal_comma_is_normalized() {
        assert_eq!(parse_decimal("12,34"), Some(12.34));
        assert_eq!(parse_decimal(" 7.5 "), Some(7.5));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_unparseable_measurement_is_discarded_not_zeroed() {
        let series = clean(sheet(&[("1", "12,34"), ("2", "abc"), ("3", "10")]), RowPolicy::DropIncomplete)
            .unwrap();
        assert_eq!(series.values, vec![12.34, 10.0]);
        assert_eq!(series.source_name, "sample.xlsx");
    }

    #[test]
    fn test_drop_incomplete_keeps_text_index() {
        let rows = [("1", "90"), ("", "91"), ("mean", "92"), ("4", "")];
        let series = clean(sheet(&rows), RowPolicy::DropIncomplete).unwrap();
        assert_eq!(series.values, vec![90.0, 92.0]);
    }

    #[test]
    fn test_numeric_index_only_drops_summary_rows() {
        let rows = [("1", "90"), ("", "91"), ("mean", "92"), ("3,0", "93")];
        let series = clean(sheet(&rows), RowPolicy::NumericIndexOnly).unwrap();
        assert_eq!(series.values, vec![90.0, 93.0]);
    }

    #[test]
    fn test_no_surviving_rows_is_an_error() {
        let err = clean(sheet(&[("1", "n/a"), ("2", "")]), RowPolicy::DropIncomplete).unwrap_err();
        assert_eq!(
            err,
            LoadError::NoUsableRows {
                file: "sample.xlsx".to_string()
            }
        );
    }

    #[test]
    fn test_empty_sheet_is_an_error() {
        assert!(clean(sheet(&[]), RowPolicy::NumericIndexOnly).is_err());
    }
}
