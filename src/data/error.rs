use thiserror::Error;

/// Why a single uploaded file produced no measurement series.
///
/// Every variant carries the offending file's name so the warning shown to
/// the user can identify it without extra context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The extension is not one of the spreadsheet formats we read.
    #[error("Error loading {file}: unsupported file format .{extension}")]
    Unsupported { file: String, extension: String },

    /// The file could not be opened or its first sheet could not be read.
    #[error("Error loading {file}: {cause}")]
    Read { file: String, cause: String },

    /// The header row has fewer than the two expected columns.
    #[error("Error loading {file}: expected an index and a measurement column, found {found} column(s)")]
    MissingColumns { file: String, found: usize },

    /// Every data row was discarded during cleaning.
    #[error("Error loading {file}: no usable numeric rows")]
    NoUsableRows { file: String },
}

impl LoadError {
    pub fn file(&self) -> &str {
        match self {
            LoadError::Unsupported { file, .. }
            | LoadError::Read { file, .. }
            | LoadError::MissingColumns { file, .. }
            | LoadError::NoUsableRows { file } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_the_file() {
        let err = LoadError::Read {
            file: "sample_a.xlsx".to_string(),
            cause: "zip archive is corrupt".to_string(),
        };
        assert_eq!(err.file(), "sample_a.xlsx");
        let msg = err.to_string();
        assert!(msg.contains("sample_a.xlsx"));
        assert!(msg.contains("zip archive is corrupt"));
    }

    #[test]
    fn test_missing_columns_display() {
        let err = LoadError::MissingColumns {
            file: "one_col.csv".to_string(),
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Error loading one_col.csv: expected an index and a measurement column, found 1 column(s)"
        );
    }
}
