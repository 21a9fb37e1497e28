use thiserror::Error;

#[derive(Error, Debug)]
pub enum NowiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Excel file contains no data rows")]
    EmptyInput,

    #[error("No valid sheet found in Excel file")]
    NoSheet,

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported county: {0} (expected Garfield or Rio Blanco)")]
    UnsupportedCounty(String),

    #[error("Invalid PLSS entry: {0}")]
    InvalidPlss(String),

    #[error("No PLSS entries queued; add entries or load the preset first")]
    EmptyQueue,
}

pub type Result<T> = std::result::Result<T, NowiError>;

/// A single rejected row. `row` is the spreadsheet row number (data index + 2, header is row 1).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Row {row}: Missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("Row {row}: Invalid township format")]
    InvalidTownship { row: usize },

    #[error("Row {row}: Invalid range format")]
    InvalidRange { row: usize },

    #[error("Row {row}: Section must be between 1-36")]
    SectionOutOfRange { row: usize },

    #[error("Row {row}: Invalid Evidence_Link URL format")]
    InvalidEvidenceLink { row: usize },
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingField { row, .. }
            | RowError::InvalidTownship { row }
            | RowError::InvalidRange { row }
            | RowError::SectionOutOfRange { row }
            | RowError::InvalidEvidenceLink { row } => *row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_messages() {
        let missing = RowError::MissingField { row: 4, field: "County" };
        assert_eq!(missing.to_string(), "Row 4: Missing required field 'County'");
        assert_eq!(missing.row(), 4);

        assert_eq!(
            RowError::SectionOutOfRange { row: 2 }.to_string(),
            "Row 2: Section must be between 1-36"
        );
        assert_eq!(
            RowError::InvalidEvidenceLink { row: 9 }.to_string(),
            "Row 9: Invalid Evidence_Link URL format"
        );
    }

    #[test]
    fn test_whole_input_messages() {
        assert_eq!(NowiError::EmptyInput.to_string(), "Excel file contains no data rows");
        assert_eq!(NowiError::NoSheet.to_string(), "No valid sheet found in Excel file");
    }
}
