use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::app::ports::TabularInputPort;
use crate::error::{NowiError, Result};
use crate::types::{cell_text, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// xlsx, xlsm, xlsb, xls, ods
    Spreadsheet,
    Csv,
    Tsv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Spreadsheet),
            "csv" => Ok(InputFormat::Csv),
            "tsv" => Ok(InputFormat::Tsv),
            "json" => Ok(InputFormat::Json),
            _ => Err(NowiError::UnsupportedFormat(format!(
                "{} (expected .xlsx, .xls, .ods, .csv, .tsv or .json)",
                path.display()
            ))),
        }
    }
}

/// Rows of one sheet keyed by the header row
#[derive(Debug, Clone)]
pub struct SheetData {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Pick the sheet whose name matches `preferred` ignoring case, else the first sheet
pub fn select_sheet<'a>(names: &'a [String], preferred: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(preferred))
        .or_else(|| names.first())
        .map(|name| name.as_str())
}

/// Turn a header-first grid into keyed rows. Blank cells are left out of the row and
/// rows with no cells at all are dropped.
pub fn rows_from_grid<I>(mut grid: I) -> (Vec<String>, Vec<RawRow>)
where
    I: Iterator<Item = Vec<Value>>,
{
    let headers: Vec<String> = match grid.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_text(cell).map(|s| s.trim().to_string()).unwrap_or_default())
            .collect(),
        None => return (Vec::new(), Vec::new()),
    };

    let rows = grid
        .filter_map(|cells| {
            let mut row = RawRow::new();
            for (header, cell) in headers.iter().zip(cells) {
                if header.is_empty() || is_blank(&cell) {
                    continue;
                }
                row.insert(header.clone(), cell);
            }
            if row.is_empty() {
                None
            } else {
                Some(row)
            }
        })
        .collect();

    (headers, rows)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn data_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => Value::from(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::from(dt.as_f64()),
    }
}

/// Load the owners table from a workbook, delimited text or JSON file
#[instrument]
pub fn load_sheet(path: &Path, preferred_sheet: &str) -> Result<SheetData> {
    let sheet = match InputFormat::from_path(path)? {
        InputFormat::Spreadsheet => load_spreadsheet(path, preferred_sheet)?,
        InputFormat::Csv => load_delimited(path, b',')?,
        InputFormat::Tsv => load_delimited(path, b'\t')?,
        InputFormat::Json => load_json(path, preferred_sheet)?,
    };
    info!(
        "Loaded {} rows from sheet '{}' in {}",
        sheet.rows.len(),
        sheet.sheet_name,
        path.display()
    );
    Ok(sheet)
}

fn load_spreadsheet(path: &Path, preferred_sheet: &str) -> Result<SheetData> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    debug!("Workbook sheets: {:?}", names);

    let sheet_name = select_sheet(&names, preferred_sheet)
        .ok_or(NowiError::NoSheet)?
        .to_string();
    let range = workbook.worksheet_range(&sheet_name)?;

    let (headers, rows) =
        rows_from_grid(range.rows().map(|cells| cells.iter().map(data_to_value).collect()));

    Ok(SheetData {
        sheet_name,
        headers,
        rows,
    })
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<SheetData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(|f| Value::String(f.to_string())).collect());
    }

    let (headers, rows) = rows_from_grid(grid.into_iter());
    Ok(SheetData {
        sheet_name: file_stem(path),
        headers,
        rows,
    })
}

/// Accepts either an array of row objects or an object of sheet name -> row array
fn load_json(path: &Path, preferred_sheet: &str) -> Result<SheetData> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let (sheet_name, rows) = match value {
        Value::Array(rows) => (file_stem(path), rows),
        Value::Object(mut sheets) => {
            let names: Vec<String> = sheets.keys().cloned().collect();
            let name = select_sheet(&names, preferred_sheet)
                .ok_or(NowiError::NoSheet)?
                .to_string();
            match sheets.remove(&name) {
                Some(Value::Array(rows)) => (name, rows),
                _ => {
                    return Err(NowiError::UnsupportedFormat(format!(
                        "sheet '{}' in {} is not an array of rows",
                        name,
                        path.display()
                    )))
                }
            }
        }
        _ => {
            return Err(NowiError::UnsupportedFormat(format!(
                "{} does not contain a table",
                path.display()
            )))
        }
    };

    let mut headers: Vec<String> = Vec::new();
    let mut parsed = Vec::with_capacity(rows.len());
    for row in rows {
        let Value::Object(map) = row else {
            return Err(NowiError::UnsupportedFormat(format!(
                "{} has a row that is not an object",
                path.display()
            )));
        };
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        let row: RawRow = map.into_iter().filter(|(_, v)| !is_blank(v)).collect();
        if !row.is_empty() {
            parsed.push(row);
        }
    }

    Ok(SheetData {
        sheet_name,
        headers,
        rows: parsed,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// File-backed tabular input
pub struct WorkbookInput {
    path: PathBuf,
    sheet_name: String,
}

impl WorkbookInput {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
        }
    }
}

#[async_trait]
impl TabularInputPort for WorkbookInput {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_rows(&self) -> Result<Vec<RawRow>> {
        let path = self.path.clone();
        let sheet_name = self.sheet_name.clone();
        let sheet = tokio::task::spawn_blocking(move || load_sheet(&path, &sheet_name))
            .await
            .map_err(|e| NowiError::Io(std::io::Error::other(e)))??;
        Ok(sheet.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("a.XLSX")).unwrap(), InputFormat::Spreadsheet);
        assert_eq!(InputFormat::from_path(Path::new("a.xls")).unwrap(), InputFormat::Spreadsheet);
        assert_eq!(InputFormat::from_path(Path::new("a.csv")).unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_path(Path::new("a.json")).unwrap(), InputFormat::Json);
        assert!(matches!(
            InputFormat::from_path(Path::new("a.pdf")),
            Err(NowiError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_select_sheet() {
        let names = vec!["Summary".to_string(), "owners".to_string()];
        assert_eq!(select_sheet(&names, "OWNERS"), Some("owners"));

        let names = vec!["Sheet1".to_string(), "Sheet2".to_string()];
        assert_eq!(select_sheet(&names, "OWNERS"), Some("Sheet1"));

        assert_eq!(select_sheet(&[], "OWNERS"), None);
    }

    #[test]
    fn test_rows_from_grid_skips_blanks() {
        let grid = vec![
            vec![json!("Owner_Name"), json!(""), json!("Sec")],
            vec![json!("Acme"), json!("ignored"), json!(12.0)],
            vec![json!(""), Value::Null, json!("")],
            vec![json!("Beta")],
        ];
        let (headers, rows) = rows_from_grid(grid.into_iter());
        assert_eq!(headers, vec!["Owner_Name", "", "Sec"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Sec"), Some(&json!(12.0)));
        assert!(!rows[0].contains_key(""));
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_load_csv() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Owner_Name,County,Sec").unwrap();
        writeln!(file, "\"Acme, LLC\",Garfield,12").unwrap();
        writeln!(file, ",,").unwrap();
        writeln!(file, "Beta LP,Rio Blanco,").unwrap();

        let sheet = load_sheet(file.path(), "OWNERS").unwrap();
        assert_eq!(sheet.headers, vec!["Owner_Name", "County", "Sec"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["Owner_Name"], json!("Acme, LLC"));
        assert!(!sheet.rows[1].contains_key("Sec"));
    }

    #[test]
    fn test_load_json_workbook_object() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        let body = json!({
            "Notes": [{"a": 1}],
            "Owners": [{"Owner_Name": "Acme", "Sec": 3}, {"Owner_Name": ""}]
        });
        write!(file, "{}", body).unwrap();

        let sheet = load_sheet(file.path(), "OWNERS").unwrap();
        assert_eq!(sheet.sheet_name, "Owners");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["Sec"], json!(3));
    }

    #[test]
    fn test_load_json_rejects_non_table() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "42").unwrap();
        assert!(matches!(
            load_sheet(file.path(), "OWNERS"),
            Err(NowiError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_empty_json_object_has_no_sheet() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{}}").unwrap();
        assert!(matches!(load_sheet(file.path(), "OWNERS"), Err(NowiError::NoSheet)));
    }
}
