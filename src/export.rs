use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rust_xlsxwriter::Workbook;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::app::ports::OwnerOutputPort;
use crate::constants;
use crate::error::{NowiError, Result};
use crate::types::{ContactInfo, OwnerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Workbook with a single `OWNERS` sheet
    #[default]
    Xlsx,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Format named by the file extension; anything else is an error rather than a guess
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                NowiError::UnsupportedFormat(format!(
                    "{} has no file extension (expected .xlsx, .csv, .tsv or .json)",
                    path.display()
                ))
            })?
            .parse()
    }
}

impl FromStr for ExportFormat {
    type Err = NowiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(NowiError::UnsupportedFormat(format!("Unknown export format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_contacts: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            include_contacts: true,
        }
    }
}

/// `Piceance_NOWI_Analysis_<date>.<ext>`
pub fn default_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "Piceance_NOWI_Analysis_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Header row: the fixed owner columns, then contact columns when any owner has contact data
pub fn headers(owners: &[OwnerRecord], include_contacts: bool) -> Vec<&'static str> {
    let mut headers = constants::OWNER_COLUMNS.to_vec();
    if include_contacts && owners.iter().any(|o| !o.contact.is_empty()) {
        headers.extend_from_slice(&constants::CONTACT_COLUMNS);
    }
    headers
}

/// Serialize owners to `writer` in the requested format
pub fn write_owners<W: Write>(writer: W, owners: &[OwnerRecord], options: ExportOptions) -> Result<()> {
    match options.format {
        ExportFormat::Xlsx => write_xlsx(writer, owners, options.include_contacts),
        ExportFormat::Csv => write_delimited(writer, owners, options.include_contacts, b','),
        ExportFormat::Tsv => write_delimited(writer, owners, options.include_contacts, b'\t'),
        ExportFormat::Json => write_json(writer, owners, options.include_contacts),
    }
}

fn record_cells(owner: &OwnerRecord, with_contacts: bool) -> Vec<String> {
    let mut record: Vec<String> = owner.column_values().to_vec();
    if with_contacts {
        record.extend(
            owner
                .contact
                .values()
                .iter()
                .map(|v| v.unwrap_or_default().to_string()),
        );
    }
    record
}

fn write_xlsx<W: Write>(mut writer: W, owners: &[OwnerRecord], include_contacts: bool) -> Result<()> {
    let headers = headers(owners, include_contacts);
    let with_contacts = headers.len() > constants::OWNER_COLUMNS.len();
    let sec_column = constants::OWNER_COLUMNS
        .iter()
        .position(|c| *c == constants::SEC);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(constants::OWNERS_SHEET)?;

    for (col, header) in (0u16..).zip(headers.iter()) {
        sheet.write_string(0, col, *header)?;
    }

    for (row, owner) in (1u32..).zip(owners) {
        for (i, (col, value)) in (0u16..).zip(record_cells(owner, with_contacts)).enumerate() {
            if Some(i) == sec_column {
                sheet.write_number(row, col, f64::from(owner.section))?;
            } else if !value.is_empty() {
                sheet.write_string(row, col, value.as_str())?;
            }
        }
    }

    writer.write_all(&workbook.save_to_buffer()?)?;
    Ok(())
}

fn write_delimited<W: Write>(
    writer: W,
    owners: &[OwnerRecord],
    include_contacts: bool,
    delimiter: u8,
) -> Result<()> {
    let headers = headers(owners, include_contacts);
    let with_contacts = headers.len() > constants::OWNER_COLUMNS.len();

    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    out.write_record(&headers)?;

    for owner in owners {
        out.write_record(record_cells(owner, with_contacts))?;
    }
    out.flush()?;
    Ok(())
}

fn write_json<W: Write>(writer: W, owners: &[OwnerRecord], include_contacts: bool) -> Result<()> {
    if include_contacts {
        serde_json::to_writer_pretty(writer, owners)?;
    } else {
        let stripped: Vec<OwnerRecord> = owners
            .iter()
            .cloned()
            .map(|mut o| {
                o.contact = ContactInfo::default();
                o
            })
            .collect();
        serde_json::to_writer_pretty(writer, &stripped)?;
    }
    Ok(())
}

/// Write owners to `path`, creating parent directories as needed
#[instrument(skip(owners), fields(owners = owners.len()))]
pub fn export_to_file(path: &Path, owners: &[OwnerRecord], options: ExportOptions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_owners(&mut writer, owners, options)?;
    writer.flush()?;
    debug!("Exported {} owners to {}", owners.len(), path.display());
    Ok(())
}

enum Target {
    Directory(PathBuf),
    File(PathBuf),
}

/// Output port that writes the dataset to disk
pub struct FileExporter {
    target: Target,
    options: ExportOptions,
}

impl FileExporter {
    /// Write into `dir` under the dated default file name
    pub fn into_dir(dir: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            target: Target::Directory(dir.into()),
            options,
        }
    }

    /// Exporter for `output` when given, with the format taken from its extension,
    /// else the dated default `.xlsx` under `dir`
    pub fn for_target(output: Option<PathBuf>, dir: impl Into<PathBuf>, include_contacts: bool) -> Result<Self> {
        match output {
            Some(path) => {
                let format = ExportFormat::from_path(&path)?;
                Ok(Self::to_path(
                    path,
                    ExportOptions {
                        format,
                        include_contacts,
                    },
                ))
            }
            None => Ok(Self::into_dir(
                dir,
                ExportOptions {
                    include_contacts,
                    ..Default::default()
                },
            )),
        }
    }

    pub fn to_path(path: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            target: Target::File(path.into()),
            options,
        }
    }

    pub fn resolve_path(&self) -> PathBuf {
        match &self.target {
            Target::File(path) => path.clone(),
            Target::Directory(dir) => dir.join(default_file_name(
                Local::now().date_naive(),
                self.options.format,
            )),
        }
    }
}

#[async_trait]
impl OwnerOutputPort for FileExporter {
    async fn write_owners(&self, owners: &[OwnerRecord]) -> Result<String> {
        let path = self.resolve_path();
        export_to_file(&path, owners, self.options)?;
        Ok(path.to_string_lossy().to_string())
    }
}
