//! FII CSV loader
//!
//! Reads every sector export under the configured directory and concatenates
//! them into one [`Dataset`]. Each file is one segment; the segment label is
//! the file name minus its extension.
//!
//! CSV dialect: `;` separator, `,` decimal, `.` thousands, header names
//! padded with whitespace. Files are UTF-8, with a Windows-1252 fallback for
//! spreadsheet exports.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::WINDOWS_1252;
use itertools::Itertools;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::dataset::{Column, Dataset, FundRecord};
use crate::error::{Result, ScreenerError};
use crate::parse::parse_number;

pub struct DatasetLoader {
    csv_dir: PathBuf,
    extension: String,
}

impl DatasetLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            csv_dir: config.csv_dir(),
            extension: config.file_extension.trim_start_matches('.').to_lowercase(),
        }
    }

    pub fn csv_dir(&self) -> &Path {
        &self.csv_dir
    }

    /// Recursively list matching files, sorted by path.
    ///
    /// Fails when two files share a stem, since the stem is the segment label.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        if !self.csv_dir.is_dir() {
            return Err(ScreenerError::Load {
                path: self.csv_dir.clone(),
                message: "directory not found".to_string(),
            }
            .into());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.csv_dir).follow_links(true) {
            let entry =
                entry.with_context(|| format!("Failed to list {}", self.csv_dir.display()))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        ensure_unique_segments(&files)?;
        Ok(files)
    }

    /// Sector files relative to the CSV directory, `/`-separated.
    pub fn list_sector_files(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .list_files()?
            .iter()
            .map(|p| self.relative_name(p))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Resolve a sector name to its file: a relative path as printed by
    /// [`list_sector_files`](Self::list_sector_files), or a bare file name.
    /// Stems are unique, so a bare name matches at most one file.
    pub fn resolve_sector_file(&self, name: &str) -> Result<PathBuf> {
        let wanted = name.trim().replace('\\', "/");
        self.list_files()?
            .into_iter()
            .find(|p| {
                self.relative_name(p) == wanted
                    || p.file_name().and_then(|n| n.to_str()) == Some(wanted.as_str())
            })
            .ok_or_else(|| {
                ScreenerError::Load {
                    path: self.csv_dir.join(&wanted),
                    message: "sector file not found".to_string(),
                }
                .into()
            })
    }

    fn relative_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.csv_dir)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join("/")
    }

    /// Load and concatenate every sector file.
    pub fn load(&self) -> Result<Dataset> {
        let files = self.list_files()?;
        if files.is_empty() {
            warn!(
                "No .{} files found under {}",
                self.extension,
                self.csv_dir.display()
            );
        }

        let mut records = Vec::new();
        for path in &files {
            let mut file_records = load_file(path)?;
            debug!("{} rows from {}", file_records.len(), path.display());
            records.append(&mut file_records);
        }

        info!("Loaded {} funds from {} files", records.len(), files.len());
        Ok(Dataset::new(records))
    }

    /// Unique, trimmed, uppercased tickers of one sector file, in file order.
    pub fn load_sector_tickers(&self, file_name: &str) -> Result<Vec<String>> {
        let path = self.resolve_sector_file(file_name)?;
        let content = read_decoded(&path)?;
        let mut reader = csv_reader(&content);
        let headers = trimmed_headers(&mut reader, &path)?;
        let ticker_idx = headers
            .iter()
            .position(|h| Column::from_header(h) == Some(Column::Ticker))
            .ok_or_else(|| ScreenerError::Load {
                path: path.clone(),
                message: "ticker column not found".to_string(),
            })?;

        let mut seen = HashSet::new();
        let mut tickers = Vec::new();
        for result in reader.records() {
            let record = result.with_context(|| format!("Failed to read {}", path.display()))?;
            let ticker = record.get(ticker_idx).unwrap_or("").trim().to_uppercase();
            if !ticker.is_empty() && seen.insert(ticker.clone()) {
                tickers.push(ticker);
            }
        }
        Ok(tickers)
    }
}

/// One file per segment label; stems are compared case-insensitively like
/// segment names.
fn ensure_unique_segments(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for path in files {
        let label = segment_label(path)?.to_lowercase();
        if let Some(first) = seen.insert(label, path) {
            return Err(ScreenerError::Load {
                path: path.clone(),
                message: format!("same segment name as {}", first.display()),
            }
            .into());
        }
    }
    Ok(())
}

fn read_decoded(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(e) => {
            debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    })
}

fn csv_reader(content: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn trimmed_headers(reader: &mut csv::Reader<&[u8]>, path: &Path) -> Result<Vec<String>> {
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers of {}", path.display()))?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

fn segment_label(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid file name: {}", path.display()))
}

/// Parse one sector export.
pub fn load_file(path: &Path) -> Result<Vec<FundRecord>> {
    let segment = segment_label(path)?;
    let content = read_decoded(path)?;
    let mut reader = csv_reader(&content);
    let headers = trimmed_headers(&mut reader, path)?;

    let mapping: Vec<Option<Column>> = headers.iter().map(|h| Column::from_header(h)).collect();
    debug!("Column mapping for {}: {:?}", path.display(), mapping);

    if !mapping.contains(&Some(Column::Ticker)) {
        return Err(ScreenerError::Load {
            path: path.to_path_buf(),
            message: "ticker column not found".to_string(),
        }
        .into());
    }
    for (header, column) in headers.iter().zip(&mapping) {
        if column.is_none() {
            debug!("Ignoring unknown column {:?} in {}", header, path.display());
        }
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read {}", path.display()))?;
        match parse_row(&row, &mapping, &segment) {
            Some(record) => records.push(record),
            // idx + 2: 1-based, after the header line
            None => warn!("Skipping row {} of {}: empty ticker", idx + 2, path.display()),
        }
    }
    Ok(records)
}

fn parse_row(row: &StringRecord, mapping: &[Option<Column>], segment: &str) -> Option<FundRecord> {
    let mut record = FundRecord::new(String::new(), segment);

    for (field, column) in row.iter().zip(mapping) {
        let Some(column) = *column else { continue };
        let field = field.trim();
        match column {
            Column::Ticker => record.ticker = field.to_uppercase(),
            Column::Management => {
                record.management = (!field.is_empty()).then(|| field.to_string())
            }
            // Segment always comes from the file name
            Column::Segment => {}
            numeric => record.set_number(numeric, parse_number(field).ok()),
        }
    }

    (!record.ticker.is_empty()).then_some(record)
}
