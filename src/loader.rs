use crate::config::SourcePaths;
use crate::error::{Error, Result};
use crate::types::Table;
use crate::util::decode_text;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
}

/// Pick the spreadsheet when it exists, else the delimited text file.
pub fn resolve_source(sources: &SourcePaths) -> Result<(PathBuf, SourceKind)> {
    if sources.xlsx.exists() {
        Ok((sources.xlsx.clone(), SourceKind::Spreadsheet))
    } else if sources.csv.exists() {
        Ok((sources.csv.clone(), SourceKind::Delimited))
    } else {
        Err(Error::NoSource {
            xlsx: sources.xlsx.clone(),
            csv: sources.csv.clone(),
        })
    }
}

pub fn load_table(sources: &SourcePaths) -> Result<Table> {
    let (path, kind) = resolve_source(sources)?;
    load_path(&path, kind)
}

pub fn load_path(path: &Path, kind: SourceKind) -> Result<Table> {
    let table = match kind {
        SourceKind::Spreadsheet => load_xlsx(path)?,
        SourceKind::Delimited => load_delimited(path)?,
    };
    info!(
        path = %path.display(),
        ?kind,
        rows = table.rows.len(),
        columns = table.headers.len(),
        "loaded repair log"
    );
    Ok(table)
}

/// First worksheet; the first row holds the headers.
pub fn load_xlsx(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::EmptyWorkbook {
            path: path.to_path_buf(),
        })??;
    let mut rows = range.rows().map(|r| r.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    Ok(build_table(headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// `;`-separated text with a header row, UTF-8 or Latin-1.
pub fn load_delimited(path: &Path) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_text).collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(record.iter().map(decode_text).collect());
    }
    Ok(build_table(headers, rows))
}

/// Trim headers, drop blank / `Unnamed` columns and pad short rows.
fn build_table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Table {
    let keep: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let h = h.trim();
            !h.is_empty() && !h.starts_with("Unnamed")
        })
        .map(|(i, _)| i)
        .collect();
    if keep.len() < headers.len() {
        debug!(dropped = headers.len() - keep.len(), "dropped unnamed columns");
    }
    let headers = keep.iter().map(|&i| headers[i].trim().to_string()).collect();
    let rows = rows
        .into_iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .map(|r| {
            keep.iter()
                .map(|&i| r.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Table { headers, rows }
}

struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    table: Table,
}

/// Re-reads the source only when the resolved file or its modification
/// time changes, or after `invalidate`.
pub struct CachedLoader {
    sources: SourcePaths,
    cached: Option<CacheEntry>,
}

impl CachedLoader {
    pub fn new(sources: SourcePaths) -> Self {
        Self {
            sources,
            cached: None,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn load(&mut self) -> Result<&Table> {
        let (path, kind) = resolve_source(&self.sources)?;
        let modified = std::fs::metadata(&path)?.modified()?;
        let entry = match self.cached.take() {
            Some(e) if e.path == path && e.modified == modified => {
                debug!(path = %path.display(), "repair log cache hit");
                e
            }
            _ => CacheEntry {
                table: load_path(&path, kind)?,
                path,
                modified,
            },
        };
        Ok(&self.cached.insert(entry).table)
    }
}
