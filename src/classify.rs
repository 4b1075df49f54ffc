//! Status classification.
//!
//! Each status fact is a named predicate over the normalized status text
//! (trimmed, lower-cased, accents folded). Completion is
//! `(reviewed | repaired | operational) & !total_loss`.

use crate::config::ColumnConfig;
use crate::error::{Error, Result};
use crate::types::{ClassifiedRow, RepairRecord, StatusFlags, Table};
use crate::util::{normalize_status, parse_date_dayfirst};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

// revisado / revisada
static REVIEWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\brevisad").unwrap());
// reparado / reparada
static REPAIRED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breparad").unwrap());
// operativo / operativa
static OPERATIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\boperativ").unwrap());
static DECOMMISSIONED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bde\s*baja\b").unwrap());

const TOTAL_LOSS_ROOT: &str = "perdid";

pub fn is_reviewed(status: &str) -> bool {
    REVIEWED.is_match(status)
}

pub fn is_repaired(status: &str) -> bool {
    REPAIRED.is_match(status)
}

pub fn is_operational(status: &str) -> bool {
    OPERATIONAL.is_match(status)
}

pub fn is_decommissioned(status: &str) -> bool {
    DECOMMISSIONED.is_match(status)
}

pub fn is_total_loss(status: &str) -> bool {
    status.contains(TOTAL_LOSS_ROOT)
}

impl StatusFlags {
    /// Derive every flag from raw status text.
    pub fn from_status(raw: &str) -> Self {
        let status = normalize_status(raw);
        Self {
            is_reviewed: is_reviewed(&status),
            is_repaired: is_repaired(&status),
            is_operational: is_operational(&status),
            is_decommissioned: is_decommissioned(&status),
            is_total_loss: is_total_loss(&status),
        }
    }
}

/// Classify a single record. Returns `None` when the identifier is blank.
pub fn classify_record(record: &RepairRecord) -> Option<ClassifiedRow> {
    let identifier = record.identifier.trim();
    if identifier.is_empty() {
        return None;
    }
    let status_text = record.status_text.as_deref().unwrap_or("").trim().to_string();
    let category_text = record
        .category_text
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    Some(ClassifiedRow {
        identifier: identifier.to_string(),
        flags: StatusFlags::from_status(&status_text),
        work_date: parse_date_dayfirst(record.date_text.as_deref()),
        status_text,
        category_text,
    })
}

/// Check the schema and pull the four fields out of every row.
///
/// Fails before touching any row if a required column is absent.
pub fn extract_records(table: &Table, columns: &ColumnConfig) -> Result<Vec<RepairRecord>> {
    let idx = |name: &str| table.column_index(name);
    let (Some(id_col), Some(status_col), Some(date_col)) = (
        idx(&columns.identifier),
        idx(&columns.status),
        idx(&columns.date),
    ) else {
        let missing = columns
            .required()
            .into_iter()
            .filter(|c| idx(*c).is_none())
            .map(|c| c.to_string())
            .collect();
        return Err(Error::Schema {
            missing,
            present: table.headers.clone(),
        });
    };
    let category_col = idx(&columns.category);
    if category_col.is_none() {
        debug!(column = %columns.category, "category column absent; all rows unclassified");
    }

    let owned = |row: usize, col: Option<usize>| -> Option<String> {
        col.and_then(|c| table.cell(row, c))
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    };
    Ok((0..table.rows.len())
        .map(|r| RepairRecord {
            identifier: owned(r, Some(id_col)).unwrap_or_default(),
            status_text: owned(r, Some(status_col)),
            date_text: owned(r, Some(date_col)),
            category_text: owned(r, category_col),
        })
        .collect())
}

/// Schema check, identifier filtering and per-row classification.
pub fn classify(table: &Table, columns: &ColumnConfig) -> Result<Vec<ClassifiedRow>> {
    let records = extract_records(table, columns)?;
    let total = records.len();
    let rows: Vec<ClassifiedRow> = records.iter().filter_map(classify_record).collect();
    info!(
        rows = total,
        kept = rows.len(),
        dropped_blank_id = total - rows.len(),
        undated = rows.iter().filter(|r| !r.has_work_date()).count(),
        "classified repair log"
    );
    Ok(rows)
}
