// Column names and source locations.
//
// Defaults match the repair-log spreadsheet as it is published; every
// value can be overridden from the command line or the environment.
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ID_COLUMN: &str = "VIN CON PROBLEMAS";
pub const DEFAULT_DATE_COLUMN: &str = "Fecha reparación";
pub const DEFAULT_STATUS_COLUMN: &str = "Unidad revisada/Operativa";
pub const DEFAULT_CATEGORY_COLUMN: &str = "Tipo de problema";
pub const DEFAULT_TOP_N: usize = 10;

/// Header names of the four columns the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    pub identifier: String,
    pub status: String,
    pub date: String,
    pub category: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_ID_COLUMN.to_string(),
            status: DEFAULT_STATUS_COLUMN.to_string(),
            date: DEFAULT_DATE_COLUMN.to_string(),
            category: DEFAULT_CATEGORY_COLUMN.to_string(),
        }
    }
}

impl ColumnConfig {
    /// Columns that must be present before any row is processed.
    pub fn required(&self) -> [&str; 3] {
        [&self.identifier, &self.status, &self.date]
    }
}

/// The two interchangeable inputs. The spreadsheet wins when it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub xlsx: PathBuf,
    pub csv: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            xlsx: PathBuf::from("data/bitacora.xlsx"),
            csv: PathBuf::from("data/bitacora.csv"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bitacora", about = "Repair-log KPI report", version)]
pub struct Cli {
    /// Spreadsheet source (preferred when present).
    #[arg(long, env = "BITACORA_XLSX", default_value = "data/bitacora.xlsx")]
    pub xlsx: PathBuf,

    /// Semicolon-delimited fallback source.
    #[arg(long, env = "BITACORA_CSV", default_value = "data/bitacora.csv")]
    pub csv: PathBuf,

    /// Directory the CSV/JSON exports are written to.
    #[arg(long, env = "BITACORA_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, env = "BITACORA_ID_COLUMN", default_value = DEFAULT_ID_COLUMN)]
    pub id_column: String,

    #[arg(long, env = "BITACORA_STATUS_COLUMN", default_value = DEFAULT_STATUS_COLUMN)]
    pub status_column: String,

    #[arg(long, env = "BITACORA_DATE_COLUMN", default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    #[arg(long, env = "BITACORA_CATEGORY_COLUMN", default_value = DEFAULT_CATEGORY_COLUMN)]
    pub category_column: String,

    /// Day used for the "current week" metric, `YYYY-MM-DD`. Defaults to today.
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Keep decommissioned units in the KPIs.
    #[arg(long)]
    pub include_decommissioned: bool,

    /// Number of problem categories in the ranking.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Load, report and exit without the interactive menu.
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn columns(&self) -> ColumnConfig {
        ColumnConfig {
            identifier: self.id_column.clone(),
            status: self.status_column.clone(),
            date: self.date_column.clone(),
            category: self.category_column.clone(),
        }
    }

    pub fn sources(&self) -> SourcePaths {
        SourcePaths {
            xlsx: self.xlsx.clone(),
            csv: self.csv.clone(),
        }
    }
}
