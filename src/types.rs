use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// Uniform row-oriented table produced by the loader, whatever the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or `None` for a missing cell or column.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Raw fields of one incident, as read from the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairRecord {
    pub identifier: String,
    pub status_text: Option<String>,
    pub date_text: Option<String>,
    pub category_text: Option<String>,
}

/// Boolean facts derived from the status text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusFlags {
    pub is_reviewed: bool,
    pub is_repaired: bool,
    pub is_operational: bool,
    pub is_decommissioned: bool,
    pub is_total_loss: bool,
}

impl StatusFlags {
    /// Finished work that is not a total-loss determination.
    pub fn is_completed(&self) -> bool {
        (self.is_reviewed || self.is_repaired || self.is_operational) && !self.is_total_loss
    }
}

/// An incident with its canonical fields and derived facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub identifier: String,
    pub status_text: String,
    pub work_date: Option<NaiveDate>,
    pub category_text: Option<String>,
    pub flags: StatusFlags,
}

impl ClassifiedRow {
    pub fn is_completed(&self) -> bool {
        self.flags.is_completed()
    }

    pub fn has_work_date(&self) -> bool {
        self.work_date.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "completed_unique", rename_all = "snake_case")]
pub enum WeekMetric {
    /// No row in the base carries a work date.
    NoData,
    Completed(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct DailyPoint {
    #[serde(rename = "Dia")]
    #[tabled(rename = "Dia")]
    pub day: NaiveDate,
    #[serde(rename = "RegistrosConFecha")]
    #[tabled(rename = "RegistrosConFecha")]
    pub records_with_date: usize,
    #[serde(rename = "RegistrosFinalizados")]
    #[tabled(rename = "RegistrosFinalizados")]
    pub records_completed: usize,
    #[serde(rename = "VinReparadosUnicos")]
    #[tabled(rename = "VinReparadosUnicos")]
    pub unique_completed_units: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CategoryCount {
    #[serde(rename = "TipoDeProblema")]
    #[tabled(rename = "TipoDeProblema")]
    pub category: String,
    #[serde(rename = "Registros")]
    #[tabled(rename = "Registros")]
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub active_only: bool,
    pub reference_date: NaiveDate,
    pub iso_year: i32,
    pub iso_week: u32,
    pub total_unique: usize,
    pub completed_unique: usize,
    pub pct_completed: f64,
    pub pct_not_completed: f64,
    pub week: WeekMetric,
    pub daily: Vec<DailyPoint>,
    pub top_categories: Vec<CategoryCount>,
}
