use crate::error::Result;
use crate::types::{AggregateResult, WeekMetric};
use crate::util::{format_int, format_pct};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const KPI_FILE: &str = "kpis.json";
pub const DAILY_FILE: &str = "daily_repairs.csv";
pub const TOP_FILE: &str = "top_problems.csv";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Write the three report files into `dir`.
pub fn export(dir: &Path, result: &AggregateResult) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_json(&dir.join(KPI_FILE), result)?;
    write_csv(&dir.join(DAILY_FILE), &result.daily)?;
    write_csv(&dir.join(TOP_FILE), &result.top_categories)?;
    Ok(())
}

/// Markdown table of at most `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

/// Headline metrics in display form.
pub fn kpi_lines(result: &AggregateResult) -> Vec<(String, String)> {
    vec![
        ("Total VIN únicos".into(), format_int(result.total_unique)),
        ("VIN reparados (únicos)".into(), format_int(result.completed_unique)),
        ("% VIN reparados".into(), format_pct(result.pct_completed)),
        ("% VIN no reparados".into(), format_pct(result.pct_not_completed)),
    ]
}

pub fn week_line(result: &AggregateResult) -> String {
    match result.week {
        WeekMetric::NoData => {
            "No hay filas con Fecha reparación para calcular la semana actual.".to_string()
        }
        WeekMetric::Completed(n) => format!(
            "VIN reparados (únicos) - semana {}/{}: {}",
            result.iso_week,
            result.iso_year,
            format_int(n)
        ),
    }
}

pub fn print_report(result: &AggregateResult, max_rows: usize) {
    println!("KPIs{}", if result.active_only { " (sin 'De Baja')" } else { "" });
    for (label, value) in kpi_lines(result) {
        println!("  {:<24} {}", label, value);
    }
    println!();
    println!("Semana actual");
    println!("  {}\n", week_line(result));

    println!("Reparaciones por día");
    if result.daily.is_empty() {
        println!("No hay filas con Fecha reparación para graficar por día.\n");
    } else {
        println!("{}\n", render_table(&result.daily, max_rows));
    }

    println!("Problemas más típicos");
    println!("{}\n", render_table(&result.top_categories, max_rows));
}
