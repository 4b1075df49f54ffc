//! Spreadsheet source: first worksheet, typed cells rendered to text.

use bitacora_report::config::{ColumnConfig, SourcePaths};
use bitacora_report::loader::{load_table, load_xlsx, resolve_source, SourceKind};
use bitacora_report::classify;
use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs;
use std::path::Path;

fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let repaired = ExcelDateTime::from_ymd(2024, 6, 3).unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Bitacora").unwrap();
    for (col, header) in [
        "VIN CON PROBLEMAS",
        "Fecha reparación",
        "Unidad revisada/Operativa",
        "Tipo de problema",
        "Unnamed: 4",
    ]
    .into_iter()
    .enumerate()
    {
        sheet.write_string(0, col as u16, header).unwrap();
    }
    sheet.write_number(1, 0, 12345).unwrap();
    sheet.write_datetime_with_format(1, 1, &repaired, &date_format).unwrap();
    sheet.write_string(1, 2, "Reparado").unwrap();
    sheet.write_string(1, 3, "Motor").unwrap();
    sheet.write_string(1, 4, "x").unwrap();
    sheet.write_string(2, 0, "V2").unwrap();
    sheet.write_string(2, 1, "10/06/2024").unwrap();
    sheet.write_string(2, 2, "De baja").unwrap();

    let other = workbook.add_worksheet();
    other.set_name("Otra").unwrap();
    other.write_string(0, 0, "Otra columna").unwrap();
    other.write_string(1, 0, "ignorada").unwrap();

    workbook.save(path).unwrap();
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn first_sheet_supplies_headers_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bitacora.xlsx");
    write_workbook(&path);

    let table = load_xlsx(&path).unwrap();
    assert_eq!(
        table.headers,
        vec!["VIN CON PROBLEMAS", "Fecha reparación", "Unidad revisada/Operativa", "Tipo de problema"]
    );
    assert_eq!(
        table.rows,
        vec![
            vec!["12345".to_string(), "03/06/2024".into(), "Reparado".into(), "Motor".into()],
            vec!["V2".to_string(), "10/06/2024".into(), "De baja".into(), String::new()],
        ]
    );
}

#[test]
fn spreadsheet_dates_reach_the_classifier() {
    let dir = tempfile::tempdir().unwrap();
    let sources = SourcePaths {
        xlsx: dir.path().join("bitacora.xlsx"),
        csv: dir.path().join("bitacora.csv"),
    };
    write_workbook(&sources.xlsx);
    fs::write(&sources.csv, "VIN CON PROBLEMAS\nsolo-en-csv\n").unwrap();

    assert_eq!(resolve_source(&sources).unwrap().1, SourceKind::Spreadsheet);
    let rows = classify(&load_table(&sources).unwrap(), &ColumnConfig::default()).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].identifier, "12345");
    assert_eq!(rows[0].work_date, day(2024, 6, 3));
    assert!(rows[0].is_completed());
    assert_eq!(rows[0].category_text.as_deref(), Some("Motor"));

    assert_eq!(rows[1].identifier, "V2");
    assert_eq!(rows[1].work_date, day(2024, 6, 10));
    assert!(rows[1].flags.is_decommissioned);
    assert_eq!(rows[1].category_text, None);
}
