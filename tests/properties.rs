//! Property-based checks of classifier and aggregator invariants.

use bitacora_report::aggregate;
use bitacora_report::classify::classify_record;
use bitacora_report::types::{ClassifiedRow, RepairRecord, StatusFlags};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_status() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "Revisado",
            "No revisado",
            "Reparada",
            "Unidad operativa",
            "De Baja",
            "de  baja",
            "Pérdida total",
            "Revisado - perdida total",
            "En taller",
            "",
        ])
        .prop_map(String::from),
        "[a-zA-Z ]{0,20}",
    ]
}

fn arb_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0i64..120).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + chrono::Duration::days(offset)
    }))
}

fn arb_category() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::sample::select(vec!["Frenos", "Motor", "Electrico", "  ", "Suspension", "Luces"])
            .prop_map(String::from),
    )
}

fn arb_row() -> impl Strategy<Value = ClassifiedRow> {
    (
        prop::sample::select(vec!["V1", "V2", "V3", "V4", "V5", "V6"]),
        arb_status(),
        arb_date(),
        arb_category(),
    )
        .prop_map(|(id, status, date, category)| ClassifiedRow {
            identifier: id.to_string(),
            flags: StatusFlags::from_status(&status),
            status_text: status,
            work_date: date,
            category_text: category,
        })
}

fn arb_rows() -> impl Strategy<Value = Vec<ClassifiedRow>> {
    prop::collection::vec(arb_row(), 0..40)
}

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
}

proptest! {
    #[test]
    fn completed_never_total_loss(status in arb_status()) {
        let flags = StatusFlags::from_status(&status);
        prop_assert!(!(flags.is_completed() && flags.is_total_loss));
    }

    #[test]
    fn classification_is_idempotent(status in arb_status(), date in "[0-9/]{0,10}") {
        let record = RepairRecord {
            identifier: "V1".into(),
            status_text: Some(status),
            date_text: Some(date),
            category_text: None,
        };
        let once = classify_record(&record);
        let twice = once.as_ref().and_then(|r| classify_record(&RepairRecord {
            identifier: r.identifier.clone(),
            status_text: Some(r.status_text.clone()),
            date_text: record.date_text.clone(),
            category_text: r.category_text.clone(),
        }));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn percentages_sum_to_hundred(rows in arb_rows(), active_only in any::<bool>()) {
        let res = aggregate(&rows, active_only, reference(), 10);
        if res.total_unique > 0 {
            prop_assert!((res.pct_completed + res.pct_not_completed - 100.0).abs() < 1e-9);
        } else {
            prop_assert_eq!(res.pct_completed, 0.0);
            prop_assert_eq!(res.pct_not_completed, 0.0);
        }
    }

    #[test]
    fn active_filter_never_adds_units(rows in arb_rows()) {
        let active = aggregate(&rows, true, reference(), 10).total_unique;
        let all = aggregate(&rows, false, reference(), 10).total_unique;
        prop_assert!(active <= all);
        if !rows.iter().any(|r| r.flags.is_decommissioned) {
            prop_assert_eq!(active, all);
        }
    }

    #[test]
    fn daily_series_covers_every_dated_row(rows in arb_rows(), active_only in any::<bool>()) {
        let res = aggregate(&rows, active_only, reference(), 10);
        let dated = rows
            .iter()
            .filter(|r| !(active_only && r.flags.is_decommissioned))
            .filter(|r| r.has_work_date())
            .count();
        prop_assert_eq!(res.daily.iter().map(|d| d.records_with_date).sum::<usize>(), dated);
        prop_assert!(res.daily.windows(2).all(|w| w[0].day < w[1].day));
        for point in &res.daily {
            prop_assert!(point.records_completed <= point.records_with_date);
            prop_assert!(point.unique_completed_units <= point.records_completed);
        }
    }

    #[test]
    fn ranking_is_bounded_and_sorted(rows in arb_rows()) {
        let res = aggregate(&rows, false, reference(), 10);
        prop_assert!(res.top_categories.len() <= 10);
        prop_assert!(res.top_categories.windows(2).all(|w| w[0].records >= w[1].records));
        let seen: HashSet<String> = rows
            .iter()
            .map(|r| {
                r.category_text
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or("unclassified")
                    .to_string()
            })
            .collect();
        for c in &res.top_categories {
            prop_assert!(seen.contains(&c.category));
        }
    }
}
