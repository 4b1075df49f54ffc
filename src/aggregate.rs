use crate::types::{AggregateResult, CategoryCount, ClassifiedRow, DailyPoint, WeekMetric};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

pub const UNCLASSIFIED: &str = "unclassified";

/// Compute every KPI for one report.
///
/// `reference_date` stands in for "today" when bucketing the current ISO
/// week. Empty input is not an error: counts are zero, lists are empty and
/// the weekly metric is `NoData`.
pub fn aggregate(
    rows: &[ClassifiedRow],
    active_only: bool,
    reference_date: NaiveDate,
    top_n: usize,
) -> AggregateResult {
    let base: Vec<&ClassifiedRow> = rows
        .iter()
        .filter(|r| !(active_only && r.flags.is_decommissioned))
        .collect();
    debug!(
        rows = rows.len(),
        base = base.len(),
        active_only,
        "filtered base rows"
    );

    let total_unique = distinct_ids(base.iter().copied());
    let completed_unique =
        distinct_ids(base.iter().copied().filter(|r| r.is_completed() && r.has_work_date()));
    let (pct_completed, pct_not_completed) = percentages(completed_unique, total_unique);

    let iso = reference_date.iso_week();
    AggregateResult {
        active_only,
        reference_date,
        iso_year: iso.year(),
        iso_week: iso.week(),
        total_unique,
        completed_unique,
        pct_completed,
        pct_not_completed,
        week: current_week(&base, reference_date),
        daily: daily_series(&base),
        top_categories: top_categories(&base, top_n),
    }
}

fn distinct_ids<'a>(rows: impl Iterator<Item = &'a ClassifiedRow>) -> usize {
    rows.map(|r| r.identifier.as_str()).collect::<HashSet<_>>().len()
}

/// Completed / not-completed shares; both zero when there are no units.
pub fn percentages(completed: usize, total: usize) -> (f64, f64) {
    if total == 0 {
        return (0.0, 0.0);
    }
    let pct = completed as f64 / total as f64 * 100.0;
    (pct, 100.0 - pct)
}

/// Distinct completed units whose work date falls in the ISO week of
/// `reference_date`.
pub fn current_week(base: &[&ClassifiedRow], reference_date: NaiveDate) -> WeekMetric {
    let now = reference_date.iso_week();
    let mut any_dated = false;
    let mut units: HashSet<&str> = HashSet::new();
    for r in base {
        let Some(day) = r.work_date else { continue };
        any_dated = true;
        let wk = day.iso_week();
        if (wk.year(), wk.week()) == (now.year(), now.week()) && r.is_completed() {
            units.insert(&r.identifier);
        }
    }
    if any_dated {
        WeekMetric::Completed(units.len())
    } else {
        WeekMetric::NoData
    }
}

/// Per-day counts over dated rows, ascending by day.
pub fn daily_series(base: &[&ClassifiedRow]) -> Vec<DailyPoint> {
    #[derive(Default)]
    struct Acc<'a> {
        records: usize,
        completed: usize,
        units: HashSet<&'a str>,
    }
    let mut by_day: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for r in base {
        let Some(day) = r.work_date else { continue };
        let e = by_day.entry(day).or_default();
        e.records += 1;
        if r.is_completed() {
            e.completed += 1;
            e.units.insert(&r.identifier);
        }
    }
    by_day
        .into_iter()
        .map(|(day, acc)| DailyPoint {
            day,
            records_with_date: acc.records,
            records_completed: acc.completed,
            unique_completed_units: acc.units.len(),
        })
        .collect()
}

/// Most frequent problem categories, blank ones counted as `UNCLASSIFIED`.
///
/// Ties keep the order in which categories first appear in `base`.
pub fn top_categories(base: &[&ClassifiedRow], top_n: usize) -> Vec<CategoryCount> {
    let mut order: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in base {
        let category = r
            .category_text
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCLASSIFIED);
        match index.get(category) {
            Some(&i) => order[i].records += 1,
            None => {
                index.insert(category, order.len());
                order.push(CategoryCount {
                    category: category.to_string(),
                    records: 1,
                });
            }
        }
    }
    // Stable sort preserves first-seen order among equal counts.
    order.sort_by(|a, b| b.records.cmp(&a.records));
    order.truncate(top_n);
    order
}
