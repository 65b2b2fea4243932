//! Groups day records into Sunday-aligned week columns

use chrono::{Datelike, Duration, NaiveDate};

use crate::types::{DayRecord, WeekColumn};

/// The Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Sort records by date and split them into one column per calendar week.
///
/// Input order does not matter; equal dates keep their relative order. No
/// padding is added: a first column that starts mid-week is left partial.
pub fn organize(records: &[DayRecord]) -> Vec<WeekColumn> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.date);

    let mut weeks: Vec<WeekColumn> = Vec::new();
    for record in sorted {
        let start = week_start(record.date);
        match weeks.last_mut() {
            Some(week) if week.week_start == start => week.days.push(record),
            _ => weeks.push(WeekColumn {
                week_start: start,
                days: vec![record],
            }),
        }
    }

    weeks
}
