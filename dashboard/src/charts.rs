pub mod svg;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A (year, month) pair; `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn of(date: NaiveDate) -> Self {
        CalendarMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self) -> &'static str {
        MONTH_LABELS[(self.month as usize + 11) % 12]
    }

    pub fn months_before(self, n: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        CalendarMonth {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

/// The `count` calendar months ending with `today`'s month, oldest first.
pub fn month_window(today: NaiveDate, count: usize) -> Vec<CalendarMonth> {
    let current = CalendarMonth::of(today);
    (0..count as u32)
        .rev()
        .map(|back| current.months_before(back))
        .collect()
}

pub fn bucket_by_month<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    window: &[CalendarMonth],
    date_of: impl Fn(&T) -> NaiveDate,
) -> Vec<(CalendarMonth, Vec<&'a T>)>
where
    T: 'a,
{
    let mut buckets: Vec<(CalendarMonth, Vec<&T>)> =
        window.iter().map(|m| (*m, Vec::new())).collect();

    for item in items {
        let month = CalendarMonth::of(date_of(item));
        if let Some(bucket) = buckets.iter_mut().find(|(m, _)| *m == month) {
            bucket.1.push(item);
        }
    }

    buckets
}

pub fn aggregate_sum<T>(
    buckets: &[(CalendarMonth, Vec<&T>)],
    value_of: impl Fn(&T) -> f64,
) -> Vec<(CalendarMonth, f64)> {
    buckets
        .iter()
        .map(|(month, items)| (*month, items.iter().map(|i| value_of(i)).sum()))
        .collect()
}

/// Per-bucket `(month, mean, sample_count)`; the mean of an empty bucket is `0`.
pub fn aggregate_average<T>(
    buckets: &[(CalendarMonth, Vec<&T>)],
    value_of: impl Fn(&T) -> f64,
) -> Vec<(CalendarMonth, f64, usize)> {
    buckets
        .iter()
        .map(|(month, items)| {
            let avg = if items.is_empty() {
                0.0
            } else {
                items.iter().map(|i| value_of(i)).sum::<f64>() / items.len() as f64
            };
            (*month, avg, items.len())
        })
        .collect()
}
