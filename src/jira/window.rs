//! Calendar window arithmetic for the gather cycle.
//!
//! Every range is a pure function of "today" so the math can be tested with
//! injected dates. Time-of-day never enters the calculation.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The five rolling aggregation periods a gather cycle can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Inclusive calendar date range, `start <= end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The literal epoch tag value: `<start ISO>-<end ISO>`.
    pub fn epoch(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl WindowKind {
    pub const ALL: [WindowKind; 5] = [
        WindowKind::Weekly,
        WindowKind::BiWeekly,
        WindowKind::Monthly,
        WindowKind::Quarterly,
        WindowKind::Yearly,
    ];

    /// Compute the reporting range for this window kind relative to `today`.
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            // Most recently completed Sunday..Saturday strictly before
            // today's week. On a Sunday that is [today-7, today-1]; every
            // later weekday pushes both boundaries one more day back.
            WindowKind::Weekly => {
                let back = today.weekday().num_days_from_sunday() as i64;
                DateRange {
                    start: today - Duration::days(back + 7),
                    end: today - Duration::days(back + 1),
                }
            }
            // Same end as Weekly, start shifted back one more full week.
            WindowKind::BiWeekly => {
                let back = today.weekday().num_days_from_sunday() as i64;
                DateRange {
                    start: today - Duration::days(back + 14),
                    end: today - Duration::days(back + 1),
                }
            }
            WindowKind::Monthly => {
                let start = ymd(today.year(), today.month(), 1);
                DateRange {
                    start,
                    end: add_months(start, 1) - Duration::days(1),
                }
            }
            WindowKind::Quarterly => {
                let quarter_month = 1 + 3 * ((today.month() - 1) / 3);
                let start = ymd(today.year(), quarter_month, 1);
                DateRange {
                    start,
                    end: add_months(start, 3) - Duration::days(1),
                }
            }
            WindowKind::Yearly => {
                let start = ymd(today.year(), 1, 1);
                DateRange {
                    start,
                    end: add_months(start, 12) - Duration::days(1),
                }
            }
        }
    }
}

// Only ever called with day 1 of a real month.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .expect("date within supported range")
}
