//! Named reporting periods resolved to inclusive date ranges.

use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    Today,
    Yesterday,
    CurrentWeek,
    LastWeek,
    CurrentMonth,
    LastMonth,
    Last3Months,
    Last6Months,
    CurrentYear,
    LastYear,
}

impl Period {
    pub const ALL: [Period; 10] = [
        Period::Today,
        Period::Yesterday,
        Period::CurrentWeek,
        Period::LastWeek,
        Period::CurrentMonth,
        Period::LastMonth,
        Period::Last3Months,
        Period::Last6Months,
        Period::CurrentYear,
        Period::LastYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Yesterday => "yesterday",
            Period::CurrentWeek => "current_week",
            Period::LastWeek => "last_week",
            Period::CurrentMonth => "current_month",
            Period::LastMonth => "last_month",
            Period::Last3Months => "last_3_months",
            Period::Last6Months => "last_6_months",
            Period::CurrentYear => "current_year",
            Period::LastYear => "last_year",
        }
    }

    /// Inclusive `(start, end)` relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let day = Duration::days(1);
        match self {
            Period::Today => (today, today),
            Period::Yesterday => (today - day, today - day),
            Period::CurrentWeek => (week_start(today), today),
            Period::LastWeek => {
                let start = week_start(today) - Duration::days(7);
                (start, start + Duration::days(6))
            }
            Period::CurrentMonth => (month_start(today), today),
            Period::LastMonth => {
                let end = month_start(today) - day;
                (month_start(end), end)
            }
            // Calendar months are approximated as 30 days before snapping to
            // the 1st, so the window can cover one month more than its name.
            Period::Last3Months => (month_start(month_start(today) - Duration::days(90)), today),
            Period::Last6Months => (month_start(month_start(today) - Duration::days(180)), today),
            Period::CurrentYear => (year_start(today), today),
            Period::LastYear => {
                let end = year_start(today) - day;
                (year_start(end), end)
            }
        }
    }

    /// Resolve against the server's local calendar date.
    pub fn resolve_local(&self) -> (NaiveDate, NaiveDate) {
        self.resolve(Local::now().date_naive())
    }
}

impl FromStr for Period {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ServiceError::invalid(format!("Invalid period: {s}")))
    }
}

fn week_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.weekday().num_days_from_monday()))
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.day0()))
}

fn year_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.ordinal0()))
}
