//! Return cycles and their reporting lines.
//!
//! A return covers a cycle `start_date..=end_date` split into lines at a
//! [`Frequency`]. [`required_lines`] computes that split once; afterwards the
//! set of line date ranges never changes, only the quantities do.
//!
//! Splitting rules:
//!
//! - `day`: one line per calendar day.
//! - `week`: Sunday–Saturday weeks whose Saturday falls within the cycle. A
//!   final return also gets the trailing partial week up to `end_date`.
//! - `month`: calendar months, clipped to the cycle bounds.
//! - `year`: one line per 12 months from `start_date`, the last clipped to
//!   `end_date`.

use core::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EngineError, ResultEngine, validators::parse_iso_date};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Day,
    Week,
    Month,
    Year,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Day,
        Frequency::Week,
        Frequency::Month,
        Frequency::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(EngineError::invalid_field(
                "frequency",
                format!("invalid frequency: {other}"),
            )),
        }
    }
}

/// An inclusive date range; the identity ("date-key") of a line.
///
/// Ranges order chronologically by `(start_date, end_date)`. The textual key
/// is `"<start_date>_<end_date>"`, e.g. `2019-04-01_2019-04-30`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> ResultEngine<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidDate(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.start_date, self.end_date)
    }
}

impl FromStr for DateRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('_')
            .ok_or_else(|| EngineError::InvalidDate(format!("invalid line key: {s}")))?;
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Bounds and frequency of a return cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleOptions {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
    pub is_final: bool,
}

impl CycleOptions {
    pub fn required_lines(&self) -> ResultEngine<Vec<DateRange>> {
        required_lines(self.start_date, self.end_date, self.frequency, self.is_final)
    }
}

/// The ordered, gap-free, non-overlapping line ranges of a cycle.
pub fn required_lines(
    start_date: NaiveDate,
    end_date: NaiveDate,
    frequency: Frequency,
    is_final: bool,
) -> ResultEngine<Vec<DateRange>> {
    let cycle = DateRange::new(start_date, end_date)?;

    match frequency {
        Frequency::Day => Ok(cycle
            .start_date
            .iter_days()
            .take_while(|day| *day <= cycle.end_date)
            .map(|day| DateRange {
                start_date: day,
                end_date: day,
            })
            .collect()),
        Frequency::Week => weeks(cycle, is_final),
        Frequency::Month => split(cycle, last_day_of_month),
        Frequency::Year => split(cycle, |cursor| {
            cursor
                .checked_add_months(Months::new(12))
                .and_then(|next| next.pred_opt())
                .ok_or_else(|| out_of_range(cursor))
        }),
    }
}

/// Walk the cycle, cutting a line from `cursor` to `period_end(cursor)`
/// (clipped to the cycle end) until the cycle is covered.
fn split<F>(cycle: DateRange, period_end: F) -> ResultEngine<Vec<DateRange>>
where
    F: Fn(NaiveDate) -> ResultEngine<NaiveDate>,
{
    let mut lines = Vec::new();
    let mut cursor = cycle.start_date;

    loop {
        let end = period_end(cursor)?.min(cycle.end_date);
        lines.push(DateRange {
            start_date: cursor,
            end_date: end,
        });
        if end >= cycle.end_date {
            break;
        }
        cursor = end.succ_opt().ok_or_else(|| out_of_range(end))?;
    }

    Ok(lines)
}

fn weeks(cycle: DateRange, is_final: bool) -> ResultEngine<Vec<DateRange>> {
    let mut lines = Vec::new();
    let days_to_saturday = (Weekday::Sat.num_days_from_sunday()
        + 7
        - cycle.start_date.weekday().num_days_from_sunday())
        % 7;
    let mut saturday = cycle
        .start_date
        .checked_add_days(Days::new(u64::from(days_to_saturday)))
        .ok_or_else(|| out_of_range(cycle.start_date))?;

    while saturday <= cycle.end_date {
        let sunday = saturday
            .checked_sub_days(Days::new(6))
            .ok_or_else(|| out_of_range(saturday))?;
        lines.push(DateRange {
            start_date: sunday,
            end_date: saturday,
        });
        saturday = saturday
            .checked_add_days(Days::new(7))
            .ok_or_else(|| out_of_range(saturday))?;
    }

    if is_final && cycle.end_date.weekday() != Weekday::Sat {
        let sunday = cycle
            .end_date
            .checked_sub_days(Days::new(u64::from(
                cycle.end_date.weekday().num_days_from_sunday(),
            )))
            .ok_or_else(|| out_of_range(cycle.end_date))?;
        lines.push(DateRange {
            start_date: sunday,
            end_date: cycle.end_date,
        });
    }

    Ok(lines)
}

fn last_day_of_month(date: NaiveDate) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> EngineError {
    EngineError::InvalidDate(format!("date out of range near {date}"))
}
