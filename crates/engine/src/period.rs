//! Licence abstraction periods.
//!
//! An abstraction period is a recurring day/month window within each year
//! during which abstraction is licensed, e.g. 1 April – 31 October. A window
//! whose end falls before its start wraps across the year end
//! (1 November – 31 March).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use api_types::metadata::NaldMetadata;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractionPeriod {
    pub period_start_day: u32,
    pub period_start_month: u32,
    pub period_end_day: u32,
    pub period_end_month: u32,
}

impl AbstractionPeriod {
    pub fn new(
        period_start_day: u32,
        period_start_month: u32,
        period_end_day: u32,
        period_end_month: u32,
    ) -> ResultEngine<Self> {
        validate_day_month(period_start_day, period_start_month, "periodStart")?;
        validate_day_month(period_end_day, period_end_month, "periodEnd")?;
        Ok(Self {
            period_start_day,
            period_start_month,
            period_end_day,
            period_end_month,
        })
    }

    /// The all-year period, 1 January – 31 December.
    pub const fn all_year() -> Self {
        Self {
            period_start_day: 1,
            period_start_month: 1,
            period_end_day: 31,
            period_end_month: 12,
        }
    }

    /// Build a period from the day/month of two calendar dates. The years are
    /// ignored.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            period_start_day: start.day(),
            period_start_month: start.month(),
            period_end_day: end.day(),
            period_end_month: end.month(),
        }
    }

    /// Returns `true` if the day/month of `date` falls within the period,
    /// both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let day = (date.month(), date.day());
        let start = (self.period_start_month, self.period_start_day);
        let end = (self.period_end_month, self.period_end_day);

        if start <= end {
            start <= day && day <= end
        } else {
            day >= start || day <= end
        }
    }

    pub fn wraps_year_end(&self) -> bool {
        (self.period_start_month, self.period_start_day)
            > (self.period_end_month, self.period_end_day)
    }
}

impl TryFrom<&NaldMetadata> for AbstractionPeriod {
    type Error = EngineError;

    fn try_from(nald: &NaldMetadata) -> Result<Self, Self::Error> {
        let field = |value: &api_types::NumericField, name: &str| {
            value.as_u32().ok_or_else(|| {
                EngineError::invalid_field(&format!("metadata.nald.{name}"), "not a number")
            })
        };

        Self::new(
            field(&nald.period_start_day, "periodStartDay")?,
            field(&nald.period_start_month, "periodStartMonth")?,
            field(&nald.period_end_day, "periodEndDay")?,
            field(&nald.period_end_month, "periodEndMonth")?,
        )
    }
}

fn validate_day_month(day: u32, month: u32, label: &str) -> ResultEngine<()> {
    // 2000 is a leap year, so 29 February is accepted.
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(EngineError::invalid_field(
            label,
            format!("invalid day/month {day}/{month}"),
        ));
    }
    Ok(())
}
