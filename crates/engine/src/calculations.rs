//! Volume calculations shared by [`Lines`](crate::Lines) and
//! [`Meter`](crate::Meter).
//!
//! Everything here is pure: no state, no I/O.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    AbstractionPeriod, DateRange, EngineError, Line, ResultEngine,
    validators::require_non_negative,
};

/// Quantity of a line nothing was reported for.
///
/// `Some(0.0)` ("none taken") when the line ends inside the abstraction
/// period, `None` ("not applicable") otherwise.
pub fn get_default_quantity(range: &DateRange, period: &AbstractionPeriod) -> Option<f64> {
    period.contains(range.end_date).then_some(0.0)
}

/// Sum of the non-null line quantities, `None` if every line is null.
///
/// ```rust
/// use returns_engine::calculations::sum_quantities;
///
/// assert_eq!(sum_quantities([Some(5.0), None, Some(3.0)]), Some(8.0));
/// assert_eq!(sum_quantities([None]), None);
/// ```
pub fn sum_quantities<I>(quantities: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    quantities
        .into_iter()
        .flatten()
        .fold(None, |total, quantity| Some(total.unwrap_or(0.0) + quantity))
}

pub fn get_return_total(lines: &[Line]) -> Option<f64> {
    sum_quantities(lines.iter().map(|line| line.quantity))
}

/// The dial values a line's volume is measured between.
///
/// `start_reading` is the last reading reported before the line (or the
/// meter's start reading); `end_reading` is the reading reported for the
/// line, `None` if it was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSpan {
    pub start_reading: f64,
    pub end_reading: Option<f64>,
}

impl ReadingSpan {
    pub fn delta(&self) -> Option<f64> {
        self.end_reading.map(|end| end - self.start_reading)
    }
}

/// Pair each cumulative reading, in order, with the last known reading
/// before it.
///
/// A skipped (`None`) reading leaves the last known reading untouched, so the
/// next reported value is measured from the last one actually reported.
pub fn carry_readings<I>(start_reading: f64, readings: I) -> Vec<ReadingSpan>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (_, spans) = readings.into_iter().fold(
        (start_reading, Vec::new()),
        |(last_known, mut spans), reading| {
            spans.push(ReadingSpan {
                start_reading: last_known,
                end_reading: reading,
            });
            (reading.unwrap_or(last_known), spans)
        },
    );
    spans
}

/// Volume of one line derived from meter readings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quantity: Option<f64>,
    #[serde(flatten)]
    pub readings: Option<ReadingSpan>,
}

impl Volume {
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Turn cumulative readings into per-line volumes.
///
/// `readings` must be in chronological order. Each quantity is
/// `(reading - last_known) * multiplier`; skipped readings give `None`.
/// Negative deltas (the dial went backwards) are passed through.
pub fn volumes_from_readings<I>(
    start_reading: f64,
    readings: I,
    multiplier: f64,
    include_readings: bool,
) -> Vec<Volume>
where
    I: IntoIterator<Item = (DateRange, Option<f64>)>,
{
    let (ranges, values): (Vec<DateRange>, Vec<Option<f64>>) = readings.into_iter().unzip();

    ranges
        .into_iter()
        .zip(carry_readings(start_reading, values))
        .map(|(range, span)| {
            let quantity = span.delta().map(|delta| {
                if delta < 0.0 {
                    tracing::warn!(line = %range, delta, "meter reading lower than previous reading");
                }
                delta * multiplier
            });
            Volume {
                start_date: range.start_date,
                end_date: range.end_date,
                quantity,
                readings: include_readings.then_some(span),
            }
        })
        .collect()
}

/// Spread a single reported total over the lines ending inside the
/// abstraction period.
///
/// Each in-period line gets an equal share, the last one absorbing the
/// rounding remainder so the in-period quantities sum to `total`. Lines
/// outside the period get the default quantity.
pub fn distribute_single_total(
    period: &AbstractionPeriod,
    lines: &[Line],
    total: f64,
) -> ResultEngine<Vec<Line>> {
    let total = require_non_negative(total, "reading.total")?;
    let in_period = lines
        .iter()
        .filter(|line| period.contains(line.end_date))
        .count();

    if in_period == 0 && total > 0.0 {
        return Err(EngineError::invalid_field(
            "reading.total",
            "no line falls within the abstraction period",
        ));
    }

    let share = if in_period == 0 {
        0.0
    } else {
        total / in_period as f64
    };
    let mut remaining = in_period;
    let mut allocated = 0.0;

    Ok(lines
        .iter()
        .map(|line| {
            let range = line.range();
            let quantity = if period.contains(range.end_date) {
                remaining -= 1;
                let quantity = if remaining == 0 {
                    total - allocated
                } else {
                    share
                };
                allocated += quantity;
                Some(quantity)
            } else {
                get_default_quantity(&range, period)
            };
            Line {
                quantity,
                ..line.clone()
            }
        })
        .collect())
}
