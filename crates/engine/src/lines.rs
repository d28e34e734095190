//! The lines of a return.
//!
//! [`Lines`] owns the line set of one return. The set of date ranges is fixed
//! when the collection is built from the cycle; afterwards only quantities
//! change, and every bulk update must name exactly the existing ranges.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use api_types::line::LineObject;

use crate::{
    AbstractionPeriod, CycleOptions, DateRange, EngineError, Frequency, ReadingType,
    ResultEngine,
    calculations::{distribute_single_total, get_default_quantity, get_return_total},
};

/// One reporting sub-period of a return.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` means "not applicable this period".
    pub quantity: Option<f64>,
    pub time_period: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<ReadingType>,
}

impl Line {
    pub fn new(range: DateRange, quantity: Option<f64>, time_period: Frequency) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            quantity,
            time_period,
            reading_type: None,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// A quantity submitted for the line with the same date range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineQuantity {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl LineQuantity {
    pub fn new(range: DateRange, quantity: Option<f64>) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            quantity,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl From<&Line> for LineQuantity {
    fn from(line: &Line) -> Self {
        Self::new(line.range(), line.quantity)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lines {
    lines: Vec<Line>,
}

impl Lines {
    /// Build the required line set of a cycle, carrying over the quantity and
    /// reading type of any supplied line with the same date range.
    ///
    /// Supplied lines that are not part of the required set are dropped.
    pub fn new(supplied: Vec<Line>, options: &CycleOptions) -> ResultEngine<Self> {
        let mut supplied: HashMap<DateRange, Line> = supplied
            .into_iter()
            .map(|line| (line.range(), line))
            .collect();

        let lines = options
            .required_lines()?
            .into_iter()
            .map(|range| match supplied.remove(&range) {
                Some(prior) => Line {
                    time_period: options.frequency,
                    ..prior
                },
                None => Line::new(range, None, options.frequency),
            })
            .collect();

        if !supplied.is_empty() {
            tracing::debug!(
                dropped = supplied.len(),
                "supplied lines outside the required line set"
            );
        }

        Ok(Self { lines })
    }

    /// Replace every line quantity.
    ///
    /// `input` must hold exactly one entry per existing line. A `None`
    /// quantity takes the default for the line under `period`. On mismatch
    /// nothing is changed.
    pub fn set_lines(
        &mut self,
        period: &AbstractionPeriod,
        input: &[LineQuantity],
    ) -> ResultEngine<()> {
        let mut quantities: BTreeMap<DateRange, Option<f64>> = BTreeMap::new();
        for line in input {
            if let Some(quantity) = line.quantity
                && !quantity.is_finite()
            {
                return Err(EngineError::invalid_field(
                    "lines.quantity",
                    format!("quantity for {} is not a number", line.range()),
                ));
            }
            if quantities.insert(line.range(), line.quantity).is_some() {
                return Err(EngineError::LineMismatch(format!(
                    "duplicate line {}",
                    line.range()
                )));
            }
        }

        let existing: BTreeSet<DateRange> = self.keys().collect();
        let submitted: BTreeSet<DateRange> = quantities.keys().copied().collect();
        let mismatched: Vec<String> = existing
            .symmetric_difference(&submitted)
            .map(ToString::to_string)
            .collect();
        if !mismatched.is_empty() {
            return Err(EngineError::LineMismatch(format!(
                "lines do not match the return: {}",
                mismatched.join(", ")
            )));
        }

        for line in &mut self.lines {
            let range = line.range();
            line.quantity = quantities
                .get(&range)
                .copied()
                .flatten()
                .or_else(|| get_default_quantity(&range, period));
        }

        Ok(())
    }

    /// Spread `total` over the lines within `period`.
    pub fn set_single_total(&mut self, period: &AbstractionPeriod, total: f64) -> ResultEngine<()> {
        self.lines = distribute_single_total(period, &self.lines, total)?;
        Ok(())
    }

    /// Apply `f` to every non-null quantity. The line set is untouched.
    pub(crate) fn map_quantities<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for line in &mut self.lines {
            line.quantity = line.quantity.map(&f);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = DateRange> + '_ {
        self.lines.iter().map(Line::range)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantities(&self) -> Vec<LineQuantity> {
        self.lines.iter().map(LineQuantity::from).collect()
    }

    pub fn total(&self) -> Option<f64> {
        get_return_total(&self.lines)
    }
}

impl<'a> IntoIterator for &'a Lines {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl TryFrom<(LineObject, Frequency)> for Line {
    type Error = EngineError;

    fn try_from((object, frequency): (LineObject, Frequency)) -> Result<Self, Self::Error> {
        let range = DateRange::new(object.start_date, object.end_date)?;
        Ok(Self {
            reading_type: object
                .reading_type
                .as_deref()
                .map(ReadingType::try_from)
                .transpose()?,
            ..Line::new(range, object.quantity, frequency)
        })
    }
}

impl From<&Line> for LineObject {
    fn from(line: &Line) -> Self {
        Self {
            start_date: line.start_date,
            end_date: line.end_date,
            quantity: line.quantity,
            time_period: Some(line.time_period.as_str().to_string()),
            reading_type: line.reading_type.map(|t| t.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycle() -> CycleOptions {
        CycleOptions {
            start_date: date(2019, 4, 1),
            end_date: date(2020, 3, 31),
            frequency: Frequency::Month,
            is_final: false,
        }
    }

    fn summer() -> AbstractionPeriod {
        AbstractionPeriod::new(1, 4, 31, 10).unwrap()
    }

    fn april() -> DateRange {
        DateRange::new(date(2019, 4, 1), date(2019, 4, 30)).unwrap()
    }

    fn lines() -> Lines {
        Lines::new(Vec::new(), &cycle()).unwrap()
    }

    #[test]
    fn new_generates_required_lines() {
        let lines = lines();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|line| line.quantity.is_none()));
        assert!(lines.iter().all(|line| line.time_period == Frequency::Month));
    }

    #[test]
    fn new_keeps_quantities_of_matching_lines() {
        let mut prior = Line::new(april(), Some(12.0), Frequency::Month);
        prior.reading_type = Some(ReadingType::Measured);
        let stray = Line::new(
            DateRange::new(date(2019, 4, 1), date(2019, 4, 7)).unwrap(),
            Some(99.0),
            Frequency::Week,
        );

        let lines = Lines::new(vec![stray, prior], &cycle()).unwrap();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines.as_slice()[0].quantity, Some(12.0));
        assert_eq!(lines.as_slice()[0].reading_type, Some(ReadingType::Measured));
        assert_eq!(lines.total(), Some(12.0));
    }

    #[test]
    fn set_lines_applies_quantities_and_defaults() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input[0].quantity = Some(5.0);
        input[1].quantity = Some(0.0);

        lines.set_lines(&summer(), &input).unwrap();

        let quantities: Vec<Option<f64>> = lines.iter().map(|line| line.quantity).collect();
        assert_eq!(quantities[0], Some(5.0));
        // An explicit zero is kept.
        assert_eq!(quantities[1], Some(0.0));
        // Unreported lines inside the period default to zero...
        assert_eq!(quantities[2..7], [Some(0.0); 5]);
        // ...and to "not applicable" outside it.
        assert_eq!(quantities[7..], [None; 5]);
    }

    #[test]
    fn set_lines_keeps_explicit_zero_outside_period() {
        let mut lines = lines();
        let mut input = lines.quantities();
        // January lies outside the summer period.
        input[9].quantity = Some(0.0);
        lines.set_lines(&summer(), &input).unwrap();
        assert_eq!(lines.as_slice()[9].quantity, Some(0.0));
        assert_eq!(lines.as_slice()[10].quantity, None);
    }

    #[test]
    fn set_lines_is_idempotent() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input[3].quantity = Some(7.5);
        input[9].quantity = Some(0.0);
        lines.set_lines(&summer(), &input).unwrap();

        let before = lines.clone();
        let current = lines.quantities();
        lines.set_lines(&summer(), &current).unwrap();
        assert_eq!(lines, before);
    }

    #[test]
    fn set_lines_rejects_missing_line() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input.iter_mut().for_each(|line| line.quantity = Some(1.0));
        input.pop();

        let err = lines.set_lines(&summer(), &input).unwrap_err();
        assert_eq!(
            err,
            EngineError::LineMismatch(
                "lines do not match the return: 2020-03-01_2020-03-31".to_string()
            )
        );
        // Nothing was applied.
        assert!(lines.iter().all(|line| line.quantity.is_none()));
    }

    #[test]
    fn set_lines_rejects_unknown_line() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input.push(LineQuantity::new(
            DateRange::new(date(2020, 4, 1), date(2020, 4, 30)).unwrap(),
            Some(3.0),
        ));
        assert!(matches!(
            lines.set_lines(&summer(), &input),
            Err(EngineError::LineMismatch(_))
        ));
    }

    #[test]
    fn set_lines_rejects_duplicates() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input[1] = input[0];
        assert!(matches!(
            lines.set_lines(&summer(), &input),
            Err(EngineError::LineMismatch(_))
        ));
    }

    #[test]
    fn set_lines_rejects_nan() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input[0].quantity = Some(f64::NAN);
        let err = lines.set_lines(&summer(), &input).unwrap_err();
        assert_eq!(err.field(), Some("lines.quantity"));
    }

    #[test]
    fn set_single_total_keeps_line_set() {
        let mut lines = lines();
        let keys: Vec<DateRange> = lines.keys().collect();
        lines.set_single_total(&summer(), 70.0).unwrap();
        assert_eq!(lines.keys().collect::<Vec<_>>(), keys);
        assert_eq!(lines.total(), Some(70.0));
    }

    #[test]
    fn map_quantities_skips_nulls() {
        let mut lines = lines();
        let mut input = lines.quantities();
        input[0].quantity = Some(2.0);
        lines.set_lines(&summer(), &input).unwrap();
        lines.map_quantities(|quantity| quantity * 10.0);
        assert_eq!(lines.as_slice()[0].quantity, Some(20.0));
        assert_eq!(lines.as_slice()[11].quantity, None);
    }
}
