//! The `WaterReturn` aggregate.
//!
//! A `WaterReturn` is built from a raw [`ReturnObject`], mutated through its
//! setters while the user moves through the submission steps, and turned
//! back into a raw object with [`WaterReturn::to_object`]. Every setter
//! validates its input first: a failed call leaves the return unchanged.

use chrono::NaiveDate;
use serde::Serialize;

use api_types::{
    ReturnObject,
    line::LineObject,
    metadata::ReturnMetadata,
    meter::MeterObject,
    reading::ReadingObject,
    user::UserObject,
};

use crate::{
    AbstractionPeriod, CycleOptions, DateRange, EngineError, Frequency, Line, LineQuantity, Lines,
    Meter, MeterDetails, MeterReading, Reading, ReadingMethod, ReadingType, ResultEngine,
    ReturnStatus, Units, User,
    calculations::{ReadingSpan, carry_readings, volumes_from_readings},
};

/// A line annotated with the dial readings it was measured between.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineWithReadings {
    #[serde(flatten)]
    pub line: Line,
    #[serde(flatten)]
    pub readings: Option<ReadingSpan>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaterReturn {
    return_id: String,
    licence_number: String,
    received_date: Option<NaiveDate>,
    version_number: u32,
    is_current: bool,
    status: ReturnStatus,
    is_nil: bool,
    reading: Reading,
    meters: Vec<Meter>,
    lines: Lines,
    metadata: ReturnMetadata,
    licence_period: AbstractionPeriod,
    cycle: CycleOptions,
    user: Option<User>,
}

impl WaterReturn {
    pub fn from_json(json: &str) -> ResultEngine<Self> {
        let object: ReturnObject = serde_json::from_str(json)?;
        Self::try_from(object)
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        Ok(serde_json::to_string(&self.to_object())?)
    }

    pub fn to_json_pretty(&self) -> ResultEngine<String> {
        Ok(serde_json::to_string_pretty(&self.to_object())?)
    }

    /// Serialize to the raw object.
    ///
    /// Nil returns carry no lines, meters or reading. Volumetric returns
    /// carry no meter readings.
    pub fn to_object(&self) -> ReturnObject {
        let (meters, reading, lines) = if self.is_nil {
            (None, None, None)
        } else {
            let meters = self
                .meters
                .iter()
                .map(|meter| {
                    if self.is_volumes() {
                        let mut meter = meter.clone();
                        meter.strip_readings();
                        MeterObject::from(&meter)
                    } else {
                        MeterObject::from(meter)
                    }
                })
                .collect();
            let lines = self.lines.iter().map(LineObject::from).collect();
            (
                Some(meters),
                Some(ReadingObject::from(&self.reading)),
                Some(lines),
            )
        };

        ReturnObject {
            return_id: self.return_id.clone(),
            licence_number: self.licence_number.clone(),
            received_date: self.received_date,
            version_number: self.version_number,
            is_current: self.is_current,
            status: self.status.as_str().to_string(),
            is_nil: self.is_nil,
            meters,
            reading,
            lines,
            metadata: self.metadata.clone(),
            start_date: self.cycle.start_date,
            end_date: self.cycle.end_date,
            frequency: self.cycle.frequency.as_str().to_string(),
            user: self.user.as_ref().map(UserObject::from),
        }
    }

    pub fn set_nil_return(&mut self, is_nil: bool) {
        tracing::debug!(return_id = %self.return_id, is_nil, "set nil return");
        self.is_nil = is_nil;
    }

    /// Set the reading type. Resets the single-total flag; an estimated
    /// return has no meters.
    pub fn set_reading_type(&mut self, reading_type: ReadingType) {
        tracing::debug!(
            return_id = %self.return_id,
            reading_type = reading_type.as_str(),
            "set reading type"
        );
        self.reading.reading_type = Some(reading_type);
        self.reading.total_flag = false;
        if reading_type == ReadingType::Estimated {
            self.meters.clear();
        }
    }

    /// Set the reading method.
    ///
    /// A one-meter return is measured. Switching to volumes drops the
    /// meter readings but keeps the meter identity.
    pub fn set_method(&mut self, method: ReadingMethod) {
        tracing::debug!(return_id = %self.return_id, method = method.as_str(), "set method");
        self.reading.method = Some(method);
        match method {
            ReadingMethod::OneMeter => self.set_reading_type(ReadingType::Measured),
            ReadingMethod::Volumes => self.meters.iter_mut().for_each(Meter::strip_readings),
        }
    }

    pub fn set_units(&mut self, units: Units) {
        tracing::debug!(return_id = %self.return_id, %units, "set units");
        self.reading.units = Some(units);
        for meter in &mut self.meters {
            meter.units = Some(units);
        }
    }

    /// Replace the quantity of every line. `lines` must name exactly the
    /// return's line set; quantities must be `>= 0` or `None`.
    pub fn set_lines(&mut self, lines: &[LineQuantity]) -> ResultEngine<()> {
        if let Some(line) = lines
            .iter()
            .find(|line| line.quantity.is_some_and(|quantity| quantity < 0.0))
        {
            return Err(EngineError::invalid_field(
                "lines.quantity",
                format!("quantity for {} must be a number >= 0", line.range()),
            ));
        }
        let period = self.get_abstraction_period();
        self.lines.set_lines(&period, lines)?;
        tracing::debug!(return_id = %self.return_id, lines = lines.len(), "set lines");
        Ok(())
    }

    /// Store the readings of the first meter and derive the line quantities
    /// from them.
    ///
    /// Quantities are left unmultiplied until
    /// [`apply_meter_multiplication`](Self::apply_meter_multiplication).
    pub fn set_meter_readings(
        &mut self,
        start_reading: f64,
        readings: &[MeterReading],
    ) -> ResultEngine<()> {
        let mut meter = self.meters.first().cloned().unwrap_or_default();
        meter.set_meter_readings(start_reading, readings)?;

        let ordered = meter
            .readings
            .iter()
            .flatten()
            .map(|(range, reading)| (*range, *reading));
        let quantities: Vec<LineQuantity> = volumes_from_readings(start_reading, ordered, 1.0, false)
            .into_iter()
            .map(|volume| LineQuantity::new(volume.range(), volume.quantity))
            .collect();

        let period = self.get_abstraction_period();
        self.lines.set_lines(&period, &quantities)?;
        self.store_meter(meter);
        tracing::debug!(
            return_id = %self.return_id,
            start_reading,
            readings = readings.len(),
            "set meter readings"
        );
        Ok(())
    }

    pub fn set_meter_details(&mut self, details: &MeterDetails) -> ResultEngine<()> {
        let mut meter = self.meters.first().cloned().unwrap_or_default();
        meter.set_meter_details(details)?;
        self.store_meter(meter);
        tracing::debug!(return_id = %self.return_id, "set meter details");
        Ok(())
    }

    fn store_meter(&mut self, meter: Meter) {
        match self.meters.first_mut() {
            Some(first) => *first = meter,
            None => self.meters.push(meter),
        }
    }

    pub fn set_user(&mut self, email: &str, external_id: &str, is_internal: bool) -> ResultEngine<()> {
        let user = User::new(email, external_id, is_internal)?;
        tracing::debug!(
            return_id = %self.return_id,
            user_type = user.user_type.as_str(),
            "set user"
        );
        self.user = Some(user);
        Ok(())
    }

    /// Move the return to `status`.
    ///
    /// `received_date` is recorded only if no received date is set yet. A
    /// backward transition is ignored.
    pub fn set_status(&mut self, status: ReturnStatus, received_date: Option<NaiveDate>) {
        if self.received_date.is_none() {
            self.received_date = received_date;
        }

        if !self.status.can_transition_to(status) {
            tracing::warn!(
                return_id = %self.return_id,
                from = %self.status,
                to = %status,
                "refused backward status transition"
            );
            return;
        }

        tracing::debug!(return_id = %self.return_id, %status, "set status");
        self.status = status;
    }

    /// Scale every line quantity by the meter multiplier. Only one-meter
    /// returns are affected; call once, when the return is finalized.
    pub fn apply_meter_multiplication(&mut self) {
        if self.is_nil || !self.is_one_meter() {
            return;
        }
        let Some(multiplier) = self.meters.first().map(|meter| meter.multiplier) else {
            return;
        };
        tracing::debug!(return_id = %self.return_id, multiplier, "apply meter multiplication");
        self.lines.map_quantities(|quantity| quantity * multiplier);
    }

    pub fn increment_version_number(&mut self) {
        self.version_number = self.version_number.saturating_add(1);
        self.is_current = true;
        tracing::debug!(
            return_id = %self.return_id,
            version_number = self.version_number,
            "incremented version number"
        );
    }

    /// Report a single total for the whole cycle, or clear it.
    ///
    /// A flagged total is spread over the lines within the abstraction
    /// period.
    pub fn set_single_total(&mut self, is_single_total: bool, total: Option<f64>) -> ResultEngine<()> {
        if is_single_total {
            let total = total.ok_or_else(|| {
                EngineError::invalid_field("reading.total", "a single total is required")
            })?;
            let period = self.get_abstraction_period();
            self.lines.set_single_total(&period, total)?;
            self.reading.total = Some(total);
        } else {
            self.reading.total = None;
        }
        self.reading.total_flag = is_single_total;
        tracing::debug!(return_id = %self.return_id, is_single_total, "set single total");
        Ok(())
    }

    /// Use custom start/end dates instead of the licence abstraction period,
    /// or go back to the licence period with `None`.
    pub fn set_custom_abstraction_period(
        &mut self,
        custom: Option<(NaiveDate, NaiveDate)>,
    ) -> ResultEngine<()> {
        let range = custom
            .map(|(start, end)| DateRange::new(start, end))
            .transpose()?;

        self.reading.total_custom_dates = range.is_some();
        self.reading.total_custom_date_start = range.map(|r| r.start_date);
        self.reading.total_custom_date_end = range.map(|r| r.end_date);
        tracing::debug!(
            return_id = %self.return_id,
            custom = range.is_some(),
            "set custom abstraction period"
        );
        Ok(())
    }

    /// The lines of a one-meter return annotated with the dial readings
    /// each was measured between.
    ///
    /// `None` for nil returns. Volumetric returns, or a meter without a start
    /// reading, give the lines without readings.
    pub fn get_lines_with_readings(&self) -> Option<Vec<LineWithReadings>> {
        if self.is_nil {
            return None;
        }

        let meter = self
            .meters
            .first()
            .filter(|_| self.is_one_meter())
            .and_then(|meter| Some((meter, meter.start_reading?)));

        let lines = match meter {
            Some((meter, start_reading)) => {
                let readings = meter
                    .ordered_readings(&self.lines)
                    .into_iter()
                    .map(|(_, reading)| reading);
                self.lines
                    .iter()
                    .zip(carry_readings(start_reading, readings))
                    .map(|(line, span)| LineWithReadings {
                        line: line.clone(),
                        readings: Some(span),
                    })
                    .collect()
            }
            None => self
                .lines
                .iter()
                .map(|line| LineWithReadings {
                    line: line.clone(),
                    readings: None,
                })
                .collect(),
        };

        Some(lines)
    }

    /// The period used for default quantities and single totals.
    ///
    /// The licence period, unless custom dates are set on the reading.
    pub fn get_abstraction_period(&self) -> AbstractionPeriod {
        match (
            self.reading.total_custom_dates,
            self.reading.total_custom_date_start,
            self.reading.total_custom_date_end,
        ) {
            (true, Some(start), Some(end)) => AbstractionPeriod::from_dates(start, end),
            _ => self.licence_period,
        }
    }

    pub fn get_return_total(&self) -> Option<f64> {
        self.lines.total()
    }

    pub fn is_volumes(&self) -> bool {
        self.reading.method == Some(ReadingMethod::Volumes)
    }

    pub fn is_one_meter(&self) -> bool {
        self.reading.method == Some(ReadingMethod::OneMeter)
    }

    pub fn is_nil_return(&self) -> bool {
        self.is_nil
    }

    pub fn is_single_total(&self) -> bool {
        self.reading.total_flag
    }

    pub fn is_measured(&self) -> bool {
        self.reading.reading_type == Some(ReadingType::Measured)
    }

    pub fn is_meter_details_provided(&self) -> bool {
        self.meters
            .first()
            .is_some_and(|meter| meter.meter_details_provided)
    }

    pub fn return_id(&self) -> &str {
        &self.return_id
    }

    pub fn licence_number(&self) -> &str {
        &self.licence_number
    }

    pub fn received_date(&self) -> Option<NaiveDate> {
        self.received_date
    }

    pub fn version_number(&self) -> u32 {
        self.version_number
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn status(&self) -> ReturnStatus {
        self.status
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn meters(&self) -> &[Meter] {
        &self.meters
    }

    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    pub fn metadata(&self) -> &ReturnMetadata {
        &self.metadata
    }

    pub fn cycle(&self) -> &CycleOptions {
        &self.cycle
    }

    pub fn frequency(&self) -> Frequency {
        self.cycle.frequency
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl TryFrom<ReturnObject> for WaterReturn {
    type Error = EngineError;

    fn try_from(object: ReturnObject) -> Result<Self, Self::Error> {
        let frequency = Frequency::try_from(object.frequency.as_str())?;
        let range = DateRange::new(object.start_date, object.end_date)?;
        let cycle = CycleOptions {
            start_date: range.start_date,
            end_date: range.end_date,
            frequency,
            is_final: object.metadata.is_final,
        };

        let supplied = object
            .lines
            .unwrap_or_default()
            .into_iter()
            .map(|line| Line::try_from((line, frequency)))
            .collect::<ResultEngine<Vec<_>>>()?;
        let lines = Lines::new(supplied, &cycle)?;

        let mut meters = object
            .meters
            .unwrap_or_default()
            .into_iter()
            .map(Meter::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        for meter in &mut meters {
            let dropped = meter.retain_line_readings(&lines);
            if dropped > 0 {
                tracing::debug!(
                    return_id = %object.return_id,
                    dropped,
                    "meter readings outside the required line set"
                );
            }
        }

        let licence_period = object
            .metadata
            .nald
            .as_ref()
            .map(AbstractionPeriod::try_from)
            .transpose()?
            .unwrap_or_else(AbstractionPeriod::all_year);

        Ok(Self {
            return_id: object.return_id,
            licence_number: object.licence_number,
            received_date: object.received_date,
            version_number: object.version_number,
            is_current: object.is_current,
            status: ReturnStatus::try_from(object.status.as_str())?,
            is_nil: object.is_nil,
            reading: object
                .reading
                .map(Reading::try_from)
                .transpose()?
                .unwrap_or_default(),
            meters,
            lines,
            metadata: object.metadata,
            licence_period,
            cycle,
            user: object.user.map(User::try_from).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const EXTERNAL_ID: &str = "f5e5c6a8-9c2b-4b0d-8d5e-0f3c3f1b2a11";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn water_return() -> WaterReturn {
        let raw = json!({
            "returnId": "v1:1:01/123:1234:2019-04-01:2020-03-31",
            "licenceNumber": "01/123",
            "receivedDate": null,
            "versionNumber": 0,
            "isCurrent": false,
            "status": "due",
            "isNil": false,
            "metadata": {
                "nald": {
                    "periodStartDay": "1",
                    "periodStartMonth": "4",
                    "periodEndDay": "31",
                    "periodEndMonth": "10"
                },
                "isFinal": false
            },
            "startDate": "2019-04-01",
            "endDate": "2020-03-31",
            "frequency": "month",
            "user": null
        });
        WaterReturn::from_json(&raw.to_string()).unwrap()
    }

    fn one_meter_return() -> WaterReturn {
        let mut ret = water_return();
        ret.set_method(ReadingMethod::OneMeter);
        ret.set_meter_details(&MeterDetails::new("Pontos", "ABC-123").multiplier(10.0))
            .unwrap();
        let readings: Vec<MeterReading> = ret
            .lines()
            .keys()
            .enumerate()
            .map(|(i, range)| MeterReading::new(range, Some(100.0 + 10.0 * (i as f64 + 1.0))))
            .collect();
        ret.set_meter_readings(100.0, &readings).unwrap();
        ret
    }

    #[test]
    fn builds_required_lines_from_cycle() {
        let ret = water_return();
        assert_eq!(ret.lines().len(), 12);
        assert_eq!(ret.status(), ReturnStatus::Due);
        assert_eq!(
            ret.get_abstraction_period(),
            AbstractionPeriod::new(1, 4, 31, 10).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_status() {
        let mut object = water_return().to_object();
        object.status = "lost".to_string();
        let err = WaterReturn::try_from(object).unwrap_err();
        assert_eq!(err.field(), Some("status"));
    }

    #[test]
    fn status_never_moves_backward() {
        let mut ret = water_return();
        ret.set_status(ReturnStatus::Completed, Some(date(2020, 4, 10)));
        ret.set_status(ReturnStatus::Due, None);
        assert_eq!(ret.status(), ReturnStatus::Completed);

        let mut ret = water_return();
        ret.set_status(ReturnStatus::Received, None);
        ret.set_status(ReturnStatus::Due, None);
        assert_eq!(ret.status(), ReturnStatus::Received);
    }

    #[test]
    fn received_date_is_write_once() {
        let mut ret = water_return();
        ret.set_status(ReturnStatus::Received, Some(date(2020, 4, 10)));
        ret.set_status(ReturnStatus::Completed, Some(date(2020, 5, 1)));
        assert_eq!(ret.received_date(), Some(date(2020, 4, 10)));
        assert_eq!(ret.status(), ReturnStatus::Completed);
    }

    #[test]
    fn increment_version_number() {
        let mut ret = water_return();
        ret.increment_version_number();
        ret.increment_version_number();
        assert_eq!(ret.version_number(), 2);
        assert!(ret.is_current());
    }

    #[test]
    fn version_number_saturates() {
        let mut object = water_return().to_object();
        object.version_number = u32::MAX;
        let mut ret = WaterReturn::try_from(object).unwrap();
        ret.increment_version_number();
        assert_eq!(ret.version_number(), u32::MAX);
        assert!(ret.is_current());
    }

    #[test]
    fn set_lines_rejects_negative_quantities() {
        let mut ret = water_return();
        let before = ret.clone();
        let mut input = ret.lines().quantities();
        input[2].quantity = Some(-5.0);
        let err = ret.set_lines(&input).unwrap_err();
        assert_eq!(err.field(), Some("lines.quantity"));
        assert_eq!(ret, before);
    }

    #[test]
    fn meter_readings_keep_negative_deltas() {
        let mut ret = water_return();
        ret.set_method(ReadingMethod::OneMeter);
        let readings: Vec<MeterReading> = ret
            .lines()
            .keys()
            .enumerate()
            .map(|(i, range)| MeterReading::new(range, Some(if i == 1 { 90.0 } else { 120.0 })))
            .collect();
        ret.set_meter_readings(100.0, &readings).unwrap();
        assert_eq!(ret.lines().as_slice()[1].quantity, Some(-30.0));
    }

    #[test]
    fn projections_default_to_false() {
        let ret = water_return();
        assert!(!ret.is_volumes());
        assert!(!ret.is_one_meter());
        assert!(!ret.is_nil_return());
        assert!(!ret.is_single_total());
        assert!(!ret.is_measured());
        assert!(!ret.is_meter_details_provided());
    }

    #[test]
    fn one_meter_method_is_measured() {
        let mut ret = water_return();
        ret.set_reading_type(ReadingType::Estimated);
        ret.set_method(ReadingMethod::OneMeter);
        assert!(ret.is_one_meter());
        assert!(ret.is_measured());
    }

    #[test]
    fn estimated_reading_type_clears_meters() {
        let mut ret = one_meter_return();
        ret.set_single_total(true, Some(70.0)).unwrap();
        ret.set_reading_type(ReadingType::Estimated);
        assert!(ret.meters().is_empty());
        assert!(!ret.is_single_total());
    }

    #[test]
    fn volumes_method_strips_meter_readings() {
        let mut ret = one_meter_return();
        ret.set_method(ReadingMethod::Volumes);

        let meter = &ret.meters()[0];
        assert_eq!(meter.manufacturer.as_deref(), Some("Pontos"));
        assert_eq!(meter.serial_number.as_deref(), Some("ABC-123"));
        assert_eq!(meter.start_reading, None);
        assert_eq!(meter.readings, None);
    }

    #[test]
    fn volumetric_object_has_no_meter_readings() {
        let mut ret = one_meter_return();
        ret.set_units(Units::Megalitres);
        ret.reading.method = Some(ReadingMethod::Volumes);

        let object = ret.to_object();
        let meter = &object.meters.unwrap()[0];
        assert_eq!(meter.manufacturer.as_deref(), Some("Pontos"));
        assert_eq!(meter.start_reading, None);
        assert_eq!(meter.readings, None);
        assert_eq!(meter.units, None);
        assert!(ret.meters()[0].readings.is_some());
    }

    #[test]
    fn units_propagate_to_meters() {
        let mut ret = one_meter_return();
        ret.set_units(Units::Gallons);
        assert_eq!(ret.reading().units, Some(Units::Gallons));
        assert_eq!(ret.meters()[0].units, Some(Units::Gallons));
    }

    #[test]
    fn meter_readings_derive_unmultiplied_quantities() {
        let ret = one_meter_return();
        assert!(ret.lines().iter().all(|line| line.quantity == Some(10.0)));
        assert_eq!(ret.get_return_total(), Some(120.0));
        assert_eq!(ret.meters()[0].get_end_reading(), Some(220.0));
    }

    #[test]
    fn meter_multiplication_scales_lines() {
        let mut ret = one_meter_return();
        ret.apply_meter_multiplication();
        assert!(ret.lines().iter().all(|line| line.quantity == Some(100.0)));
    }

    #[test]
    fn meter_multiplication_skips_volumetric_returns() {
        let mut ret = one_meter_return();
        ret.set_method(ReadingMethod::Volumes);
        ret.apply_meter_multiplication();
        assert!(ret.lines().iter().all(|line| line.quantity == Some(10.0)));
    }

    #[test]
    fn meter_details_validation_keeps_meter() {
        let mut ret = one_meter_return();
        let err = ret
            .set_meter_details(&MeterDetails::new("Pontos", "ABC-123").multiplier(-1.0))
            .unwrap_err();
        assert_eq!(err.field(), Some("multiplier"));
        assert_eq!(ret.meters()[0].multiplier, 10.0);
        assert!(ret.is_meter_details_provided());
    }

    #[test]
    fn failed_meter_readings_leave_return_unchanged() {
        let mut ret = one_meter_return();
        let before = ret.clone();
        let partial: Vec<MeterReading> = ret
            .lines()
            .keys()
            .take(3)
            .map(|range| MeterReading::new(range, Some(500.0)))
            .collect();
        let err = ret.set_meter_readings(100.0, &partial).unwrap_err();
        assert!(matches!(err, EngineError::LineMismatch(_)));
        assert_eq!(ret, before);
    }

    #[test]
    fn set_user() {
        let mut ret = water_return();
        ret.set_user("mail@example.com", EXTERNAL_ID, true).unwrap();
        let user = ret.user().unwrap();
        assert!(user.is_internal());

        assert!(ret.set_user("mail", EXTERNAL_ID, false).is_err());
        assert!(ret.user().unwrap().is_internal());
    }

    #[test]
    fn custom_abstraction_period_overrides_licence_period() {
        let mut ret = water_return();
        ret.set_custom_abstraction_period(Some((date(2019, 11, 1), date(2020, 3, 31))))
            .unwrap();
        assert_eq!(
            ret.get_abstraction_period(),
            AbstractionPeriod::new(1, 11, 31, 3).unwrap()
        );

        ret.set_custom_abstraction_period(None).unwrap();
        assert_eq!(ret.reading().total_custom_date_start, None);
        assert_eq!(
            ret.get_abstraction_period(),
            AbstractionPeriod::new(1, 4, 31, 10).unwrap()
        );
    }

    #[test]
    fn custom_abstraction_period_must_be_ordered() {
        let mut ret = water_return();
        let err = ret
            .set_custom_abstraction_period(Some((date(2020, 3, 31), date(2019, 11, 1))))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
        assert!(!ret.reading().total_custom_dates);
    }

    #[test]
    fn single_total_is_spread_within_period() {
        let mut ret = water_return();
        ret.set_single_total(true, Some(70.0)).unwrap();
        assert!(ret.is_single_total());
        assert_eq!(ret.get_return_total(), Some(70.0));
        let quantities: Vec<Option<f64>> = ret.lines().iter().map(|l| l.quantity).collect();
        assert_eq!(quantities[..7], [Some(10.0); 7]);
        assert_eq!(quantities[7..], [None; 5]);
    }

    #[test]
    fn single_total_requires_total() {
        let mut ret = water_return();
        let err = ret.set_single_total(true, None).unwrap_err();
        assert_eq!(err.field(), Some("reading.total"));
        ret.set_single_total(false, None).unwrap();
        assert_eq!(ret.reading().total, None);
    }

    #[test]
    fn nil_return_object_omits_details() {
        let mut ret = one_meter_return();
        ret.set_nil_return(true);
        assert!(ret.get_lines_with_readings().is_none());

        let object = ret.to_object();
        assert!(object.lines.is_none());
        assert!(object.meters.is_none());
        assert!(object.reading.is_none());
        assert_eq!(ret.meters().len(), 1);
    }

    #[test]
    fn lines_with_readings_for_volumes_have_no_readings() {
        let mut ret = water_return();
        ret.set_method(ReadingMethod::Volumes);
        let lines = ret.get_lines_with_readings().unwrap();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|line| line.readings.is_none()));
    }
}
