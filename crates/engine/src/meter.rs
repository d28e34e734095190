//! The meter a one-meter return is read from.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use api_types::meter::MeterObject;

use crate::{
    DateRange, EngineError, Lines, ResultEngine, Units,
    calculations::{Volume, volumes_from_readings},
    validators::{require_non_negative, require_positive, require_text},
};

/// A meter: hardware identity plus cumulative dial readings.
///
/// `readings` is keyed by line date range; a `None` reading means the
/// abstractor skipped that period.
#[derive(Clone, Debug, PartialEq)]
pub struct Meter {
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub multiplier: f64,
    pub meter_details_provided: bool,
    pub start_reading: Option<f64>,
    pub readings: Option<BTreeMap<DateRange, Option<f64>>>,
    pub units: Option<Units>,
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            manufacturer: None,
            serial_number: None,
            multiplier: 1.0,
            meter_details_provided: false,
            start_reading: None,
            readings: None,
            units: None,
        }
    }
}

/// Meter identity entered by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct MeterDetails {
    pub manufacturer: String,
    pub serial_number: String,
    pub multiplier: f64,
    pub meter_details_provided: bool,
}

impl MeterDetails {
    #[must_use]
    pub fn new(manufacturer: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            serial_number: serial_number.into(),
            multiplier: 1.0,
            meter_details_provided: true,
        }
    }

    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn meter_details_provided(mut self, provided: bool) -> Self {
        self.meter_details_provided = provided;
        self
    }
}

/// A dial reading entered for one line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReading {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reading: Option<f64>,
}

impl MeterReading {
    pub fn new(range: DateRange, reading: Option<f64>) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            reading,
        }
    }
}

impl Meter {
    pub fn set_meter_details(&mut self, details: &MeterDetails) -> ResultEngine<()> {
        let manufacturer = require_text(&details.manufacturer, "manufacturer")?;
        let serial_number = require_text(&details.serial_number, "serialNumber")?;
        let multiplier = require_positive(details.multiplier, "multiplier")?;

        self.manufacturer = Some(manufacturer);
        self.serial_number = Some(serial_number);
        self.multiplier = multiplier;
        self.meter_details_provided = details.meter_details_provided;
        Ok(())
    }

    /// Replace the start reading and every stored reading.
    pub fn set_meter_readings(
        &mut self,
        start_reading: f64,
        readings: &[MeterReading],
    ) -> ResultEngine<()> {
        let start_reading = require_positive(start_reading, "startReading")?;

        let mut by_line = BTreeMap::new();
        for reading in readings {
            let range = DateRange::new(reading.start_date, reading.end_date)?;
            if let Some(value) = reading.reading {
                require_non_negative(value, "readings")?;
            }
            if by_line.insert(range, reading.reading).is_some() {
                return Err(EngineError::invalid_field(
                    "readings",
                    format!("duplicate reading for {range}"),
                ));
            }
        }

        self.start_reading = Some(start_reading);
        self.readings = Some(by_line);
        Ok(())
    }

    /// The most recent positive dial value reported.
    pub fn get_end_reading(&self) -> Option<f64> {
        self.readings
            .as_ref()?
            .values()
            .rev()
            .find_map(|reading| reading.filter(|value| *value > 0.0))
    }

    /// Volumes of `lines` derived from the readings, scaled by the meter
    /// multiplier.
    pub fn get_volumes(&self, lines: &Lines, include_readings: bool) -> ResultEngine<Vec<Volume>> {
        let start_reading = self
            .start_reading
            .ok_or_else(|| EngineError::invalid_field("startReading", "no start reading"))?;
        Ok(volumes_from_readings(
            start_reading,
            self.ordered_readings(lines),
            self.multiplier,
            include_readings,
        ))
    }

    /// Readings in line order; a line without a stored reading gets `None`.
    pub(crate) fn ordered_readings(&self, lines: &Lines) -> Vec<(DateRange, Option<f64>)> {
        lines
            .keys()
            .map(|range| {
                let reading = self
                    .readings
                    .as_ref()
                    .and_then(|readings| readings.get(&range).copied().flatten());
                (range, reading)
            })
            .collect()
    }

    /// Drop readings keyed to a range that is not one of `lines`. Returns how
    /// many were dropped.
    pub(crate) fn retain_line_readings(&mut self, lines: &Lines) -> usize {
        let Some(readings) = self.readings.as_mut() else {
            return 0;
        };
        let keys: BTreeSet<DateRange> = lines.keys().collect();
        let before = readings.len();
        readings.retain(|range, _| keys.contains(range));
        before - readings.len()
    }

    /// Drop reading data, keeping the hardware identity.
    pub(crate) fn strip_readings(&mut self) {
        self.start_reading = None;
        self.readings = None;
        self.units = None;
    }
}

impl TryFrom<MeterObject> for Meter {
    type Error = EngineError;

    fn try_from(object: MeterObject) -> Result<Self, Self::Error> {
        let readings = object
            .readings
            .map(|readings| {
                readings
                    .into_iter()
                    .map(|(key, reading)| Ok((key.parse::<DateRange>()?, reading)))
                    .collect::<ResultEngine<BTreeMap<_, _>>>()
            })
            .transpose()?;

        Ok(Self {
            manufacturer: object.manufacturer,
            serial_number: object.serial_number,
            multiplier: object.multiplier.unwrap_or(1.0),
            meter_details_provided: object.meter_details_provided.unwrap_or(false),
            start_reading: object.start_reading,
            readings,
            units: object.units.as_deref().map(Units::try_from).transpose()?,
        })
    }
}

impl From<&Meter> for MeterObject {
    fn from(meter: &Meter) -> Self {
        Self {
            manufacturer: meter.manufacturer.clone(),
            serial_number: meter.serial_number.clone(),
            multiplier: Some(meter.multiplier),
            meter_details_provided: Some(meter.meter_details_provided),
            start_reading: meter.start_reading,
            readings: meter.readings.as_ref().map(|readings| {
                readings
                    .iter()
                    .map(|(range, reading)| (range.to_string(), *reading))
                    .collect()
            }),
            units: meter.units.map(|units| units.as_str().to_string()),
        }
    }
}
