//! How a return's volumes were obtained.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use api_types::reading::ReadingObject;

use crate::{EngineError, Units};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingType {
    Estimated,
    Measured,
}

impl ReadingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Estimated => "estimated",
            Self::Measured => "measured",
        }
    }
}

impl TryFrom<&str> for ReadingType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "estimated" => Ok(Self::Estimated),
            "measured" => Ok(Self::Measured),
            other => Err(EngineError::invalid_field(
                "reading.type",
                format!("invalid reading type: {other}"),
            )),
        }
    }
}

/// Whether volumes are entered directly or derived from one meter's dial
/// readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingMethod {
    #[serde(rename = "abstractionVolumes", alias = "volumes")]
    Volumes,
    #[serde(rename = "oneMeter")]
    OneMeter,
}

impl ReadingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Volumes => "abstractionVolumes",
            Self::OneMeter => "oneMeter",
        }
    }
}

impl TryFrom<&str> for ReadingMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "abstractionVolumes" | "volumes" => Ok(Self::Volumes),
            "oneMeter" => Ok(Self::OneMeter),
            other => Err(EngineError::invalid_field(
                "reading.method",
                format!("invalid reading method: {other}"),
            )),
        }
    }
}

/// Reading descriptor of a return.
///
/// `total_flag` marks a single-total return: the user reported one volume for
/// the whole cycle, spread over the lines by the engine. With
/// `total_custom_dates` the spread uses the custom start/end dates instead of
/// the licence abstraction period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reading {
    pub reading_type: Option<ReadingType>,
    pub method: Option<ReadingMethod>,
    pub units: Option<Units>,
    pub total_flag: bool,
    pub total: Option<f64>,
    pub total_custom_dates: bool,
    pub total_custom_date_start: Option<NaiveDate>,
    pub total_custom_date_end: Option<NaiveDate>,
}

impl TryFrom<ReadingObject> for Reading {
    type Error = EngineError;

    fn try_from(object: ReadingObject) -> Result<Self, Self::Error> {
        Ok(Self {
            reading_type: object
                .reading_type
                .as_deref()
                .map(ReadingType::try_from)
                .transpose()?,
            method: object
                .method
                .as_deref()
                .map(ReadingMethod::try_from)
                .transpose()?,
            units: object.units.as_deref().map(Units::try_from).transpose()?,
            total_flag: object.total_flag,
            total: object.total,
            total_custom_dates: object.total_custom_dates,
            total_custom_date_start: object.total_custom_date_start,
            total_custom_date_end: object.total_custom_date_end,
        })
    }
}

impl From<&Reading> for ReadingObject {
    fn from(reading: &Reading) -> Self {
        Self {
            reading_type: reading.reading_type.map(|t| t.as_str().to_string()),
            method: reading.method.map(|m| m.as_str().to_string()),
            units: reading.units.map(|u| u.as_str().to_string()),
            total_flag: reading.total_flag,
            total: reading.total,
            total_custom_dates: reading.total_custom_dates,
            total_custom_date_start: reading.total_custom_date_start,
            total_custom_date_end: reading.total_custom_date_end,
        }
    }
}
