//! Raw return objects exchanged with the wizard controllers and the
//! returns service.
//!
//! Field names follow the service's camelCase JSON. Enumerated values
//! (status, frequency, method, units...) are kept as strings here; the
//! engine parses them into typed values when a return is constructed.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A numeric metadata field that upstream services send either as a JSON
/// number or as a string (`"31"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(u32),
    Text(String),
}

impl NumericField {
    /// Returns the value as a number, if it holds one.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
        }
    }
}

impl From<u32> for NumericField {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

pub mod metadata {
    use super::*;

    /// Licence abstraction period as held in the permit repository.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NaldMetadata {
        pub period_start_day: NumericField,
        pub period_start_month: NumericField,
        pub period_end_day: NumericField,
        pub period_end_month: NumericField,
        /// Region/area/format codes and anything else, passed through as-is.
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReturnMetadata {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub nald: Option<NaldMetadata>,
        /// Set on the last return of a licence that ends mid-cycle.
        #[serde(default)]
        pub is_final: bool,
        /// Purposes, points, description... passed through as-is.
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }
}

pub mod line {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LineObject {
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        #[serde(default)]
        pub quantity: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub time_period: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub reading_type: Option<String>,
    }
}

pub mod meter {
    use super::*;

    /// A meter entry.
    ///
    /// `readings` is keyed by line date-key, `"<startDate>_<endDate>"`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MeterObject {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub manufacturer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub serial_number: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub multiplier: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub meter_details_provided: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_reading: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub readings: Option<BTreeMap<String, Option<f64>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub units: Option<String>,
    }
}

pub mod reading {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReadingObject {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub reading_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub units: Option<String>,
        #[serde(default)]
        pub total_flag: bool,
        #[serde(default)]
        pub total: Option<f64>,
        #[serde(default)]
        pub total_custom_dates: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub total_custom_date_start: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub total_custom_date_end: Option<NaiveDate>,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserObject {
        pub email: String,
        pub external_id: String,
        /// `internal` or `external`.
        #[serde(rename = "type")]
        pub user_type: String,
    }
}

pub mod water_return {
    use super::*;

    pub use super::line::LineObject;
    pub use super::metadata::ReturnMetadata;
    pub use super::meter::MeterObject;
    pub use super::reading::ReadingObject;
    pub use super::user::UserObject;

    /// A single return submission.
    ///
    /// `lines`, `meters` and `reading` are absent on nil returns; every
    /// other field is always present (possibly `null`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReturnObject {
        pub return_id: String,
        pub licence_number: String,
        #[serde(default)]
        pub received_date: Option<NaiveDate>,
        #[serde(default)]
        pub version_number: u32,
        #[serde(default)]
        pub is_current: bool,
        pub status: String,
        #[serde(default)]
        pub is_nil: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub meters: Option<Vec<MeterObject>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub reading: Option<ReadingObject>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub lines: Option<Vec<LineObject>>,
        #[serde(default)]
        pub metadata: ReturnMetadata,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub frequency: String,
        #[serde(default)]
        pub user: Option<UserObject>,
    }
}

pub use water_return::ReturnObject;
