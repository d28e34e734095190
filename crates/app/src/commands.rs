//! Subcommand bodies. They work on JSON text; file I/O stays in `main`.

use chrono::NaiveDate;
use serde::Serialize;

use returns_engine::{
    CycleOptions, DateRange, Frequency, LineWithReadings, ReturnStatus, WaterReturn,
};

use crate::error::Result;

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LineKey {
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_period: Frequency,
}

/// The required line set of a cycle.
pub fn lines(options: &CycleOptions, pretty: bool) -> Result<String> {
    let lines: Vec<LineKey> = options
        .required_lines()?
        .into_iter()
        .map(|DateRange { start_date, end_date }| LineKey {
            start_date,
            end_date,
            time_period: options.frequency,
        })
        .collect();
    tracing::info!(lines = lines.len(), frequency = %options.frequency, "generated lines");
    to_json(&lines, pretty)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    return_id: &'a str,
    licence_number: &'a str,
    status: ReturnStatus,
    is_nil: bool,
    lines: Option<Vec<LineWithReadings>>,
    total: Option<f64>,
}

/// Lines with their meter readings, and the return total.
pub fn summary(json: &str, pretty: bool) -> Result<String> {
    let water_return = WaterReturn::from_json(json)?;
    let summary = Summary {
        return_id: water_return.return_id(),
        licence_number: water_return.licence_number(),
        status: water_return.status(),
        is_nil: water_return.is_nil_return(),
        lines: water_return.get_lines_with_readings(),
        total: water_return.get_return_total(),
    };
    to_json(&summary, pretty)
}

/// Finalize a submission: multiply meter volumes, move the status on and
/// bump the version.
pub fn finalize(
    json: &str,
    status: ReturnStatus,
    received_date: NaiveDate,
    pretty: bool,
) -> Result<String> {
    let mut water_return = WaterReturn::from_json(json)?;
    water_return.apply_meter_multiplication();
    water_return.set_status(status, Some(received_date));
    water_return.increment_version_number();
    tracing::info!(
        return_id = water_return.return_id(),
        status = %water_return.status(),
        version_number = water_return.version_number(),
        "finalized return"
    );

    let output = if pretty {
        water_return.to_json_pretty()?
    } else {
        water_return.to_json()?
    };
    Ok(output)
}
