//! Water abstraction returns.
//!
//! The crate holds the in-memory model of a single return submission
//! ([`WaterReturn`]), the rules that generate and update its reporting
//! [`Lines`], and the calculations turning cumulative [`Meter`] readings into
//! per-line volumes. Nothing here does I/O.

pub use cycle::{CycleOptions, DateRange, Frequency, required_lines};
pub use error::EngineError;
pub use lines::{Line, LineQuantity, Lines};
pub use meter::{Meter, MeterDetails, MeterReading};
pub use period::AbstractionPeriod;
pub use reading::{Reading, ReadingMethod, ReadingType};
pub use status::ReturnStatus;
pub use units::Units;
pub use user::{User, UserType};
pub use water_return::{LineWithReadings, WaterReturn};

pub mod calculations;
mod cycle;
mod error;
mod lines;
mod meter;
mod period;
mod reading;
mod status;
mod units;
mod user;
pub mod validators;
mod water_return;

pub type ResultEngine<T> = Result<T, EngineError>;
