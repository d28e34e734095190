use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Units a return's volumes or meter readings are reported in.
///
/// The wire representation is the unit symbol (`m³`, `l`, `Ml`, `gal`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "m³")]
    CubicMetres,
    #[serde(rename = "l")]
    Litres,
    #[serde(rename = "Ml")]
    Megalitres,
    #[serde(rename = "gal")]
    Gallons,
}

impl Units {
    pub const ALL: [Units; 4] = [
        Units::CubicMetres,
        Units::Litres,
        Units::Megalitres,
        Units::Gallons,
    ];

    /// Canonical unit symbol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Units::CubicMetres => "m³",
            Units::Litres => "l",
            Units::Megalitres => "Ml",
            Units::Gallons => "gal",
        }
    }
}

impl core::fmt::Display for Units {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Symbols are case sensitive: `ml` and `Ml` differ by a factor of 10^9.
        match value.trim() {
            "m³" | "m3" => Ok(Units::CubicMetres),
            "l" => Ok(Units::Litres),
            "Ml" => Ok(Units::Megalitres),
            "gal" => Ok(Units::Gallons),
            other => Err(EngineError::invalid_field(
                "units",
                format!("unsupported units: {other}"),
            )),
        }
    }
}
