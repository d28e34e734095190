//! Return status.
//!
//! A return moves forward only:
//!
//! ```text
//!   Due ──► Received ──► Completed
//!    └──────────────────────▲
//! ```
//!
//! Every allowed transition is listed in [`ReturnStatus::can_transition_to`].
//! Re-applying the current status is allowed and has no effect.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    #[default]
    Due,
    Received,
    /// **Terminal.**
    Completed,
}

impl ReturnStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Due => "due",
            Self::Received => "received",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` if `next` is reachable from `self`.
    pub fn can_transition_to(self, next: ReturnStatus) -> bool {
        use ReturnStatus::*;

        matches!(
            (self, next),
            (Due, Due | Received | Completed)
                | (Received, Received | Completed)
                | (Completed, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl core::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReturnStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "due" => Ok(Self::Due),
            "received" => Ok(Self::Received),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::invalid_field(
                "status",
                format!("invalid return status: {other}"),
            )),
        }
    }
}
