use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Where the user is with a title
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    Planning,
    Watching,
    Completed,
    OnHold,
    Dropped,
}

impl WatchStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            WatchStatus::Planning => "Plan to Watch",
            WatchStatus::Watching => "Watching",
            WatchStatus::Completed => "Completed",
            WatchStatus::OnHold => "On Hold",
            WatchStatus::Dropped => "Dropped",
        }
    }

    /// Value stored in documents and used in filters
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Planning => "planning",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
            WatchStatus::OnHold => "on_hold",
            WatchStatus::Dropped => "dropped",
        }
    }

    pub fn all() -> [Self; 5] {
        [
            WatchStatus::Planning,
            WatchStatus::Watching,
            WatchStatus::Completed,
            WatchStatus::OnHold,
            WatchStatus::Dropped,
        ]
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for WatchStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "planning" | "plan_to_watch" | "planned" => Ok(WatchStatus::Planning),
            "watching" => Ok(WatchStatus::Watching),
            "completed" | "done" => Ok(WatchStatus::Completed),
            "on_hold" | "paused" => Ok(WatchStatus::OnHold),
            "dropped" => Ok(WatchStatus::Dropped),
            _ => Err(AppError::ValidationError(format!(
                "Unknown watch status '{}'",
                s
            ))),
        }
    }
}
