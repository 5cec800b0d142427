use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Anime season enum for better type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Get season display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }

    /// Lowercase path segment used by Jikan (`/seasons/2024/fall`)
    pub fn as_jikan(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    /// `MediaSeason` enum value used by AniList
    pub fn as_anilist(&self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
        }
    }

    /// Get season from month (1-12)
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Winter),
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Fall),
            _ => None,
        }
    }

    /// Season and year for a calendar date.
    ///
    /// December belongs to the winter season of the following year.
    pub fn for_date(date: chrono::NaiveDate) -> (Self, i32) {
        match date.month() {
            12 => (Self::Winter, date.year() + 1),
            month => (
                Self::from_month(month).unwrap_or(Self::Winter),
                date.year(),
            ),
        }
    }

    /// Get all seasons in chronological order
    pub fn all() -> [Self; 4] {
        [Self::Winter, Self::Spring, Self::Summer, Self::Fall]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Season {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winter" => Ok(Self::Winter),
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            _ => Err(AppError::ValidationError(format!(
                "Invalid season '{}'. Must be one of: spring, summer, fall, winter",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_season() {
        assert_eq!("Autumn".parse::<Season>(), Ok(Season::Fall));
        assert_eq!(" spring ".parse::<Season>(), Ok(Season::Spring));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_season_for_date() {
        let july = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        assert_eq!(Season::for_date(july), (Season::Summer, 2024));

        let december = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        assert_eq!(Season::for_date(december), (Season::Winter, 2025));
    }

    #[test]
    fn test_provider_spellings() {
        assert_eq!(Season::Fall.as_jikan(), "fall");
        assert_eq!(Season::Fall.as_anilist(), "FALL");
        assert_eq!(Season::all().len(), 4);
    }
}
