use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaFormat {
    TV,
    TVShort,
    Movie,
    OVA,
    ONA,
    Special,
    Music,
    #[default]
    Unknown,
}

impl MediaFormat {
    /// Filter value for Jikan's `/anime?type=` parameter
    pub fn as_jikan(&self) -> Option<&'static str> {
        match self {
            MediaFormat::TV | MediaFormat::TVShort => Some("tv"),
            MediaFormat::Movie => Some("movie"),
            MediaFormat::OVA => Some("ova"),
            MediaFormat::ONA => Some("ona"),
            MediaFormat::Special => Some("special"),
            MediaFormat::Music => Some("music"),
            MediaFormat::Unknown => None,
        }
    }

    /// `MediaFormat` enum value used by AniList
    pub fn as_anilist(&self) -> Option<&'static str> {
        match self {
            MediaFormat::TV => Some("TV"),
            MediaFormat::TVShort => Some("TV_SHORT"),
            MediaFormat::Movie => Some("MOVIE"),
            MediaFormat::OVA => Some("OVA"),
            MediaFormat::ONA => Some("ONA"),
            MediaFormat::Special => Some("SPECIAL"),
            MediaFormat::Music => Some("MUSIC"),
            MediaFormat::Unknown => None,
        }
    }

    /// Map a provider's type string (`"TV"`, `"TV_SHORT"`, `"Movie"`, ...)
    pub fn from_provider(value: Option<&str>) -> Self {
        match value.map(|v| v.to_uppercase()).as_deref() {
            Some("TV") => MediaFormat::TV,
            Some("TV_SHORT") => MediaFormat::TVShort,
            Some("MOVIE") => MediaFormat::Movie,
            Some("OVA") => MediaFormat::OVA,
            Some("ONA") => MediaFormat::ONA,
            Some("SPECIAL") | Some("TV SPECIAL") => MediaFormat::Special,
            Some("MUSIC") => MediaFormat::Music,
            _ => MediaFormat::Unknown,
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaFormat::TV => "TV",
            MediaFormat::TVShort => "TV Short",
            MediaFormat::Movie => "Movie",
            MediaFormat::OVA => "OVA",
            MediaFormat::ONA => "ONA",
            MediaFormat::Special => "Special",
            MediaFormat::Music => "Music",
            MediaFormat::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MediaFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_provider(Some(s.trim())) {
            MediaFormat::Unknown => Err(AppError::ValidationError(format!(
                "Unknown media format '{}'",
                s
            ))),
            format => Ok(format),
        }
    }
}
