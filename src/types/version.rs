//! Container format versions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PakError, Result};

/// Format-version tag of a container.
///
/// `Legacy` containers carry no header and therefore no numeric tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    Legacy,
    Ver1,
    Ver2,
    Ver4,
    Ver5,
    Ver6,
}

impl Version {
    /// All known versions, in tag order.
    pub const ALL: [Version; 6] = [
        Version::Legacy,
        Version::Ver1,
        Version::Ver2,
        Version::Ver4,
        Version::Ver5,
        Version::Ver6,
    ];

    /// Numeric tag written in the header, `None` for the header-less variant.
    pub const fn tag(self) -> Option<u32> {
        match self {
            Version::Legacy => None,
            Version::Ver1 => Some(1),
            Version::Ver2 => Some(2),
            Version::Ver4 => Some(4),
            Version::Ver5 => Some(5),
            Version::Ver6 => Some(6),
        }
    }

    /// Map a header tag back to a version.
    pub fn from_tag(tag: u32) -> Result<Self> {
        match tag {
            1 => Ok(Version::Ver1),
            2 => Ok(Version::Ver2),
            4 => Ok(Version::Ver4),
            5 => Ok(Version::Ver5),
            6 => Ok(Version::Ver6),
            _ => Err(PakError::Decode {
                message: format!("Invalid version tag {}", tag),
                help: Some("Known tags are 1, 2, 4, 5 and 6".to_string()),
            }),
        }
    }

    pub const fn is_legacy(self) -> bool {
        matches!(self, Version::Legacy)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Version::Legacy => "legacy",
            Version::Ver1 => "ver1",
            Version::Ver2 => "ver2",
            Version::Ver4 => "ver4",
            Version::Ver5 => "ver5",
            Version::Ver6 => "ver6",
        }
    }
}

impl FromStr for Version {
    type Err = PakError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let key = lower.strip_prefix("ver").unwrap_or(&lower);
        match key {
            "legacy" | "ogg" => Ok(Version::Legacy),
            _ => key
                .parse::<u32>()
                .ok()
                .and_then(|tag| Version::from_tag(tag).ok())
                .ok_or_else(|| PakError::Parse {
                    message: format!("Unknown version: {}", s),
                    help: Some("Use legacy, ver1, ver2, ver4, ver5 or ver6".to_string()),
                }),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
