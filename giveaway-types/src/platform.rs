use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::GiveawayError;

/// Storefronts a listing can originate from.
///
/// These label adapters, listings, errors and log fields, and drive the
/// enable/disable filter applied before any adapter is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Platform {
    /// Valve's Steam store.
    Steam,
    /// Epic Games Store.
    EpicGames,
    /// GOG.com.
    Gog,
}

impl Platform {
    /// Every known platform, in declaration order.
    pub const ALL: [Self; 3] = [Self::Steam, Self::EpicGames, Self::Gog];

    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::EpicGames => "epic-games",
            Self::Gog => "gog",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GiveawayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "steam" => Ok(Self::Steam),
            "epic-games" | "epic" | "epicgames" => Ok(Self::EpicGames),
            "gog" => Ok(Self::Gog),
            other => Err(GiveawayError::InvalidArg(format!("unknown platform: {other}"))),
        }
    }
}
