use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use blockscape_world::TileMapLighter;

use crate::{LightSpreadingTileMapLighter, SimpleTileMapLighter};

/// Lighting strategy named by a persisted map. `None` leaves light values untouched.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LightingMode {
    #[default]
    None,
    Simple,
    SkyAndSources,
}

impl LightingMode {
    /// Tag as stored in map documents; `None` has no tag.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            LightingMode::None => None,
            LightingMode::Simple => Some("simple"),
            LightingMode::SkyAndSources => Some("skyAndSources"),
        }
    }

    /// Reads an optional document tag.
    pub fn from_tag(tag: Option<&str>) -> Result<Self, ParseLightingModeError> {
        tag.map_or(Ok(LightingMode::None), str::parse)
    }

    pub fn lighter(self) -> Option<Arc<dyn TileMapLighter>> {
        match self {
            LightingMode::None => None,
            LightingMode::Simple => Some(Arc::new(SimpleTileMapLighter)),
            LightingMode::SkyAndSources => Some(Arc::new(LightSpreadingTileMapLighter)),
        }
    }
}

impl FromStr for LightingMode {
    type Err = ParseLightingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LightingMode::None),
            "simple" => Ok(LightingMode::Simple),
            "skyAndSources" => Ok(LightingMode::SkyAndSources),
            other => Err(ParseLightingModeError(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLightingModeError(pub String);

impl fmt::Display for ParseLightingModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lighting mode '{}'", self.0)
    }
}

impl std::error::Error for ParseLightingModeError {}
