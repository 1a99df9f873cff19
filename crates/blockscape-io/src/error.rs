use std::fmt;

use blockscape_lighting::ParseLightingModeError;

/// Anything that can go wrong reading or writing a map document.
#[derive(Debug)]
pub enum MapIoError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Base64 {
        chunk: usize,
        source: base64::DecodeError,
    },
    ChunkCount {
        expected: usize,
        found: usize,
    },
    ChunkLength {
        chunk: usize,
        expected: usize,
        found: usize,
    },
    UnknownTileIndex {
        chunk: usize,
        index: u16,
    },
    InvalidConfig(String),
    LightingMode(ParseLightingModeError),
}

impl fmt::Display for MapIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapIoError::Io(e) => write!(f, "I/O error: {}", e),
            MapIoError::Json(e) => write!(f, "map document error: {}", e),
            MapIoError::Base64 { chunk, source } => {
                write!(f, "chunk {}: bad base64: {}", chunk, source)
            }
            MapIoError::ChunkCount { expected, found } => {
                write!(f, "expected {} chunks, found {}", expected, found)
            }
            MapIoError::ChunkLength {
                chunk,
                expected,
                found,
            } => write!(
                f,
                "chunk {}: expected {} bytes of tile data, found {}",
                chunk, expected, found
            ),
            MapIoError::UnknownTileIndex { chunk, index } => {
                write!(f, "chunk {}: tile index {} has no mesh", chunk, index)
            }
            MapIoError::InvalidConfig(msg) => write!(f, "invalid map dimensions: {}", msg),
            MapIoError::LightingMode(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MapIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapIoError::Io(e) => Some(e),
            MapIoError::Json(e) => Some(e),
            MapIoError::Base64 { source, .. } => Some(source),
            MapIoError::LightingMode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapIoError {
    fn from(e: std::io::Error) -> Self {
        MapIoError::Io(e)
    }
}

impl From<serde_json::Error> for MapIoError {
    fn from(e: serde_json::Error) -> Self {
        MapIoError::Json(e)
    }
}

impl From<ParseLightingModeError> for MapIoError {
    fn from(e: ParseLightingModeError) -> Self {
        MapIoError::LightingMode(e)
    }
}
