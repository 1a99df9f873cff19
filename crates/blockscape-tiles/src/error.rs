use std::fmt;

/// Failure while building a tile mesh or loading mesh definitions.
#[derive(Debug)]
pub enum TileDefError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidAtlas,
    UnknownTexture { tile: String, texture: String },
    TextureOutOfAtlas { tile: String, region: usize },
    UnknownFace { tile: String, face: String },
    UnknownKind { tile: String, kind: String },
    InvalidColor { tile: String, color: String },
    NoFaces { tile: String },
    MalformedModel { tile: String, reason: String },
    LightOutOfRange { tile: String, light: u8 },
    TranslucencyOutOfRange { tile: String, translucency: f32 },
    DuplicateName(String),
    TooManyMeshes,
}

impl From<std::io::Error> for TileDefError {
    fn from(e: std::io::Error) -> Self {
        TileDefError::Io(e)
    }
}

impl From<toml::de::Error> for TileDefError {
    fn from(e: toml::de::Error) -> Self {
        TileDefError::Parse(e)
    }
}

impl fmt::Display for TileDefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileDefError::Io(e) => write!(f, "IO error: {}", e),
            TileDefError::Parse(e) => write!(f, "Parse error: {}", e),
            TileDefError::InvalidAtlas => write!(f, "atlas has no whole texture regions"),
            TileDefError::UnknownTexture { tile, texture } => {
                write!(f, "tile '{}': unknown texture '{}'", tile, texture)
            }
            TileDefError::TextureOutOfAtlas { tile, region } => {
                write!(f, "tile '{}': atlas region {} out of range", tile, region)
            }
            TileDefError::UnknownFace { tile, face } => {
                write!(f, "tile '{}': unknown face '{}'", tile, face)
            }
            TileDefError::UnknownKind { tile, kind } => {
                write!(f, "tile '{}': unknown mesh kind '{}'", tile, kind)
            }
            TileDefError::InvalidColor { tile, color } => {
                write!(f, "tile '{}': invalid color '{}'", tile, color)
            }
            TileDefError::NoFaces { tile } => write!(f, "tile '{}': cube has no faces", tile),
            TileDefError::MalformedModel { tile, reason } => {
                write!(f, "tile '{}': malformed model: {}", tile, reason)
            }
            TileDefError::LightOutOfRange { tile, light } => {
                write!(f, "tile '{}': light value {} out of range", tile, light)
            }
            TileDefError::TranslucencyOutOfRange { tile, translucency } => {
                write!(f, "tile '{}': translucency {} outside [0,1]", tile, translucency)
            }
            TileDefError::DuplicateName(name) => write!(f, "duplicate tile name '{}'", name),
            TileDefError::TooManyMeshes => write!(f, "tile mesh collection is full"),
        }
    }
}

impl std::error::Error for TileDefError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileDefError::Io(e) => Some(e),
            TileDefError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
