//! TOML schema for tile mesh definitions.
//!
//! ```toml
//! [atlas]
//! width = 256
//! height = 256
//! tile_width = 16
//! tile_height = 16
//!
//! [textures]
//! stone = 0
//!
//! [[tiles]]
//! name = "stone"
//! all = "stone"          # or a raw region number
//! ```
use std::collections::HashMap;

use serde::Deserialize;

use crate::atlas::TextureAtlas;

#[derive(Deserialize, Debug, Clone)]
pub struct TileMeshesConfig {
    pub atlas: TextureAtlas,
    /// Texture name -> atlas region number.
    #[serde(default)]
    pub textures: HashMap<String, usize>,
    #[serde(default)]
    pub tiles: Vec<TileMeshDefConfig>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    #[default]
    Cube,
    Model,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TextureRef {
    Region(usize),
    Name(String),
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TileMeshDefConfig {
    pub name: String,
    #[serde(default)]
    pub kind: TileKind,
    pub all: Option<TextureRef>,
    pub top: Option<TextureRef>,
    pub bottom: Option<TextureRef>,
    pub side: Option<TextureRef>,
    pub left: Option<TextureRef>,
    pub right: Option<TextureRef>,
    pub front: Option<TextureRef>,
    pub back: Option<TextureRef>,
    /// Face names (`top`, `left`, ..., or `all`/`side`/`none`).
    pub faces: Option<Vec<String>>,
    pub opaque_sides: Option<Vec<String>>,
    pub alpha: Option<bool>,
    pub translucency: Option<f32>,
    pub light: Option<u8>,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub color: Option<String>,
    /// Model vertices, three per triangle.
    pub triangles: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
}
