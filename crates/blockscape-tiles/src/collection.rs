use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::atlas::TextureAtlas;
use crate::config::{TextureRef, TileKind, TileMeshDefConfig, TileMeshesConfig};
use crate::error::TileDefError;
use crate::face::Face;
use crate::mesh::{CubeTileMeshDef, ModelTileMeshDef, TileMesh};
use crate::tile::Tile;
use blockscape_geom::{Color, Vec3};

/// Append-only catalog of tile meshes keyed by [`Tile::index`], plus the atlas their
/// UVs were resolved against. Index 0 is always the null mesh.
#[derive(Clone, Debug)]
pub struct TileMeshCollection {
    atlas: TextureAtlas,
    meshes: Vec<TileMesh>,
    by_name: HashMap<String, u16>,
}

impl TileMeshCollection {
    pub fn new(atlas: TextureAtlas) -> Self {
        Self {
            atlas,
            meshes: vec![TileMesh::null()],
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// Number of meshes including the null entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Never true: the null mesh is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Mesh for `tile`. The index must have been validated at load time; an unknown
    /// index is a programming error and panics.
    #[inline]
    pub fn get(&self, tile: &Tile) -> &TileMesh {
        self.get_by_index(tile.index)
    }

    #[inline]
    pub fn get_by_index(&self, index: u16) -> &TileMesh {
        match self.meshes.get(index as usize) {
            Some(mesh) => mesh,
            None => panic!(
                "tile index {index} outside mesh collection ({} meshes)",
                self.meshes.len()
            ),
        }
    }

    pub fn contains_index(&self, index: u16) -> bool {
        (index as usize) < self.meshes.len()
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &TileMesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (i as u16, m))
    }

    pub fn add_cube(&mut self, def: &CubeTileMeshDef) -> Result<u16, TileDefError> {
        let mesh = TileMesh::cube(def, &self.atlas)?;
        self.push(mesh)
    }

    /// Opaque cube with one atlas region on every face.
    pub fn add_cube_all(&mut self, name: &str, region: usize) -> Result<u16, TileDefError> {
        self.add_cube(&CubeTileMeshDef::new(name).all_textures(region))
    }

    /// Opaque cube with distinct top and bottom regions and one region for the four sides.
    pub fn add_cube_top_side(
        &mut self,
        name: &str,
        top: usize,
        side: usize,
        bottom: usize,
    ) -> Result<u16, TileDefError> {
        let def = CubeTileMeshDef::new(name)
            .all_textures(side)
            .texture(Face::TOP, top)
            .texture(Face::BOTTOM, bottom);
        self.add_cube(&def)
    }

    pub fn add_model(&mut self, def: &ModelTileMeshDef) -> Result<u16, TileDefError> {
        let mesh = TileMesh::model(def, &self.atlas)?;
        self.push(mesh)
    }

    fn push(&mut self, mesh: TileMesh) -> Result<u16, TileDefError> {
        if self.meshes.len() > u16::MAX as usize {
            return Err(TileDefError::TooManyMeshes);
        }
        let index = self.meshes.len() as u16;
        if !mesh.name().is_empty() {
            if self.by_name.contains_key(mesh.name()) {
                return Err(TileDefError::DuplicateName(mesh.name().to_string()));
            }
            self.by_name.insert(mesh.name().to_string(), index);
        }
        self.meshes.push(mesh);
        Ok(index)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, TileDefError> {
        let cfg: TileMeshesConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TileDefError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Builds every definition in order; tile indices follow declaration order starting
    /// at 1. Any failure discards the whole collection.
    pub fn from_config(cfg: TileMeshesConfig) -> Result<Self, TileDefError> {
        if !cfg.atlas.is_valid() {
            return Err(TileDefError::InvalidAtlas);
        }
        let mut collection = TileMeshCollection::new(cfg.atlas);
        for def in &cfg.tiles {
            let index = match def.kind {
                TileKind::Cube => {
                    let cube = compile_cube(def, &cfg.textures)?;
                    collection.add_cube(&cube)?
                }
                TileKind::Model => {
                    let model = compile_model(def, &cfg.textures)?;
                    collection.add_model(&model)?
                }
            };
            log::debug!(target: "tilemap", "tile mesh '{}' -> index {}", def.name, index);
        }
        log::info!(
            target: "tilemap",
            "loaded {} tile meshes ({} atlas regions)",
            collection.len() - 1,
            collection.atlas.region_count()
        );
        Ok(collection)
    }
}

fn resolve_texture(
    tile: &str,
    tex: &TextureRef,
    names: &HashMap<String, usize>,
) -> Result<usize, TileDefError> {
    match tex {
        TextureRef::Region(n) => Ok(*n),
        TextureRef::Name(name) => {
            names
                .get(name)
                .copied()
                .ok_or_else(|| TileDefError::UnknownTexture {
                    tile: tile.to_string(),
                    texture: name.clone(),
                })
        }
    }
}

fn face_mask(tile: &str, names: &[String]) -> Result<u8, TileDefError> {
    let mut mask = 0u8;
    for n in names {
        mask |= match n.as_str() {
            "all" => Face::ALL_MASK,
            "none" => 0,
            "side" => Face::LEFT.bit() | Face::RIGHT.bit() | Face::FRONT.bit() | Face::BACK.bit(),
            other => Face::from_name(other)
                .ok_or_else(|| TileDefError::UnknownFace {
                    tile: tile.to_string(),
                    face: other.to_string(),
                })?
                .bit(),
        };
    }
    Ok(mask)
}

fn parse_color(tile: &str, color: Option<&str>) -> Result<Color, TileDefError> {
    match color {
        None => Ok(Color::WHITE),
        Some(s) => Color::from_hex(s).ok_or_else(|| TileDefError::InvalidColor {
            tile: tile.to_string(),
            color: s.to_string(),
        }),
    }
}

fn compile_cube(
    def: &TileMeshDefConfig,
    names: &HashMap<String, usize>,
) -> Result<CubeTileMeshDef, TileDefError> {
    let tex = |t: &Option<TextureRef>| -> Result<Option<usize>, TileDefError> {
        t.as_ref()
            .map(|t| resolve_texture(&def.name, t, names))
            .transpose()
    };
    let all = tex(&def.all)?;
    let side = tex(&def.side)?.or(all);
    let mut textures = [None; 6];
    // Most specific key wins: face name, then top/bottom/side, then all.
    textures[Face::TOP.index()] = tex(&def.top)?.or(all);
    textures[Face::BOTTOM.index()] = tex(&def.bottom)?.or(all);
    textures[Face::LEFT.index()] = tex(&def.left)?.or(side);
    textures[Face::RIGHT.index()] = tex(&def.right)?.or(side);
    textures[Face::FRONT.index()] = tex(&def.front)?.or(side);
    textures[Face::BACK.index()] = tex(&def.back)?.or(side);

    let alpha = def.alpha.unwrap_or(false);
    let faces = match &def.faces {
        Some(f) => face_mask(&def.name, f)?,
        None => Face::ALL_MASK,
    };
    // Alpha cubes default to letting light and sight through.
    let opaque_sides = match &def.opaque_sides {
        Some(f) => face_mask(&def.name, f)?,
        None if alpha => 0,
        None => Face::ALL_MASK,
    };
    Ok(CubeTileMeshDef {
        name: def.name.clone(),
        textures,
        faces,
        opaque_sides,
        light_value: def.light.unwrap_or(0),
        alpha,
        translucency: def.translucency.unwrap_or(1.0),
        color: parse_color(&def.name, def.color.as_deref())?,
    })
}

fn compile_model(
    def: &TileMeshDefConfig,
    names: &HashMap<String, usize>,
) -> Result<ModelTileMeshDef, TileDefError> {
    let texture = def
        .all
        .as_ref()
        .map(|t| resolve_texture(&def.name, t, names))
        .transpose()?;
    let positions = def
        .triangles
        .as_ref()
        .map(|v| v.iter().map(|p| Vec3::new(p[0], p[1], p[2])).collect())
        .unwrap_or_default();
    let texcoords = def
        .texcoords
        .as_ref()
        .map(|v| v.iter().map(|t| (t[0], t[1])).collect());
    let opaque_sides = match &def.opaque_sides {
        Some(f) => face_mask(&def.name, f)?,
        None => 0,
    };
    Ok(ModelTileMeshDef {
        name: def.name.clone(),
        positions,
        normals: None,
        texcoords,
        texture,
        opaque_sides,
        light_value: def.light.unwrap_or(0),
        alpha: def.alpha.unwrap_or(false),
        translucency: def.translucency.unwrap_or(1.0),
        color: parse_color(&def.name, def.color.as_deref())?,
    })
}
