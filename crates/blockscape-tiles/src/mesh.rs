use std::ops::Range;

use blockscape_geom::{Aabb, Color, Vec3};

use crate::atlas::{TextureAtlas, UvRect};
use crate::error::TileDefError;
use crate::face::Face;
use crate::tile::LIGHT_VALUE_MAX;
use crate::vertex::{Vertex, VertexBuffer, VertexLayout};

/// Vertices emitted per cube face: two triangles, no index buffer.
pub const VERTICES_PER_FACE: usize = 6;

const H: f32 = 0.5;

// Per face: corners (top-left, top-right, bottom-right, bottom-left) as seen from outside.
const CUBE_FACE_CORNERS: [[(f32, f32, f32); 4]; 6] = [
    // PosY, viewed from above with -Z as "up"
    [(-H, H, -H), (H, H, -H), (H, H, H), (-H, H, H)],
    // NegY, viewed from below with +Z as "up"
    [(-H, -H, H), (H, -H, H), (H, -H, -H), (-H, -H, -H)],
    // PosX
    [(H, H, H), (H, H, -H), (H, -H, -H), (H, -H, H)],
    // NegX
    [(-H, H, -H), (-H, H, H), (-H, -H, H), (-H, -H, -H)],
    // PosZ
    [(-H, H, H), (H, H, H), (H, -H, H), (-H, -H, H)],
    // NegZ
    [(H, H, -H), (-H, H, -H), (-H, -H, -H), (H, -H, -H)],
];

// Two counter-clockwise triangles over the corner order above.
const QUAD_TRIANGLES: [usize; VERTICES_PER_FACE] = [0, 3, 2, 0, 2, 1];

/// Variant discriminant for [`TileMesh`]. The vertex generator branches on this.
#[derive(Clone, Debug, PartialEq)]
pub enum TileMeshShape {
    /// Reserved entry for empty space.
    Null,
    /// Unit cube with independently present faces; `ranges[face]` locates each
    /// present face's vertices inside the mesh's vertex buffer.
    Cube {
        faces: u8,
        ranges: [Option<Range<usize>>; 6],
    },
    /// Arbitrary triangle list.
    Model,
}

/// Immutable render + collision geometry for one tile index, centered on the origin.
#[derive(Clone, Debug)]
pub struct TileMesh {
    name: String,
    shape: TileMeshShape,
    opaque_sides: u8,
    alpha: bool,
    translucency: f32,
    light_value: u8,
    color: Color,
    vertices: VertexBuffer,
    collision_vertices: Vec<Vec3>,
    bounds: Aabb,
}

impl TileMesh {
    pub fn null() -> Self {
        TileMesh {
            name: String::new(),
            shape: TileMeshShape::Null,
            opaque_sides: 0,
            alpha: false,
            translucency: 1.0,
            light_value: 0,
            color: Color::WHITE,
            vertices: VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD),
            collision_vertices: Vec::new(),
            bounds: Aabb::default(),
        }
    }

    /// Builds a unit cube from `def`, resolving texture regions through `atlas`.
    pub fn cube(def: &CubeTileMeshDef, atlas: &TextureAtlas) -> Result<Self, TileDefError> {
        validate_common(&def.name, def.light_value, def.translucency)?;
        let mut uvs: [Option<UvRect>; 6] = [None; 6];
        let mut present = 0u8;
        for face in Face::ALL {
            let Some(region) = def.textures[face.index()] else {
                continue;
            };
            if region >= atlas.region_count() {
                return Err(TileDefError::TextureOutOfAtlas {
                    tile: def.name.clone(),
                    region,
                });
            }
            if face.in_mask(def.faces) {
                uvs[face.index()] = Some(atlas.region(region));
                present |= face.bit();
            }
        }
        if present == 0 {
            return Err(TileDefError::NoFaces {
                tile: def.name.clone(),
            });
        }

        let mut vertices = VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD);
        let mut ranges: [Option<Range<usize>>; 6] = Default::default();
        for face in Face::ALL {
            let Some(uv) = uvs[face.index()] else {
                continue;
            };
            let start = vertices.len();
            let corners = CUBE_FACE_CORNERS[face.index()];
            let corner_uv = [(uv.u0, uv.v0), (uv.u1, uv.v0), (uv.u1, uv.v1), (uv.u0, uv.v1)];
            for &c in &QUAD_TRIANGLES {
                let (x, y, z) = corners[c];
                vertices.push(Vertex {
                    position: Vec3::new(x, y, z),
                    normal: face.normal(),
                    color: def.color,
                    texcoord: corner_uv[c],
                });
            }
            ranges[face.index()] = Some(start..vertices.len());
        }
        let collision_vertices = (0..vertices.len()).map(|i| vertices.position(i)).collect();

        Ok(TileMesh {
            name: def.name.clone(),
            shape: TileMeshShape::Cube {
                faces: present,
                ranges,
            },
            opaque_sides: def.opaque_sides & Face::ALL_MASK,
            alpha: def.alpha,
            translucency: def.translucency,
            light_value: def.light_value,
            color: def.color,
            vertices,
            collision_vertices,
            bounds: Aabb::new(Vec3::splat(-H), Vec3::splat(H)),
        })
    }

    /// Builds a generic triangle mesh from `def`.
    pub fn model(def: &ModelTileMeshDef, atlas: &TextureAtlas) -> Result<Self, TileDefError> {
        validate_common(&def.name, def.light_value, def.translucency)?;
        let malformed = |reason: &str| TileDefError::MalformedModel {
            tile: def.name.clone(),
            reason: reason.to_string(),
        };
        let n = def.positions.len();
        if n == 0 || n % 3 != 0 {
            return Err(malformed("vertex count must be a non-zero multiple of 3"));
        }
        if def.normals.as_ref().is_some_and(|v| v.len() != n) {
            return Err(malformed("normal count differs from position count"));
        }
        if def.texcoords.as_ref().is_some_and(|v| v.len() != n) {
            return Err(malformed("texcoord count differs from position count"));
        }
        let region = match def.texture {
            Some(r) if r >= atlas.region_count() => {
                return Err(TileDefError::TextureOutOfAtlas {
                    tile: def.name.clone(),
                    region: r,
                });
            }
            Some(r) => atlas.region(r),
            None => UvRect::default(),
        };

        let mut vertices = VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD);
        let mut bounds = Aabb::new(def.positions[0], def.positions[0]);
        for tri in 0..n / 3 {
            let [a, b, c] = [0, 1, 2].map(|k| def.positions[tri * 3 + k]);
            let face_normal = (b - a).cross(c - a).normalized();
            for k in 0..3 {
                let i = tri * 3 + k;
                let p = def.positions[i];
                bounds.min = bounds.min.min(p);
                bounds.max = bounds.max.max(p);
                let (tu, tv) = def.texcoords.as_ref().map_or((0.0, 0.0), |t| t[i]);
                vertices.push(Vertex {
                    position: p,
                    normal: def.normals.as_ref().map_or(face_normal, |ns| ns[i]),
                    color: def.color,
                    texcoord: (
                        region.u0 + tu * (region.u1 - region.u0),
                        region.v0 + tv * (region.v1 - region.v0),
                    ),
                });
            }
        }

        Ok(TileMesh {
            name: def.name.clone(),
            shape: TileMeshShape::Model,
            opaque_sides: def.opaque_sides & Face::ALL_MASK,
            alpha: def.alpha,
            translucency: def.translucency,
            light_value: def.light_value,
            color: def.color,
            vertices,
            collision_vertices: def.positions.clone(),
            bounds,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn shape(&self) -> &TileMeshShape {
        &self.shape
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.shape, TileMeshShape::Null)
    }

    #[inline]
    pub fn is_cube(&self) -> bool {
        matches!(self.shape, TileMeshShape::Cube { .. })
    }

    /// Cube meshes only; other shapes report no discrete faces.
    #[inline]
    pub fn has_face(&self, face: Face) -> bool {
        match self.shape {
            TileMeshShape::Cube { faces, .. } => face.in_mask(faces),
            _ => false,
        }
    }

    /// Vertex range of a present cube face.
    #[inline]
    pub fn face_vertices(&self, face: Face) -> Option<Range<usize>> {
        match &self.shape {
            TileMeshShape::Cube { ranges, .. } => ranges[face.index()].clone(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_opaque(&self, face: Face) -> bool {
        face.in_mask(self.opaque_sides)
    }

    #[inline]
    pub fn opaque_sides(&self) -> u8 {
        self.opaque_sides
    }

    #[inline]
    pub fn is_alpha(&self) -> bool {
        self.alpha
    }

    #[inline]
    pub fn translucency(&self) -> f32 {
        self.translucency
    }

    #[inline]
    pub fn light_value(&self) -> u8 {
        self.light_value
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    /// Flat triangle list in mesh space, three entries per triangle.
    #[inline]
    pub fn collision_vertices(&self) -> &[Vec3] {
        &self.collision_vertices
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

fn validate_common(name: &str, light: u8, translucency: f32) -> Result<(), TileDefError> {
    if light > LIGHT_VALUE_MAX {
        return Err(TileDefError::LightOutOfRange {
            tile: name.to_string(),
            light,
        });
    }
    if !(0.0..=1.0).contains(&translucency) {
        return Err(TileDefError::TranslucencyOutOfRange {
            tile: name.to_string(),
            translucency,
        });
    }
    Ok(())
}

/// Construction parameters for a cube tile mesh.
///
/// A face is built only when it has a texture region AND its bit is set in `faces`.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeTileMeshDef {
    pub name: String,
    pub textures: [Option<usize>; 6],
    pub faces: u8,
    pub opaque_sides: u8,
    pub light_value: u8,
    pub alpha: bool,
    /// Fraction of light let through when the cube is not opaque.
    pub translucency: f32,
    pub color: Color,
}

impl Default for CubeTileMeshDef {
    fn default() -> Self {
        CubeTileMeshDef {
            name: String::new(),
            textures: [None; 6],
            faces: Face::ALL_MASK,
            opaque_sides: Face::ALL_MASK,
            light_value: 0,
            alpha: false,
            translucency: 1.0,
            color: Color::WHITE,
        }
    }
}

impl CubeTileMeshDef {
    pub fn new(name: impl Into<String>) -> Self {
        CubeTileMeshDef {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Same atlas region on all six faces.
    pub fn all_textures(mut self, region: usize) -> Self {
        self.textures = [Some(region); 6];
        self
    }

    pub fn texture(mut self, face: Face, region: usize) -> Self {
        self.textures[face.index()] = Some(region);
        self
    }

    pub fn faces(mut self, mask: u8) -> Self {
        self.faces = mask;
        self
    }

    pub fn opaque_sides(mut self, mask: u8) -> Self {
        self.opaque_sides = mask;
        self
    }

    pub fn light(mut self, value: u8) -> Self {
        self.light_value = value;
        self
    }

    pub fn alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn translucency(mut self, t: f32) -> Self {
        self.translucency = t;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Construction parameters for a non-cube tile mesh. Positions are in the same
/// origin-centered space as cubes, three per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelTileMeshDef {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex coordinates within the texture region, in `[0,1]`.
    pub texcoords: Option<Vec<(f32, f32)>>,
    pub texture: Option<usize>,
    pub opaque_sides: u8,
    pub light_value: u8,
    pub alpha: bool,
    pub translucency: f32,
    pub color: Color,
}
