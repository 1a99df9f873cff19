//! Map persistence: packed tile records, JSON map documents and the file system seam.
#![forbid(unsafe_code)]

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use blockscape_chunk::TileChunk;
use blockscape_lighting::LightingMode;
use blockscape_tiles::{Tile, TileMeshCollection};
use blockscape_world::{ChunkCoord, TileMap};

mod document;
mod error;
mod fs;
mod serializer;

pub use document::MapDocument;
pub use error::MapIoError;
pub use fs::{FileSystem, StdFileSystem};
pub use serializer::{TILE_RECORD_SIZE, TileDataSerializer};

/// A chunk's tiles as one blob of records in row-major order.
pub fn chunk_to_bytes(chunk: &TileChunk) -> Vec<u8> {
    TileDataSerializer::tiles_to_bytes(chunk.tiles())
}

/// Snapshot of `map` as a document, tagged with the lighting mode to restore.
pub fn map_to_document(map: &TileMap, lighting: LightingMode) -> MapDocument {
    let c = map.config();
    MapDocument {
        chunk_width: c.chunk_width,
        chunk_height: c.chunk_height,
        chunk_depth: c.chunk_depth,
        width_in_chunks: c.width_in_chunks,
        height_in_chunks: c.height_in_chunks,
        depth_in_chunks: c.depth_in_chunks,
        ambient_light: map.ambient_light(),
        sky_light: map.sky_light(),
        lighting_mode: lighting.tag().map(str::to_string),
        chunks: map
            .chunks()
            .iter()
            .map(|ch| STANDARD.encode(chunk_to_bytes(ch)))
            .collect(),
    }
}

/// Rebuilds a map from a document. The lighter named by the document is installed on
/// the map; every chunk starts dirty so the first update relights and remeshes.
pub fn map_from_document(
    doc: &MapDocument,
    meshes: Arc<TileMeshCollection>,
) -> Result<(TileMap, LightingMode), MapIoError> {
    let lighting = LightingMode::from_tag(doc.lighting_mode.as_deref())?;
    let config = doc.config();
    if !config.is_valid() {
        return Err(MapIoError::InvalidConfig(format!("{config:?}")));
    }
    if doc.chunks.len() != config.chunk_count() {
        return Err(MapIoError::ChunkCount {
            expected: config.chunk_count(),
            found: doc.chunks.len(),
        });
    }

    let expected = config
        .tiles_per_chunk()
        .checked_mul(TILE_RECORD_SIZE)
        .ok_or_else(|| MapIoError::InvalidConfig(format!("{config:?}")))?;
    let mut decoded: Vec<Vec<Tile>> = Vec::with_capacity(doc.chunks.len());
    for (i, blob) in doc.chunks.iter().enumerate() {
        let bytes = STANDARD
            .decode(blob)
            .map_err(|source| MapIoError::Base64 { chunk: i, source })?;
        if bytes.len() != expected {
            return Err(MapIoError::ChunkLength {
                chunk: i,
                expected,
                found: bytes.len(),
            });
        }
        let tiles = TileDataSerializer::tiles_from_bytes(&bytes).ok_or(MapIoError::ChunkLength {
            chunk: i,
            expected,
            found: bytes.len(),
        })?;
        if let Some(t) = tiles.iter().find(|t| !meshes.contains_index(t.index)) {
            return Err(MapIoError::UnknownTileIndex {
                chunk: i,
                index: t.index,
            });
        }
        decoded.push(tiles);
    }

    let mut map = TileMap::new(config, meshes);
    let coords: Vec<ChunkCoord> = map.chunk_coords().collect();
    for (coord, tiles) in coords.into_iter().zip(decoded) {
        if let Some(chunk) = map.chunk_mut(coord) {
            chunk.tiles_mut().copy_from_slice(&tiles);
        }
    }
    map.set_lighter(lighting.lighter());
    Ok((map, lighting))
}

pub fn save_map<F: FileSystem + ?Sized>(
    fs: &F,
    path: &str,
    map: &TileMap,
    lighting: LightingMode,
) -> Result<(), MapIoError> {
    let t0 = Instant::now();
    let doc = map_to_document(map, lighting);
    let mut writer = fs.create(path)?;
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writer.flush()?;
    log::info!(
        target: "io",
        "saved map '{}' chunks={} lighting={:?} ms={}",
        path,
        doc.chunks.len(),
        lighting,
        t0.elapsed().as_millis()
    );
    Ok(())
}

pub fn load_map<F: FileSystem + ?Sized>(
    fs: &F,
    path: &str,
    meshes: Arc<TileMeshCollection>,
) -> Result<(TileMap, LightingMode), MapIoError> {
    let t0 = Instant::now();
    let reader = fs.open(path)?;
    let doc: MapDocument = serde_json::from_reader(reader)?;
    let (map, lighting) = map_from_document(&doc, meshes)?;
    log::info!(
        target: "io",
        "loaded map '{}' chunks={} lighting={:?} ms={}",
        path,
        doc.chunks.len(),
        lighting,
        t0.elapsed().as_millis()
    );
    Ok((map, lighting))
}
