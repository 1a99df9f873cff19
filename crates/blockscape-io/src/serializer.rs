use std::io::{self, Read, Write};

use blockscape_geom::Color;
use blockscape_tiles::Tile;

/// Size of one packed tile record.
pub const TILE_RECORD_SIZE: usize = 17;

/// Packs tiles into the fixed little-endian record:
/// `index u16, flags u16, tile_light, sky_light, rotation, parent offset x/y/z,
/// parent width/height/depth (u8 each), color u32`.
pub struct TileDataSerializer;

impl TileDataSerializer {
    pub fn encode(tile: &Tile) -> [u8; TILE_RECORD_SIZE] {
        let mut out = [0u8; TILE_RECORD_SIZE];
        out[0..2].copy_from_slice(&tile.index.to_le_bytes());
        out[2..4].copy_from_slice(&tile.flags.to_le_bytes());
        out[4] = tile.tile_light;
        out[5] = tile.sky_light;
        out[6] = tile.rotation;
        out[7] = tile.parent_offset_x;
        out[8] = tile.parent_offset_y;
        out[9] = tile.parent_offset_z;
        out[10] = tile.parent_width;
        out[11] = tile.parent_height;
        out[12] = tile.parent_depth;
        out[13..17].copy_from_slice(&tile.color.packed().to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8; TILE_RECORD_SIZE]) -> Tile {
        Tile {
            index: u16::from_le_bytes([bytes[0], bytes[1]]),
            flags: u16::from_le_bytes([bytes[2], bytes[3]]),
            tile_light: bytes[4],
            sky_light: bytes[5],
            rotation: bytes[6],
            parent_offset_x: bytes[7],
            parent_offset_y: bytes[8],
            parent_offset_z: bytes[9],
            parent_width: bytes[10],
            parent_height: bytes[11],
            parent_depth: bytes[12],
            color: Color::from_packed(u32::from_le_bytes([
                bytes[13], bytes[14], bytes[15], bytes[16],
            ])),
        }
    }

    pub fn write_tile<W: Write>(w: &mut W, tile: &Tile) -> io::Result<()> {
        w.write_all(&Self::encode(tile))
    }

    pub fn read_tile<R: Read>(r: &mut R) -> io::Result<Tile> {
        let mut buf = [0u8; TILE_RECORD_SIZE];
        r.read_exact(&mut buf)?;
        Ok(Self::decode(&buf))
    }

    /// Records for `tiles`, back to back in the order given.
    pub fn tiles_to_bytes(tiles: &[Tile]) -> Vec<u8> {
        let mut out = Vec::with_capacity(tiles.len() * TILE_RECORD_SIZE);
        for t in tiles {
            out.extend_from_slice(&Self::encode(t));
        }
        out
    }

    /// Splits `bytes` into records. `None` when the length is not a whole number of
    /// records.
    pub fn tiles_from_bytes(bytes: &[u8]) -> Option<Vec<Tile>> {
        if bytes.len() % TILE_RECORD_SIZE != 0 {
            return None;
        }
        let tiles = bytes
            .chunks_exact(TILE_RECORD_SIZE)
            .map(|c| {
                let mut rec = [0u8; TILE_RECORD_SIZE];
                rec.copy_from_slice(c);
                Self::decode(&rec)
            })
            .collect();
        Some(tiles)
    }
}
