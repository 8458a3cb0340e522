//! Header-less legacy containers.
//!
//! The whole container is the index table: a run of
//! `width, height, x, y, length` records, each followed by an `Argb8888`
//! payload, until the end of input.

use image::RgbaImage;

use crate::error::{PakError, Result};
use crate::types::{Album, ColorKind, Colour, Entity, Point, Version};

use super::bytes::{put_i32, put_len, put_u32, ByteReader};
use super::pixels::expected_len;
use super::{decode_pixels, encode_pixels, ContainerHandler};

/// Size of a legacy record before its payload.
const LEGACY_RECORD_SIZE: usize = 20;

/// Handler for [`Version::Legacy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyHandler;

fn require_truecolour(entity: &Entity) -> Result<()> {
    if entity.kind != ColorKind::Argb8888 {
        return Err(PakError::Encode {
            message: format!("Legacy containers only hold argb8888 entities, found {}", entity.kind),
            help: Some("Convert the album to legacy first".to_string()),
        });
    }
    Ok(())
}

impl ContainerHandler for LegacyHandler {
    fn version(&self) -> Version {
        Version::Legacy
    }

    fn decode(&self, bytes: &[u8]) -> Result<Album> {
        let mut reader = ByteReader::new(bytes);
        let mut album = Album::new(Version::Legacy);

        while !reader.is_empty() {
            if reader.remaining() < LEGACY_RECORD_SIZE {
                return Err(PakError::decode(format!(
                    "Partial legacy record at offset {}",
                    reader.position()
                )));
            }
            let width = reader.read_u32()?;
            let height = reader.read_u32()?;
            let x = reader.read_i32()?;
            let y = reader.read_i32()?;
            let length = reader.read_u32()? as usize;
            let expected = expected_len(width, height, ColorKind::Argb8888.bytes_per_pixel())?;
            if length != expected {
                return Err(PakError::decode(format!(
                    "Legacy record at offset {} declares {} bytes for a {}x{} image ({} expected)",
                    reader.position() - LEGACY_RECORD_SIZE,
                    length,
                    width,
                    height,
                    expected
                )));
            }
            let payload = reader.take(length)?.to_vec();

            let mut entity = Entity::new(ColorKind::Argb8888)
                .with_size(width, height)
                .with_payload(payload);
            entity.location = Point::new(x, y);
            album.entities.push(entity);
        }

        album.set_serialized(album.entities.len(), bytes.to_vec());
        Ok(album)
    }

    fn entity_to_image(&self, _album: &Album, entity: &Entity) -> Result<RgbaImage> {
        decode_pixels(ColorKind::Argb8888, entity.payload(), entity.width, entity.height)
    }

    fn image_to_bytes(&self, _palette: &[Colour], entity: &Entity, image: &RgbaImage) -> Result<Vec<u8>> {
        require_truecolour(entity)?;
        encode_pixels(ColorKind::Argb8888, image)
    }

    fn build_index_table(&self, album: &Album) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for entity in &album.entities {
            require_truecolour(entity)?;
            put_u32(&mut out, entity.width);
            put_u32(&mut out, entity.height);
            put_i32(&mut out, entity.location.x);
            put_i32(&mut out, entity.location.y);
            put_len(&mut out, entity.payload().len(), "payload length")?;
            out.extend_from_slice(entity.payload());
        }
        Ok(out)
    }

    fn build_suffix_table(&self, _album: &Album) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
