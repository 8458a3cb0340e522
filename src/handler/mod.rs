//! Container handlers, one per format version.
//!
//! Every handler implements [`ContainerHandler`]: decoding a container,
//! converting entity payloads to and from images, and producing the index
//! and suffix tables that adjust assembles into container bytes. Handlers
//! that also support creating entities or migrating an album to another
//! version expose [`EntityFactory`] through [`ContainerHandler::as_factory`].

mod bytes;
mod first;
mod fourth;
mod legacy;
mod pixels;
mod record;
mod second;

use image::RgbaImage;

use crate::error::{PakError, Result};
use crate::types::{Album, ColorKind, Colour, Compression, Entity, Version};

pub use bytes::ByteReader;
pub use first::FirstHandler;
pub use fourth::FourthHandler;
pub use legacy::LegacyHandler;
pub use pixels::{build_palette, decode_indexed, decode_pixels, encode_indexed, encode_pixels};
pub use record::{sniff_version, Header, HEADER_SIZE, MAGIC};
pub use second::SecondHandler;

/// Largest palette an indexed container can hold.
pub const MAX_PALETTE: usize = 256;

/// Version-specific encode/decode contract.
pub trait ContainerHandler {
    /// Version this handler reads and writes.
    fn version(&self) -> Version;

    /// Parse a whole container into an album.
    fn decode(&self, bytes: &[u8]) -> Result<Album>;

    /// Convert an entity's payload into an image.
    fn entity_to_image(&self, album: &Album, entity: &Entity) -> Result<RgbaImage>;

    /// Convert an image into the entity's payload encoding.
    fn image_to_bytes(&self, palette: &[Colour], entity: &Entity, image: &RgbaImage) -> Result<Vec<u8>>;

    /// Serialize the per-entity index records.
    fn build_index_table(&self, album: &Album) -> Result<Vec<u8>>;

    /// Serialize the per-entity suffix data.
    fn build_suffix_table(&self, album: &Album) -> Result<Vec<u8>>;

    /// Optional editing capability.
    fn as_factory(&self) -> Option<&dyn EntityFactory> {
        None
    }
}

/// Entity creation and version migration, for handlers that support it.
pub trait EntityFactory {
    /// Insert `count` blank entities of `kind` at `index`.
    fn new_entities(&self, album: &mut Album, count: usize, kind: ColorKind, index: usize);

    /// Reinterpret the album as `target`. Payloads are re-encoded on the
    /// next adjust.
    fn convert_to_version(&self, album: &mut Album, target: Version) -> Result<()>;
}

/// Decode an entity shared by the framed handlers.
///
/// Links render their target; `indexed` treats `Argb1555` payloads as
/// palette indices.
pub(crate) fn render_entity(album: &Album, entity: &Entity, indexed: bool) -> Result<RgbaImage> {
    if entity.is_link() {
        let target = entity
            .target
            .and_then(|t| album.get(t))
            .filter(|t| !t.is_link())
            .ok_or_else(|| PakError::decode("Link entity does not resolve to an image"))?;
        return render_entity(album, target, indexed);
    }
    if entity.compression != Compression::None {
        return Err(PakError::Decode {
            message: "Compressed payloads cannot be converted to an image".to_string(),
            help: Some("Only uncompressed entities are supported".to_string()),
        });
    }
    if indexed && entity.kind == ColorKind::Argb1555 {
        return decode_indexed(entity.payload(), entity.width, entity.height, &album.palette);
    }
    decode_pixels(entity.kind, entity.payload(), entity.width, entity.height)
}

/// Encode an image for the framed handlers.
pub(crate) fn encode_entity(palette: &[Colour], entity: &Entity, image: &RgbaImage, indexed: bool) -> Result<Vec<u8>> {
    if indexed && entity.kind == ColorKind::Argb1555 {
        return encode_indexed(image, palette);
    }
    encode_pixels(entity.kind, image)
}

/// Insert blank 1x1 entities.
pub(crate) fn insert_blank(album: &mut Album, count: usize, kind: ColorKind, index: usize) {
    let index = index.min(album.entities.len());
    let blanks = (0..count).map(|_| {
        let mut entity = Entity::new(kind);
        entity.frame_size = (1, 1);
        if kind == ColorKind::Link {
            entity.target = Some(0);
        } else {
            entity.replace_image(RgbaImage::new(1, 1));
        }
        entity
    });
    album.entities.splice(index..index, blanks);
}

/// Migrate an album using `handler` to decode the current payloads.
pub(crate) fn convert_album(handler: &dyn ContainerHandler, album: &mut Album, target: Version) -> Result<()> {
    if album.version == target {
        return Ok(());
    }

    let mut images = Vec::with_capacity(album.entities.len());
    for entity in &album.entities {
        images.push(handler.entity_to_image(album, entity)?);
    }

    if target.is_legacy() {
        for entity in &mut album.entities {
            entity.kind = ColorKind::Argb8888;
            entity.target = None;
        }
    }

    album.palette = if target == Version::Ver4 {
        let indexed = album
            .entities
            .iter()
            .zip(&images)
            .filter(|(e, _)| e.kind == ColorKind::Argb1555)
            .map(|(_, img)| img);
        build_palette(indexed, MAX_PALETTE)?
    } else {
        Vec::new()
    };

    for (entity, image) in album.entities.iter_mut().zip(images) {
        entity.compression = Compression::None;
        if !entity.is_link() {
            entity.replace_image(image);
        }
    }
    album.version = target;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use image::Rgba;

    use super::*;

    /// A small album with a link, mixed kinds and negative placement.
    pub fn sample_album(version: Version) -> Album {
        let mut album = Album::new(version).with_name("sprite/test/body.img", "body.img");
        let kinds: &[ColorKind] = if version.is_legacy() {
            &[ColorKind::Argb8888, ColorKind::Argb8888, ColorKind::Argb8888]
        } else {
            &[ColorKind::Argb8888, ColorKind::Argb4444, ColorKind::Argb1555]
        };
        for (i, &kind) in kinds.iter().enumerate() {
            let i = i as u32;
            let image = RgbaImage::from_fn(2 + i, 3, |x, y| {
                if (x + y) % 2 == 0 {
                    Rgba([255, 0, 0, 255])
                } else {
                    Rgba([0, 0, 255, 255])
                }
            });
            let mut entity = Entity::new(kind).with_location(i as i32 * 10 - 5, 20 + i as i32);
            if !version.is_legacy() {
                entity.frame_size = (64, 64);
            }
            entity.replace_image(image);
            album.entities.push(entity);
        }
        if !version.is_legacy() {
            album.entities.push(Entity::link(1));
        }
        if version == Version::Ver4 {
            album.palette = vec![Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)];
        }
        album
    }
}
