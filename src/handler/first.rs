//! Version 1 containers: each index record is followed directly by its
//! payload, so the suffix table is empty.

use image::RgbaImage;

use crate::error::Result;
use crate::types::{Album, ColorKind, Colour, Entity, Version};

use super::bytes::ByteReader;
use super::record::{check_index_consumed, finish_album, read_framed_header, read_record, write_record};
use super::{convert_album, encode_entity, insert_blank, render_entity, ContainerHandler, EntityFactory};

/// Handler for [`Version::Ver1`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHandler;

impl ContainerHandler for FirstHandler {
    fn version(&self) -> Version {
        Version::Ver1
    }

    fn decode(&self, bytes: &[u8]) -> Result<Album> {
        let mut reader = ByteReader::new(bytes);
        let header = read_framed_header(&mut reader, Version::Ver1)?;

        let start = reader.position();
        let mut records = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            let (mut entity, declared) = read_record(&mut reader)?;
            if !entity.is_link() {
                entity.set_payload(reader.take(declared)?.to_vec());
            }
            records.push((entity, declared));
        }
        check_index_consumed(start, &reader, &header)?;

        finish_album(&header, records, Vec::new(), bytes)
    }

    fn entity_to_image(&self, album: &Album, entity: &Entity) -> Result<RgbaImage> {
        render_entity(album, entity, false)
    }

    fn image_to_bytes(&self, palette: &[Colour], entity: &Entity, image: &RgbaImage) -> Result<Vec<u8>> {
        encode_entity(palette, entity, image, false)
    }

    fn build_index_table(&self, album: &Album) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for entity in &album.entities {
            write_record(&mut out, entity)?;
            if !entity.is_link() {
                out.extend_from_slice(entity.payload());
            }
        }
        Ok(out)
    }

    fn build_suffix_table(&self, _album: &Album) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn as_factory(&self) -> Option<&dyn EntityFactory> {
        Some(self)
    }
}

impl EntityFactory for FirstHandler {
    fn new_entities(&self, album: &mut Album, count: usize, kind: ColorKind, index: usize) {
        insert_blank(album, count, kind, index);
    }

    fn convert_to_version(&self, album: &mut Album, target: Version) -> Result<()> {
        convert_album(self, album, target)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adjust::adjust;
    use crate::handler::record::HEADER_SIZE;
    use crate::handler::testing::sample_album;

    #[test]
    fn test_round_trip() {
        let mut album = sample_album(Version::Ver1);
        adjust(&FirstHandler, &mut album).unwrap();

        let decoded = FirstHandler.decode(album.data()).unwrap();
        assert_eq!(decoded.count(), 4);
        assert_eq!(decoded.entities, album.entities);
    }

    #[test]
    fn test_payload_lives_in_index_table() {
        let mut album = sample_album(Version::Ver1);
        adjust(&FirstHandler, &mut album).unwrap();

        assert!(FirstHandler.build_suffix_table(&album).unwrap().is_empty());
        assert_eq!(album.length(), HEADER_SIZE + album.info_length as usize);
    }

    #[test]
    fn test_truncated_payload_fails() {
        let mut album = sample_album(Version::Ver1);
        adjust(&FirstHandler, &mut album).unwrap();
        let bytes = &album.data()[..album.length() - 4];
        assert!(FirstHandler.decode(bytes).is_err());
    }

    #[test]
    fn test_images_survive() {
        let mut album = sample_album(Version::Ver1);
        let original = album.entities[0].image().cloned().unwrap();
        adjust(&FirstHandler, &mut album).unwrap();

        let decoded = FirstHandler.decode(album.data()).unwrap();
        let image = FirstHandler.entity_to_image(&decoded, &decoded.entities[0]).unwrap();
        assert_eq!(image, original);
    }
}
