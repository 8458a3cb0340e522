//! Version 2 containers: index records followed by a suffix table holding
//! every payload back to back.

use image::RgbaImage;

use crate::error::Result;
use crate::types::{Album, ColorKind, Colour, Entity, Version};

use super::bytes::ByteReader;
use super::record::{
    check_index_consumed, finish_album, read_framed_header, read_record, read_suffix, write_record,
    write_suffix,
};
use super::{convert_album, encode_entity, insert_blank, render_entity, ContainerHandler, EntityFactory};

/// Handler for [`Version::Ver2`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondHandler;

impl ContainerHandler for SecondHandler {
    fn version(&self) -> Version {
        Version::Ver2
    }

    fn decode(&self, bytes: &[u8]) -> Result<Album> {
        let mut reader = ByteReader::new(bytes);
        let header = read_framed_header(&mut reader, Version::Ver2)?;

        let start = reader.position();
        let mut records = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            records.push(read_record(&mut reader)?);
        }
        check_index_consumed(start, &reader, &header)?;

        read_suffix(&mut reader, &mut records)?;
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
        }
        Ok(out)
    }

    fn build_suffix_table(&self, album: &Album) -> Result<Vec<u8>> {
        Ok(write_suffix(album))
    }

    fn as_factory(&self) -> Option<&dyn EntityFactory> {
        Some(self)
    }
}

impl EntityFactory for SecondHandler {
    fn new_entities(&self, album: &mut Album, count: usize, kind: ColorKind, index: usize) {
        insert_blank(album, count, kind, index);
    }

    fn convert_to_version(&self, album: &mut Album, target: Version) -> Result<()> {
        convert_album(self, album, target)
    }
}
