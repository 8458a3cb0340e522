//! Version 4 containers: a shared palette opens the index table and
//! `Argb1555` entities store one palette index per pixel.

use image::RgbaImage;

use crate::error::{PakError, Result};
use crate::types::{Album, ColorKind, Colour, Entity, Version};

use super::bytes::{put_len, ByteReader};
use super::record::{
    check_index_consumed, finish_album, read_framed_header, read_record, read_suffix, write_record,
    write_suffix,
};
use super::{
    convert_album, encode_entity, insert_blank, render_entity, ContainerHandler, EntityFactory, MAX_PALETTE,
};

/// Handler for [`Version::Ver4`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FourthHandler;

fn read_palette(reader: &mut ByteReader<'_>) -> Result<Vec<Colour>> {
    let len = reader.read_u32()? as usize;
    if len > MAX_PALETTE {
        return Err(PakError::decode(format!(
            "Palette of {} colours exceeds the {} colour limit",
            len, MAX_PALETTE
        )));
    }
    let mut palette = Vec::with_capacity(len);
    for _ in 0..len {
        let bgra = reader.take(4)?;
        palette.push(Colour::from_bgra([bgra[0], bgra[1], bgra[2], bgra[3]]));
    }
    Ok(palette)
}

impl ContainerHandler for FourthHandler {
    fn version(&self) -> Version {
        Version::Ver4
    }

    fn decode(&self, bytes: &[u8]) -> Result<Album> {
        let mut reader = ByteReader::new(bytes);
        let header = read_framed_header(&mut reader, Version::Ver4)?;

        let start = reader.position();
        let palette = read_palette(&mut reader)?;
        let mut records = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            records.push(read_record(&mut reader)?);
        }
        check_index_consumed(start, &reader, &header)?;

        read_suffix(&mut reader, &mut records)?;
        finish_album(&header, records, palette, bytes)
    }

    fn entity_to_image(&self, album: &Album, entity: &Entity) -> Result<RgbaImage> {
        render_entity(album, entity, true)
    }

    fn image_to_bytes(&self, palette: &[Colour], entity: &Entity, image: &RgbaImage) -> Result<Vec<u8>> {
        encode_entity(palette, entity, image, true)
    }

    fn build_index_table(&self, album: &Album) -> Result<Vec<u8>> {
        if album.palette.len() > MAX_PALETTE {
            return Err(PakError::encode(format!(
                "Palette of {} colours exceeds the {} colour limit",
                album.palette.len(),
                MAX_PALETTE
            )));
        }
        let mut out = Vec::new();
        put_len(&mut out, album.palette.len(), "palette length")?;
        for colour in &album.palette {
            out.extend_from_slice(&colour.to_bgra());
        }
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

impl EntityFactory for FourthHandler {
    fn new_entities(&self, album: &mut Album, count: usize, kind: ColorKind, index: usize) {
        insert_blank(album, count, kind, index);
    }

    fn convert_to_version(&self, album: &mut Album, target: Version) -> Result<()> {
        convert_album(self, album, target)
    }
}
