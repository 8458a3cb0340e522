//! Header framing and per-entity index records shared by framed versions.

use crate::error::{PakError, Result};
use crate::types::{Album, ColorKind, Compression, Entity, Point, Version};

use super::bytes::{put_i32, put_len, put_u32, put_u64, ByteReader};

/// Magic flag that opens every framed container.
pub const MAGIC: &[u8; 16] = b"Neople Img File\0";

/// Magic flag + info length + version tag + entity count.
pub const HEADER_SIZE: usize = MAGIC.len() + 8 + 4 + 4;

/// Smallest possible index record (a link).
pub const MIN_RECORD_SIZE: usize = 8;

/// Size of a full (non-link) index record.
pub const RECORD_SIZE: usize = 36;

/// Fixed header of a framed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub info_length: u64,
    pub version: Version,
    pub count: u32,
}

impl Header {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let magic = reader.take(MAGIC.len())?;
        if magic != MAGIC {
            return Err(PakError::Decode {
                message: "Magic flag mismatch".to_string(),
                help: Some("The file is not a framed sprite container".to_string()),
            });
        }
        let info_length = reader.read_u64()?;
        let version = Version::from_tag(reader.read_u32()?)?;
        let count = reader.read_u32()?;
        Ok(Self {
            info_length,
            version,
            count,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let tag = self.version.tag().ok_or_else(|| {
            PakError::encode(format!("Version {} has no header", self.version))
        })?;
        out.extend_from_slice(MAGIC);
        put_u64(out, self.info_length);
        put_u32(out, tag);
        put_u32(out, self.count);
        Ok(())
    }
}

/// Determine the version of raw container bytes.
///
/// Input starting with the magic flag is framed and carries its own tag;
/// anything else is the header-less legacy layout.
pub fn sniff_version(bytes: &[u8]) -> Result<Version> {
    if !bytes.starts_with(MAGIC) {
        return Ok(Version::Legacy);
    }
    let mut reader = ByteReader::new(bytes);
    Header::read(&mut reader).map(|h| h.version)
}

/// Read the header and check it against the handler's version.
pub fn read_framed_header(reader: &mut ByteReader<'_>, expected: Version) -> Result<Header> {
    let header = Header::read(reader)?;
    if header.version != expected {
        return Err(PakError::decode(format!(
            "Container is {} but was handed to the {} decoder",
            header.version, expected
        )));
    }
    let index_bytes = usize::try_from(header.info_length).unwrap_or(usize::MAX);
    if index_bytes > reader.remaining() {
        return Err(PakError::decode(format!(
            "Index table of {} bytes exceeds the {} bytes available",
            header.info_length,
            reader.remaining()
        )));
    }
    if (header.count as usize).saturating_mul(MIN_RECORD_SIZE) > index_bytes {
        return Err(PakError::decode(format!(
            "Header declares {} entities but the index table holds only {} bytes",
            header.count, header.info_length
        )));
    }
    Ok(header)
}

/// Fail unless exactly `info_length` bytes of index table were consumed.
pub fn check_index_consumed(start: usize, reader: &ByteReader<'_>, header: &Header) -> Result<()> {
    let consumed = (reader.position() - start) as u64;
    if consumed != header.info_length {
        return Err(PakError::decode(format!(
            "Index table length mismatch: header says {} bytes, parsed {}",
            header.info_length, consumed
        )));
    }
    Ok(())
}

/// Read one index record, returning the entity and its declared payload
/// length. The payload itself is attached by the caller.
pub fn read_record(reader: &mut ByteReader<'_>) -> Result<(Entity, usize)> {
    let kind = ColorKind::from_tag(reader.read_i32()?)?;
    if kind == ColorKind::Link {
        let target = reader.read_len("link target")?;
        return Ok((Entity::link(target as usize), 0));
    }

    let compression = Compression::from_tag(reader.read_i32()?)?;
    let width = reader.read_len("width")?;
    let height = reader.read_len("height")?;
    let length = reader.read_len("payload length")?;
    let x = reader.read_i32()?;
    let y = reader.read_i32()?;
    let frame_width = reader.read_len("frame width")?;
    let frame_height = reader.read_len("frame height")?;

    let mut entity = Entity::new(kind).with_size(width, height);
    entity.compression = compression;
    entity.location = Point::new(x, y);
    entity.frame_size = (frame_width, frame_height);
    Ok((entity, length as usize))
}

/// Write one index record.
pub fn write_record(out: &mut Vec<u8>, entity: &Entity) -> Result<()> {
    put_i32(out, entity.kind.tag());
    if entity.is_link() {
        let target = entity
            .target
            .ok_or_else(|| PakError::encode("Link entity without a target"))?;
        return put_len(out, target, "link target");
    }
    put_i32(out, entity.compression.tag());
    put_len(out, entity.width as usize, "width")?;
    put_len(out, entity.height as usize, "height")?;
    put_len(out, entity.payload().len(), "payload length")?;
    put_i32(out, entity.location.x);
    put_i32(out, entity.location.y);
    put_len(out, entity.frame_size.0 as usize, "frame width")?;
    put_len(out, entity.frame_size.1 as usize, "frame height")?;
    Ok(())
}

/// Attach payloads from a suffix table, in entity order.
pub fn read_suffix(reader: &mut ByteReader<'_>, entities: &mut [(Entity, usize)]) -> Result<()> {
    for (entity, declared) in entities.iter_mut() {
        if entity.is_link() {
            continue;
        }
        let bytes = reader.take(*declared)?;
        entity.set_payload(bytes.to_vec());
    }
    Ok(())
}

/// Concatenate every non-link payload, in entity order.
pub fn write_suffix(album: &Album) -> Vec<u8> {
    album
        .entities
        .iter()
        .filter(|e| !e.is_link())
        .flat_map(|e| e.payload().iter().copied())
        .collect()
}

/// Assemble a decoded album and record the input as its serialized form.
pub fn finish_album(
    header: &Header,
    records: Vec<(Entity, usize)>,
    palette: Vec<crate::types::Colour>,
    bytes: &[u8],
) -> Result<Album> {
    let mut album = Album::new(header.version);
    album.info_length = header.info_length;
    album.palette = palette;
    album.entities = records.into_iter().map(|(entity, _)| entity).collect();
    album.resolve_links()?;
    album.set_serialized(album.entities.len(), bytes.to_vec());
    Ok(album)
}
