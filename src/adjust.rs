//! Adjust: recompute derived bookkeeping and rebuild container bytes.
//!
//! Adjust is the only place that writes an album's `count` and `data`. It
//! normalizes every entity first, then assembles the container:
//!
//! ```text
//! legacy:  index table
//! framed:  magic | info length (u64) | version (u32) | count (u32) | index table | suffix table
//! ```

use crate::error::{PakError, Result};
use crate::handler::{ContainerHandler, Header};
use crate::types::Album;

/// Normalize every entity and rebuild `album`'s serialized bytes.
///
/// Running it twice without mutation in between yields identical bytes.
pub fn adjust(handler: &dyn ContainerHandler, album: &mut Album) -> Result<()> {
    if handler.version() != album.version {
        return Err(PakError::encode(format!(
            "Album is {} but the {} handler was supplied",
            album.version,
            handler.version()
        )));
    }

    let palette = &album.palette;
    for entity in album.entities.iter_mut() {
        entity.adjust(|e, image| handler.image_to_bytes(palette, e, image))?;
    }

    let count = album.entities.len();
    let index = handler.build_index_table(album)?;

    let data = if album.version.is_legacy() {
        index
    } else {
        let suffix = handler.build_suffix_table(album)?;
        album.info_length = index.len() as u64;

        let header = Header {
            info_length: album.info_length,
            version: album.version,
            count: u32::try_from(count)
                .map_err(|_| PakError::encode(format!("{} entities do not fit in the header", count)))?,
        };
        let mut data = Vec::with_capacity(crate::handler::HEADER_SIZE + index.len() + suffix.len());
        header.write(&mut data)?;
        data.extend_from_slice(&index);
        data.extend_from_slice(&suffix);
        data
    };

    album.set_serialized(count, data);
    Ok(())
}
