//! Album: one loaded container and its entities.

use crate::error::{PakError, Result};

use super::colour::Colour;
use super::entity::Entity;
use super::version::Version;

/// An ordered, editable collection of entities plus container metadata.
///
/// `data` holds the last serialized bytes. It matches `entities` only right
/// after a decode or an adjust; any mutation leaves it stale until the next
/// adjust.
#[derive(Debug, Clone)]
pub struct Album {
    pub version: Version,
    /// Entities in index order.
    pub entities: Vec<Entity>,
    /// Shared palette for indexed (`Ver4`) containers.
    pub palette: Vec<Colour>,
    /// Header field: byte length of the index table.
    pub info_length: u64,
    /// Logical source path, used when deriving export directories.
    pub path: String,
    /// Short name, used when deriving export directories.
    pub name: String,
    count: usize,
    data: Vec<u8>,
}

impl Album {
    /// Create an empty album of the given version.
    pub fn new(version: Version) -> Self {
        Self {
            version,
            entities: Vec::new(),
            palette: Vec::new(),
            info_length: 0,
            path: String::new(),
            name: String::new(),
            count: 0,
            data: Vec::new(),
        }
    }

    /// Builder: set the logical identity.
    pub fn with_name(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        self.path = path.into();
        self.name = name.into();
        self
    }

    /// Entity count as of the last decode or adjust.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Last serialized container bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte length of `data`.
    pub fn length(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Record freshly serialized bytes. Only decode and adjust call this.
    pub(crate) fn set_serialized(&mut self, count: usize, data: Vec<u8>) {
        self.count = count;
        self.data = data;
    }

    /// Copy placement and size from each link's target.
    pub fn resolve_links(&mut self) -> Result<()> {
        for i in 0..self.entities.len() {
            let Some(target) = self.entities[i].target else {
                if self.entities[i].is_link() {
                    return Err(PakError::decode(format!("Link entity {} has no target", i)));
                }
                continue;
            };
            let source = self.entities.get(target).ok_or_else(|| {
                PakError::decode(format!(
                    "Link entity {} points at {} but the album has {} entities",
                    i,
                    target,
                    self.entities.len()
                ))
            })?;
            if source.is_link() {
                return Err(PakError::decode(format!(
                    "Link entity {} points at another link ({})",
                    i, target
                )));
            }
            let (location, width, height, frame_size) =
                (source.location, source.width, source.height, source.frame_size);

            let link = &mut self.entities[i];
            link.location = location;
            link.width = width;
            link.height = height;
            link.frame_size = frame_size;
        }
        Ok(())
    }
}
