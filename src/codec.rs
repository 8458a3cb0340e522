//! Codec facade: version dispatch, adjust and image access over a registry.

use std::fs;
use std::path::Path;

use image::RgbaImage;

use crate::adjust::adjust;
use crate::error::{PakError, Result};
use crate::handler::{sniff_version, ContainerHandler};
use crate::registry::VersionRegistry;
use crate::types::{Album, ColorKind, Version};

/// Entry point for loading, adjusting and saving albums.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: VersionRegistry,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(VersionRegistry::with_defaults())
    }
}

impl Codec {
    pub fn new(registry: VersionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Construct the handler for `version`.
    pub fn handler(&self, version: Version) -> Result<Box<dyn ContainerHandler>> {
        self.registry.handler(version)
    }

    /// Decode container bytes, dispatching on the sniffed version.
    pub fn load(&self, bytes: &[u8]) -> Result<Album> {
        let version = sniff_version(bytes)?;
        self.handler(version)?.decode(bytes)
    }

    /// Read and decode a container file.
    pub fn load_file(&self, path: &Path) -> Result<Album> {
        let bytes = fs::read(path).map_err(|e| PakError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read container: {}", e),
        })?;
        let mut album = self.load(&bytes)?;
        album.path = path.to_string_lossy().replace('\\', "/");
        album.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(album)
    }

    /// Run adjust with the album's own handler.
    pub fn adjust(&self, album: &mut Album) -> Result<()> {
        let handler = self.handler(album.version)?;
        adjust(handler.as_ref(), album)
    }

    /// Adjust, then write the container bytes to `path`.
    pub fn save_file(&self, album: &mut Album, path: &Path) -> Result<()> {
        self.adjust(album)?;
        fs::write(path, album.data()).map_err(|e| PakError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write container: {}", e),
        })
    }

    /// Decoded image of entity `index`, cached on the entity.
    pub fn image(&self, album: &mut Album, index: usize) -> Result<RgbaImage> {
        let entity = album.get(index).ok_or_else(|| PakError::Parse {
            message: format!("Entity {} out of range (album has {})", index, album.len()),
            help: None,
        })?;
        if let Some(image) = entity.image() {
            return Ok(image.clone());
        }

        let handler = self.handler(album.version)?;
        let image = handler.entity_to_image(album, entity)?;
        album.entities[index].cache_image(image.clone());
        Ok(image)
    }

    /// Insert blank entities when the album's handler supports it.
    ///
    /// Returns `false` when the handler has no entity factory.
    pub fn new_entities(&self, album: &mut Album, count: usize, kind: ColorKind, index: usize) -> Result<bool> {
        let handler = self.handler(album.version)?;
        match handler.as_factory() {
            Some(factory) => {
                factory.new_entities(album, count, kind, index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Migrate an album to `target` and adjust it with the target handler.
    pub fn convert(&self, album: &mut Album, target: Version) -> Result<()> {
        let target_handler = self.handler(target)?;
        let handler = self.handler(album.version)?;
        let factory = handler.as_factory().ok_or_else(|| PakError::Encode {
            message: format!("{} albums cannot be converted", album.version),
            help: Some("Only ver1, ver2 and ver4 albums support conversion".to_string()),
        })?;
        factory.convert_to_version(album, target)?;
        adjust(target_handler.as_ref(), album)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::handler::testing::sample_album;

    #[test]
    fn test_load_dispatches_on_version() {
        let codec = Codec::default();
        for version in [Version::Legacy, Version::Ver1, Version::Ver2, Version::Ver4] {
            let mut album = sample_album(version);
            codec.adjust(&mut album).unwrap();

            let loaded = codec.load(album.data()).unwrap();
            assert_eq!(loaded.version, version);
            assert_eq!(loaded.entities, album.entities);
        }
    }

    #[test]
    fn test_load_unregistered_version() {
        let codec = Codec::default();
        let mut bytes = Vec::new();
        crate::handler::Header {
            info_length: 0,
            version: Version::Ver5,
            count: 0,
        }
        .write(&mut bytes)
        .unwrap();

        let err = codec.load(&bytes).err().unwrap();
        assert!(matches!(err, PakError::UnknownVersion { .. }));
    }

    #[test]
    fn test_file_round_trip_sets_identity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("body.img");
        let codec = Codec::default();

        let mut album = sample_album(Version::Ver2);
        codec.save_file(&mut album, &path).unwrap();

        let loaded = codec.load_file(&path).unwrap();
        assert_eq!(loaded.name, "body.img");
        assert!(loaded.path.ends_with("/body.img"));
        assert_eq!(loaded.count(), 4);
    }

    #[test]
    fn test_image_is_cached() {
        let codec = Codec::default();
        let mut album = sample_album(Version::Ver2);
        codec.adjust(&mut album).unwrap();
        let mut loaded = codec.load(album.data()).unwrap();

        assert!(loaded.entities[0].image().is_none());
        let image = codec.image(&mut loaded, 0).unwrap();
        assert_eq!(loaded.entities[0].image(), Some(&image));
        assert!(codec.image(&mut loaded, 10).is_err());
    }

    #[test]
    fn test_new_entities_probes_capability() {
        let codec = Codec::default();
        let mut legacy = Album::new(Version::Legacy);
        assert!(!codec.new_entities(&mut legacy, 2, ColorKind::Argb8888, 0).unwrap());
        assert!(legacy.is_empty());

        let mut album = Album::new(Version::Ver2);
        assert!(codec.new_entities(&mut album, 2, ColorKind::Argb8888, 0).unwrap());
        assert_eq!(album.len(), 2);
    }

    #[test]
    fn test_convert_rewrites_data() {
        let codec = Codec::default();
        let mut album = sample_album(Version::Ver2);
        codec.adjust(&mut album).unwrap();

        codec.convert(&mut album, Version::Ver1).unwrap();
        assert_eq!(album.version, Version::Ver1);

        let loaded = codec.load(album.data()).unwrap();
        assert_eq!(loaded.version, Version::Ver1);
        assert_eq!(loaded.entities, album.entities);
    }

    #[test]
    fn test_convert_from_legacy_is_unsupported() {
        let codec = Codec::default();
        let mut album = sample_album(Version::Legacy);
        codec.adjust(&mut album).unwrap();
        assert!(codec.convert(&mut album, Version::Ver2).is_err());
    }
}
