//! A single packed sub-image.

use image::RgbaImage;
use serde::Serialize;

use crate::error::Result;

use super::colour::{ColorKind, Compression};

/// Integer placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One packed sub-image plus its placement metadata.
///
/// The encoded payload is authoritative. A decoded image may be cached
/// alongside it; writing the payload drops that cache. Assigning a new image
/// through [`Entity::replace_image`] marks the payload stale until the next
/// adjust re-encodes it.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: ColorKind,
    pub compression: Compression,
    pub location: Point,
    pub width: u32,
    pub height: u32,
    /// Canvas size the sprite is placed on.
    pub frame_size: (u32, u32),
    /// Target index for `Link` entities.
    pub target: Option<usize>,
    length: usize,
    payload: Vec<u8>,
    image: Option<RgbaImage>,
    stale: bool,
}

impl Entity {
    /// Create an empty entity of the given kind.
    pub fn new(kind: ColorKind) -> Self {
        Self {
            kind,
            compression: Compression::None,
            location: Point::default(),
            width: 0,
            height: 0,
            frame_size: (0, 0),
            target: None,
            length: 0,
            payload: Vec::new(),
            image: None,
            stale: false,
        }
    }

    /// Create a link entity pointing at `target`.
    pub fn link(target: usize) -> Self {
        Self {
            target: Some(target),
            ..Self::new(ColorKind::Link)
        }
    }

    /// Builder: set the encoded payload.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.set_payload(payload);
        self
    }

    /// Builder: set the dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the location.
    pub fn with_location(mut self, x: i32, y: i32) -> Self {
        self.location = Point::new(x, y);
        self
    }

    pub fn is_link(&self) -> bool {
        self.kind == ColorKind::Link
    }

    /// Encoded payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length as recorded by the last adjust (or decode).
    pub fn length(&self) -> usize {
        self.length
    }

    /// Replace the encoded payload, invalidating any cached image.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.length = payload.len();
        self.payload = payload;
        self.image = None;
        self.stale = false;
    }

    /// Cached decoded image, if materialized.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Store a decoded image that matches the current payload.
    pub fn cache_image(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    /// Assign a new image. The payload is re-encoded on the next adjust.
    pub fn replace_image(&mut self, image: RgbaImage) {
        self.width = image.width();
        self.height = image.height();
        self.image = Some(image);
        self.stale = true;
    }

    /// True when an assigned image has not been encoded yet.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Recompute entity-local bookkeeping.
    ///
    /// A stale image is encoded with `encode`; the length then tracks the
    /// payload and the size tracks the cached image.
    pub fn adjust<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&Entity, &RgbaImage) -> Result<Vec<u8>>,
    {
        if self.is_link() {
            self.payload.clear();
            self.length = 0;
            self.stale = false;
            return Ok(());
        }

        if self.stale {
            if let Some(image) = &self.image {
                let bytes = encode(self, image)?;
                self.payload = bytes;
            }
            self.stale = false;
        }

        if let Some(image) = &self.image {
            self.width = image.width();
            self.height = image.height();
        }
        self.length = self.payload.len();

        Ok(())
    }
}

/// Equality compares the encoded state; the image cache is ignored, and
/// links compare by target only since their geometry is borrowed.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        if self.is_link() || other.is_link() {
            return self.kind == other.kind && self.target == other.target;
        }
        self.kind == other.kind
            && self.compression == other.compression
            && self.location == other.location
            && self.width == other.width
            && self.height == other.height
            && self.frame_size == other.frame_size
            && self.target == other.target
            && self.payload == other.payload
    }
}

impl Eq for Entity {}
