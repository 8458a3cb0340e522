//! Core data types for spritepak.

mod album;
mod colour;
mod entity;
mod version;

pub use album::Album;
pub use colour::{ColorKind, Colour, Compression};
pub use entity::{Entity, Point};
pub use version::Version;
