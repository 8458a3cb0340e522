//! spritepak - Sprite album container codec
//!
//! A library for reading, editing and writing versioned sprite-sheet
//! containers, and for exporting their entities as PNG files.

pub mod adjust;
pub mod cli;
pub mod codec;
pub mod error;
pub mod export;
pub mod handler;
pub mod manifest;
pub mod output;
pub mod registry;
pub mod types;

pub use adjust::adjust;
pub use codec::Codec;
pub use error::{PakError, Result};
pub use export::{EffectChain, ExportCommand, ExportMode, ExportOptions, ExportReport, Numbering};
pub use handler::{ContainerHandler, EntityFactory, FirstHandler, FourthHandler, LegacyHandler, SecondHandler};
pub use manifest::Manifest;
pub use registry::{HandlerFactory, VersionRegistry};
pub use types::{Album, ColorKind, Colour, Compression, Entity, Point, Version};
