//! Project manifest (spritepak.yaml) parsing.
//!
//! The manifest holds export defaults so repeated batch exports do not need
//! the same flags every time. Command-line flags override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PakError, Result};
use crate::export::{EffectChain, Numbering};

/// Manifest file name looked up in the working directory.
pub const MANIFEST_FILENAME: &str = "spritepak.yaml";

/// Project manifest loaded from spritepak.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Base directory for batch exports.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// File-name prefix for exported images.
    #[serde(default)]
    pub prefix: String,

    /// Zero-padding width of exported file names.
    #[serde(default)]
    pub digits: usize,

    /// Number files from this value instead of the entity index.
    #[serde(default)]
    pub increment: Option<u32>,

    /// Use the container's full path in the export directory.
    #[serde(default)]
    pub full_path: bool,

    /// Export every entity by default.
    #[serde(default)]
    pub all: bool,

    /// Post-processing effects, in order (e.g. `canvas`, `scale:2`).
    #[serde(default)]
    pub effects: Vec<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("export")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: default_output(),
            prefix: String::new(),
            digits: 0,
            increment: None,
            full_path: false,
            all: false,
            effects: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from a spritepak.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PakError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `spritepak.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PakError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check spritepak.yaml syntax".to_string()),
        })
    }

    /// Numbering scheme implied by `increment`.
    pub fn numbering(&self) -> Numbering {
        self.increment.map_or(Numbering::Original, Numbering::Increment)
    }

    /// Build the configured effect chain.
    pub fn effect_chain(&self) -> Result<EffectChain> {
        EffectChain::parse(&self.effects)
    }
}
