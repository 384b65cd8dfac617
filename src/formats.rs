//! Texture and output format types
//!
//! Type-safe replacements for the string and integer encodings the export
//! front-end hands over: codec formats, quality tiers and output layouts.
//! Quality and layout parse from the command line through `FromStr`.
use crate::error::{ExportError, Result};
use std::fmt;
use std::str::FromStr;

/// Block compression formats understood by the codec contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Opaque colour, 4 bits per texel
    Bc1,
    /// BC1 with 1-bit alpha
    Bc1a,
    /// Explicit 4-bit alpha
    Bc2,
    /// Interpolated 8-bit alpha
    Bc3,
    /// BC3 with the normal X channel stored in alpha
    Bc3n,
    /// BC3 carrying RGBM-encoded colour
    Bc3Rgbm,
    /// Single channel, unsigned
    Bc4,
    /// Single channel, signed
    Bc4s,
    /// Two channels, unsigned
    Bc5,
    /// Two channels, signed
    Bc5s,
    /// High quality RGBA
    Bc7,
}

impl TextureFormat {
    pub fn name(&self) -> &'static str {
        match self {
            TextureFormat::Bc1 => "BC1",
            TextureFormat::Bc1a => "BC1a",
            TextureFormat::Bc2 => "BC2",
            TextureFormat::Bc3 => "BC3",
            TextureFormat::Bc3n => "BC3n",
            TextureFormat::Bc3Rgbm => "BC3_RGBM",
            TextureFormat::Bc4 => "BC4",
            TextureFormat::Bc4s => "BC4S",
            TextureFormat::Bc5 => "BC5",
            TextureFormat::Bc5s => "BC5S",
            TextureFormat::Bc7 => "BC7",
        }
    }

    /// Bytes per 4x4 block
    pub fn block_size(&self) -> u32 {
        match self {
            TextureFormat::Bc1
            | TextureFormat::Bc1a
            | TextureFormat::Bc4
            | TextureFormat::Bc4s => 8,
            _ => 16,
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec speed versus fidelity tradeoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    Fastest,
    #[default]
    Normal,
    Highest,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Fastest => "fastest",
            Quality::Normal => "normal",
            Quality::Highest => "highest",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Quality {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fastest" => Ok(Quality::Fastest),
            "normal" => Ok(Quality::Normal),
            "highest" => Ok(Quality::Highest),
            _ => Err(ExportError::UnsupportedOption(s.to_string())),
        }
    }
}

/// How a finished batch lands on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// One DDS file per input, mirroring the input tree
    #[default]
    Folder,
    /// A single ZIP archive holding every DDS file
    Archive,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Folder => "folder",
            OutputFormat::Archive => "archive",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "folder" | "dir" | "directory" => Ok(OutputFormat::Folder),
            "archive" | "zip" => Ok(OutputFormat::Archive),
            _ => Err(ExportError::UnsupportedOption(s.to_string())),
        }
    }
}
