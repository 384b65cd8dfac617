use crate::formats::TextureFormat;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unable to load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unable to guess format for {0:?}")]
    FormatUnresolved(PathBuf),

    #[error("Error compressing {path:?}: {source}")]
    Compress {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Duplicate output path {output:?} for input {input:?}")]
    DuplicateOutputPath { input: PathBuf, output: PathBuf },

    #[error("Input directory does not exist or is not readable: {0:?}")]
    InputRootInvalid(PathBuf),

    #[error("Invalid product name: {0:?}")]
    InvalidProductName(String),

    #[error("Unsupported option value: {0}")]
    UnsupportedOption(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failures the codec reports while writing a texture
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{0} is not supported by this codec")]
    UnsupportedFormat(TextureFormat),

    #[error("No images to compress")]
    EmptyChain,

    #[error("Invalid texture dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-file failure categories counted in the batch summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Load,
    FormatUnresolved,
    Compress,
    Archive,
}

impl ExportError {
    /// Category of a per-file failure. `None` for errors that stop a batch
    /// before any work starts, and for duplicate outputs, which are dropped
    /// during discovery and counted on their own.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ExportError::Load { .. } => Some(FailureKind::Load),
            ExportError::FormatUnresolved(_) => Some(FailureKind::FormatUnresolved),
            ExportError::Compress { .. } => Some(FailureKind::Compress),
            ExportError::Archive(_) => Some(FailureKind::Archive),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
