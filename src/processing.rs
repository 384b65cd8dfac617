use crate::classify::{classify, FormatDecision};
use crate::codec::{CompressionOptions, OutputSink, SinkOutput, TextureCodec};
use crate::constants::DEFAULT_MAX_RESOLUTION;
use crate::error::{CodecError, ExportError, Result};
use crate::formats::Quality;
use crate::mipmap;
use crate::surface::Surface;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use crate::surface::{needs_resize, target_extent};

/// Per-texture settings shared by every file in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    /// Longest edge allowed; 0 disables the cap
    pub max_resolution: u32,
    pub quality: Quality,
    pub generate_mipmaps: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            max_resolution: DEFAULT_MAX_RESOLUTION,
            quality: Quality::default(),
            generate_mipmaps: true,
        }
    }
}

impl TextureOptions {
    pub fn new(max_resolution: u32, quality: Quality, generate_mipmaps: bool) -> Self {
        Self {
            max_resolution,
            quality,
            generate_mipmaps,
        }
    }
}

/// Outcome of one successfully compressed texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureReport {
    pub input: PathBuf,
    pub decision: FormatDecision,
    pub resized: bool,
    /// Extent of level 0 after the resolution cap
    pub dimensions: (u32, u32),
    pub levels: u32,
    pub original_size: u64,
    pub output: SinkOutput,
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Core per-file pipeline: load -> cap resolution -> classify -> mipmaps ->
/// codec.
///
/// # Arguments
/// * `codec` - Block compressor shared by all workers
/// * `input` - Source image
/// * `sink` - Destination for the DDS bytes
/// * `options` - Resolution cap, quality and mipmap flag
///
/// # Returns
/// * `Ok(TextureReport)` - What was written and how
/// * `Err(ExportError::Load)` - The image could not be read or decoded
/// * `Err(ExportError::FormatUnresolved)` - No suffix rule matched the stem
/// * `Err(ExportError::Compress)` - The codec rejected the header or payload
///
/// The codec is never called when loading or classification fails, and a
/// file sink that fails part way is removed.
pub fn compress_texture<C: TextureCodec + ?Sized>(
    codec: &C,
    input: &Path,
    mut sink: OutputSink,
    options: &TextureOptions,
) -> Result<TextureReport> {
    let mut surface = Surface::load(input).map_err(|source| ExportError::Load {
        path: input.to_path_buf(),
        source,
    })?;
    let original_size = fs::metadata(input).map(|m| m.len()).unwrap_or(0);

    let resized = surface.resize_max_extent(options.max_resolution);

    let stem = file_stem(input);
    let decision = classify(&stem, surface.has_alpha())
        .ok_or_else(|| ExportError::FormatUnresolved(input.to_path_buf()))?;

    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());
    info!(
        file = %file_name,
        format = %decision.format,
        resized,
        premultiply_alpha = decision.premultiply_alpha,
        "+ {} ({}, {})",
        file_name,
        decision.format,
        if resized { "resizing" } else { "no resize" }
    );

    let dimensions = surface.dimensions();
    let chain = if options.generate_mipmaps {
        mipmap::build_chain(surface, decision.premultiply_alpha)
    } else {
        vec![surface]
    };

    let compression = CompressionOptions::new(decision.format, options.quality);
    let compress_error = |source: CodecError| ExportError::Compress {
        path: input.to_path_buf(),
        source,
    };

    // A half-written file must not stay behind under its final name
    let written = codec
        .output_header(&chain[0], chain.len() as u32, &compression, &mut sink)
        .and_then(|_| codec.compress(&chain, &compression, &mut sink));
    if let Err(source) = written {
        sink.discard();
        return Err(compress_error(source));
    }
    let output = sink
        .finish()
        .map_err(|e| compress_error(CodecError::Io(e)))?;

    Ok(TextureReport {
        input: input.to_path_buf(),
        decision,
        resized,
        dimensions,
        levels: chain.len() as u32,
        original_size,
        output,
    })
}
