//! Texture codec contract and the default block compressor.
//!
//! The driver talks to a codec through two calls: one writing the container
//! header for a whole mip chain, one writing the compressed payload of every
//! level. Both write into an [`OutputSink`], which is either a file on disk or
//! an in-memory buffer.

use crate::dds::{self, DdsHeader};
use crate::error::CodecError;
use crate::formats::{Quality, TextureFormat};
use crate::surface::Surface;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Format and quality handed to the codec for one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub format: TextureFormat,
    pub quality: Quality,
}

impl CompressionOptions {
    pub fn new(format: TextureFormat, quality: Quality) -> Self {
        Self { format, quality }
    }
}

/// A block compression backend.
///
/// Implementations used by the batch exporter must also be `Sync`: the same
/// codec handle is shared by every worker, each writing to its own sink.
/// Wrap codecs that cannot run concurrently in [`Serialized`].
pub trait TextureCodec {
    /// Writes the container header for a chain of `level_count` levels whose
    /// first level is `first`.
    fn output_header(
        &self,
        first: &Surface,
        level_count: u32,
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError>;

    /// Writes the compressed payload of every level, largest first.
    fn compress(
        &self,
        levels: &[Surface],
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError>;
}

/// Where compressed bytes go. Files are created on first write, so a texture
/// that never reaches the codec leaves nothing behind.
#[derive(Debug)]
pub enum OutputSink {
    File {
        path: PathBuf,
        writer: Option<BufWriter<File>>,
    },
    Memory(Vec<u8>),
}

/// A finished sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutput {
    File { path: PathBuf, len: u64 },
    Memory(Vec<u8>),
}

impl SinkOutput {
    pub fn len(&self) -> u64 {
        match self {
            SinkOutput::File { len, .. } => *len,
            SinkOutput::Memory(bytes) => bytes.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            SinkOutput::Memory(bytes) => Some(bytes),
            SinkOutput::File { .. } => None,
        }
    }
}

impl OutputSink {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        OutputSink::File {
            path: path.into(),
            writer: None,
        }
    }

    pub fn memory() -> Self {
        OutputSink::Memory(Vec::new())
    }

    pub fn finish(self) -> io::Result<SinkOutput> {
        match self {
            OutputSink::File { path, writer } => {
                if let Some(mut writer) = writer {
                    if let Err(err) = writer.flush() {
                        drop(writer);
                        remove_partial(&path);
                        return Err(err);
                    }
                }
                let len = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                Ok(SinkOutput::File { path, len })
            }
            OutputSink::Memory(bytes) => Ok(SinkOutput::Memory(bytes)),
        }
    }

    /// Drops the sink after a failed write, deleting its file if one was
    /// created.
    pub fn discard(self) {
        if let OutputSink::File {
            path,
            writer: Some(writer),
        } = self
        {
            drop(writer);
            remove_partial(&path);
        }
    }
}

fn remove_partial(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(output = ?path, "Unable to remove partial output: {}", err);
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::File { path, writer } => {
                let opened = match writer.take() {
                    Some(opened) => opened,
                    None => BufWriter::new(File::create(path.as_path())?),
                };
                writer.insert(opened).write(buf)
            }
            OutputSink::Memory(bytes) => bytes.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::File {
                writer: Some(writer),
                ..
            } => writer.flush(),
            _ => Ok(()),
        }
    }
}

/// DDS writer backed by the `texpresso` block compressor.
///
/// Handles BC1, BC1a, BC2, BC3, BC3n, BC4 and BC5. Stateless, so it is safe
/// to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcCodec;

impl BcCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(format: TextureFormat) -> bool {
        Self::block_format(format).is_some()
    }

    fn block_format(format: TextureFormat) -> Option<texpresso::Format> {
        match format {
            TextureFormat::Bc1 | TextureFormat::Bc1a => Some(texpresso::Format::Bc1),
            TextureFormat::Bc2 => Some(texpresso::Format::Bc2),
            TextureFormat::Bc3 | TextureFormat::Bc3n => Some(texpresso::Format::Bc3),
            TextureFormat::Bc4 => Some(texpresso::Format::Bc4),
            TextureFormat::Bc5 => Some(texpresso::Format::Bc5),
            _ => None,
        }
    }

    fn params(quality: Quality) -> texpresso::Params {
        let algorithm = match quality {
            Quality::Fastest => texpresso::Algorithm::RangeFit,
            Quality::Normal => texpresso::Algorithm::ClusterFit,
            Quality::Highest => texpresso::Algorithm::IterativeClusterFit,
        };
        texpresso::Params {
            algorithm,
            ..Default::default()
        }
    }

    /// RGBA8 texels laid out the way the block format expects them
    fn prepare_texels(level: &Surface, format: TextureFormat) -> Vec<u8> {
        let mut rgba = level.to_rgba8();
        match format {
            TextureFormat::Bc1 => {
                for texel in rgba.chunks_exact_mut(4) {
                    texel[3] = 255;
                }
            }
            TextureFormat::Bc3n => {
                // X goes to alpha, Y stays in green
                for texel in rgba.chunks_exact_mut(4) {
                    let x = texel[0];
                    texel[0] = 255;
                    texel[2] = 0;
                    texel[3] = x;
                }
            }
            _ => {}
        }
        rgba
    }
}

impl TextureCodec for BcCodec {
    fn output_header(
        &self,
        first: &Surface,
        level_count: u32,
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        if !Self::supports(options.format) {
            return Err(CodecError::UnsupportedFormat(options.format));
        }
        let header = DdsHeader::new(first.width(), first.height(), level_count, options.format)?;
        sink.write_all(&header.to_bytes())?;
        Ok(())
    }

    fn compress(
        &self,
        levels: &[Surface],
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        if levels.is_empty() {
            return Err(CodecError::EmptyChain);
        }
        let block_format = Self::block_format(options.format)
            .ok_or(CodecError::UnsupportedFormat(options.format))?;
        let params = Self::params(options.quality);

        for level in levels {
            let (width, height) = (level.width() as usize, level.height() as usize);
            let rgba = Self::prepare_texels(level, options.format);

            let mut blocks = vec![0u8; block_format.compressed_size(width, height)];
            block_format.compress(&rgba, width, height, params, &mut blocks);
            debug_assert_eq!(
                blocks.len(),
                dds::level_size(level.width(), level.height(), options.format) as usize
            );

            sink.write_all(&blocks)?;
        }
        sink.flush()?;
        Ok(())
    }
}

/// Funnels every codec call through a mutex, for backends that are not safe
/// to call from several threads at once. Image loading and mip generation
/// stay parallel; only the codec entry points are serialized.
#[derive(Debug, Default)]
pub struct Serialized<C> {
    inner: Mutex<C>,
}

impl<C> Serialized<C> {
    pub fn new(codec: C) -> Self {
        Self {
            inner: Mutex::new(codec),
        }
    }

    fn lock(&self) -> MutexGuard<'_, C> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: TextureCodec> TextureCodec for Serialized<C> {
    fn output_header(
        &self,
        first: &Surface,
        level_count: u32,
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        self.lock().output_header(first, level_count, options, sink)
    }

    fn compress(
        &self,
        levels: &[Surface],
        options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        self.lock().compress(levels, options, sink)
    }
}
