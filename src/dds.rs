//! DDS container header.

use crate::error::CodecError;
use crate::formats::TextureFormat;

pub const DDS_MAGIC: [u8; 4] = *b"DDS ";
pub const DDS_HEADER_SIZE: u32 = 124;
pub const DDS_PIXEL_FORMAT_SIZE: u32 = 32;
/// Magic plus header
pub const DDS_FILE_HEADER_LEN: usize = 128;

pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;

pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_NORMAL: u32 = 0x8000_0000;

pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x40_0000;

/// FourCC code for formats expressible in the legacy header
pub fn fourcc(format: TextureFormat) -> Option<[u8; 4]> {
    match format {
        TextureFormat::Bc1 | TextureFormat::Bc1a => Some(*b"DXT1"),
        TextureFormat::Bc2 => Some(*b"DXT3"),
        TextureFormat::Bc3 | TextureFormat::Bc3n => Some(*b"DXT5"),
        TextureFormat::Bc4 => Some(*b"ATI1"),
        TextureFormat::Bc5 => Some(*b"ATI2"),
        _ => None,
    }
}

/// Size in bytes of one compressed level
pub fn level_size(width: u32, height: u32, format: TextureFormat) -> u32 {
    width.max(1).div_ceil(4) * height.max(1).div_ceil(4) * format.block_size()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub mipmap_count: u32,
    pub pixel_flags: u32,
    pub fourcc: [u8; 4],
    pub caps: u32,
}

impl DdsHeader {
    pub fn new(
        width: u32,
        height: u32,
        mipmap_count: u32,
        format: TextureFormat,
    ) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions(width, height));
        }
        let fourcc = fourcc(format).ok_or(CodecError::UnsupportedFormat(format))?;

        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE;
        let mut caps = DDSCAPS_TEXTURE;
        if mipmap_count > 1 {
            flags |= DDSD_MIPMAPCOUNT;
            caps |= DDSCAPS_COMPLEX | DDSCAPS_MIPMAP;
        }

        let mut pixel_flags = DDPF_FOURCC;
        if format == TextureFormat::Bc3n {
            pixel_flags |= DDPF_NORMAL;
        }

        Ok(Self {
            flags,
            height,
            width,
            pitch_or_linear_size: level_size(width, height, format),
            mipmap_count,
            pixel_flags,
            fourcc,
            caps,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(DDS_FILE_HEADER_LEN);

        bytes.extend_from_slice(&DDS_MAGIC);
        bytes.extend_from_slice(&DDS_HEADER_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.flags.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.pitch_or_linear_size.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // depth
        bytes.extend_from_slice(&self.mipmap_count.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 44]); // reserved1

        // Pixel format
        bytes.extend_from_slice(&DDS_PIXEL_FORMAT_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_flags.to_le_bytes());
        bytes.extend_from_slice(&self.fourcc);
        bytes.extend_from_slice(&[0u8; 20]); // bit count and masks

        bytes.extend_from_slice(&self.caps.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]); // caps2..caps4, reserved2

        bytes
    }
}
