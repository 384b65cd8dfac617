use crate::classify::{classify, FormatDecision};
use crate::constants::{INFO_PREFIX, WARNING_PREFIX};
use crate::error::{ExportError, Result};
use crate::mipmap;
use crate::processing::file_stem;
use crate::surface::{target_extent, AlphaMode, Surface};
use crate::utils::format_file_size;
use image::{ColorType, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};

/// What an export would do with one input image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    pub alpha_mode: AlphaMode,
    pub file_size: u64,
    pub decision: Option<FormatDecision>,
    /// Extent after the resolution cap, when it applies
    pub capped_extent: Option<(u32, u32)>,
    /// Mip levels generated from the (capped) base level
    pub mip_levels: u32,
}

pub fn get_texture_info(path: &Path, max_resolution: u32) -> Result<TextureInfo> {
    let load_error = |source| ExportError::Load {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| load_error(e.into()))?
        .with_guessed_format()
        .map_err(|e| load_error(e.into()))?
        .decode()
        .map_err(load_error)?;
    let file_size = fs::metadata(path)?.len();

    let surface = Surface::from_image(&img);
    let (width, height) = surface.dimensions();
    let capped_extent = target_extent(width, height, max_resolution);
    let (base_width, base_height) = capped_extent.unwrap_or((width, height));

    Ok(TextureInfo {
        path: path.to_path_buf(),
        width,
        height,
        color: img.color(),
        alpha_mode: surface.alpha_mode(),
        file_size,
        decision: classify(&file_stem(path), surface.has_alpha()),
        capped_extent,
        mip_levels: mipmap::level_count(base_width, base_height),
    })
}

pub fn print_texture_info(info: &TextureInfo) {
    println!("{} Texture: {:?}", INFO_PREFIX, info.path);
    println!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    println!(
        "  📦 File size: {} ({} bytes)",
        format_file_size(info.file_size),
        info.file_size
    );
    println!("  🎨 Color type: {:?}", info.color);
    println!(
        "  🎭 Alpha: {}",
        match info.alpha_mode {
            AlphaMode::None => "none",
            AlphaMode::Transparency => "transparency",
        }
    );

    match info.decision {
        Some(decision) => {
            println!("  🗜️  Format: {}", decision.format);
            println!(
                "  ✨ Premultiplied mipmaps: {}",
                if decision.premultiply_alpha { "yes" } else { "no" }
            );
        }
        None => println!(
            "  {} No format rule matches this name; it will be skipped",
            WARNING_PREFIX
        ),
    }

    if let Some((width, height)) = info.capped_extent {
        println!("  📐 Resized to: {}x{}", width, height);
    }
    println!("  🔢 Mip levels: {}", info.mip_levels);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::TextureFormat;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_texture_info() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Skin_D.png");
        RgbaImage::from_pixel(64, 32, Rgba([1, 2, 3, 4])).save(&path).unwrap();

        let info = get_texture_info(&path, 16).unwrap();
        assert_eq!((info.width, info.height), (64, 32));
        assert_eq!(info.color, ColorType::Rgba8);
        assert_eq!(info.alpha_mode, AlphaMode::Transparency);
        assert_eq!(info.decision.unwrap().format, TextureFormat::Bc3);
        assert_eq!(info.capped_extent, Some((16, 8)));
        assert_eq!(info.mip_levels, 5);
        assert!(info.file_size > 0);

        print_texture_info(&info);
    }

    #[test]
    fn test_texture_info_unmatched_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.png");
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])).save(&path).unwrap();

        let info = get_texture_info(&path, 0).unwrap();
        assert_eq!(info.decision, None);
        assert_eq!(info.capped_extent, None);
        assert_eq!(info.mip_levels, 3);
    }

    #[test]
    fn test_texture_info_missing_file() {
        let result = get_texture_info(Path::new("/nonexistent/Skin_D.png"), 0);
        assert!(matches!(result, Err(ExportError::Load { .. })));
    }
}
