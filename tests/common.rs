#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes an opaque RGB PNG, creating parent directories.
pub fn write_rgb_png(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb([180, 40, 40]))
        .save(path)
        .unwrap();
    path.to_path_buf()
}

/// Writes a PNG with a half transparent alpha channel.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x % 2 == 0 { 255 } else { 0 };
        Rgba([20, 160, 220, alpha])
    })
    .save(path)
    .unwrap();
    path.to_path_buf()
}

/// A file with an image extension that cannot be decoded
pub fn write_broken_image(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not really a png").unwrap();
    path.to_path_buf()
}

/// A small car skin: diffuse with alpha, normal map, and a nested wheel
/// texture, plus files discovery must ignore.
pub fn create_skin_fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_rgba_png(&root.join("Skin_D.png"), 16, 16);
    write_rgb_png(&root.join("Skin_N.png"), 16, 8);
    write_rgb_png(&root.join("Wheels").join("Wheels_R.png"), 8, 8);
    fs::write(root.join("readme.txt"), b"skin notes").unwrap();
    fs::write(root.join("Skin_D.tga"), b"ignored").unwrap();
    temp_dir
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
