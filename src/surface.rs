use crate::filter;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Whether the source image carried an alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    None,
    Transparency,
}

/// A decoded texture level with floating point RGBA texels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
    alpha_mode: AlphaMode,
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// True when either edge exceeds an enabled resolution cap.
pub fn needs_resize(width: u32, height: u32, max_resolution: u32) -> bool {
    max_resolution > 0 && (width > max_resolution || height > max_resolution)
}

/// Extent after scaling the longest edge down to `max_resolution`, keeping
/// the aspect ratio. `None` when no resize is needed.
pub fn target_extent(width: u32, height: u32, max_resolution: u32) -> Option<(u32, u32)> {
    if !needs_resize(width, height, max_resolution) {
        return None;
    }
    let longest = u64::from(width.max(height));
    let cap = u64::from(max_resolution);
    let scale = |edge: u32| ((u64::from(edge) * cap / longest) as u32).max(1);
    Some((scale(width), scale(height)))
}

impl Surface {
    /// Builds a surface from raw texels. Returns `None` when the texel count
    /// does not match the extent or the extent is empty.
    pub fn new(
        width: u32,
        height: u32,
        texels: Vec<[f32; 4]>,
        alpha_mode: AlphaMode,
    ) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
            alpha_mode,
        })
    }

    /// A surface filled with one colour
    pub fn filled(width: u32, height: u32, texel: [f32; 4], alpha_mode: AlphaMode) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            texels: vec![texel; width.max(1) as usize * height.max(1) as usize],
            alpha_mode,
        }
    }

    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let alpha_mode = if img.color().has_alpha() {
            AlphaMode::Transparency
        } else {
            AlphaMode::None
        };
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let texels = rgba
            .as_raw()
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        Self {
            width,
            height,
            texels,
            alpha_mode,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha_mode == AlphaMode::Transparency
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    pub fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        self.texels
            .iter()
            .flat_map(|t| t.map(quantize))
            .collect()
    }

    /// Gamma-encoded colour to linear. Alpha is untouched.
    pub fn to_linear_from_srgb(&mut self) {
        for texel in &mut self.texels {
            for c in &mut texel[..3] {
                *c = srgb_to_linear(*c);
            }
        }
    }

    /// Linear colour back to gamma-encoded. Alpha is untouched.
    pub fn to_srgb(&mut self) {
        for texel in &mut self.texels {
            for c in &mut texel[..3] {
                *c = linear_to_srgb(*c);
            }
        }
    }

    pub fn premultiply_alpha(&mut self) {
        for texel in &mut self.texels {
            let a = texel[3];
            for c in &mut texel[..3] {
                *c *= a;
            }
        }
    }

    /// Inverse of `premultiply_alpha`; texels with zero alpha are left as is.
    pub fn demultiply_alpha(&mut self) {
        for texel in &mut self.texels {
            let a = texel[3];
            if a > 0.0 {
                for c in &mut texel[..3] {
                    *c /= a;
                }
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == self.dimensions() {
            return;
        }
        self.texels = filter::resample(&self.texels, self.width, self.height, width, height);
        self.width = width;
        self.height = height;
    }

    /// Scales down so the longest edge equals `max_extent`, keeping the aspect
    /// ratio. Returns whether a resize happened.
    pub fn resize_max_extent(&mut self, max_extent: u32) -> bool {
        match target_extent(self.width, self.height, max_extent) {
            Some((width, height)) => {
                self.resize(width, height);
                true
            }
            None => false,
        }
    }

    pub fn can_make_next_mipmap(&self) -> bool {
        self.width > 1 || self.height > 1
    }

    pub fn next_mipmap_extent(&self) -> (u32, u32) {
        ((self.width / 2).max(1), (self.height / 2).max(1))
    }

    /// Replaces this surface with the next smaller mip level.
    pub fn build_next_mipmap(&mut self) -> bool {
        if !self.can_make_next_mipmap() {
            return false;
        }
        let (width, height) = self.next_mipmap_extent();
        self.resize(width, height);
        true
    }
}
