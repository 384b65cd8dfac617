//! Kaiser-windowed sinc resampling.
//!
//! Separable polyphase filter used both for the resolution cap and for
//! mipmap generation. Pixels are RGBA `f32` quadruples stored row-major.

use std::f32::consts::PI;

/// Half-width of the filter support, in destination texels
pub const KAISER_WIDTH: f32 = 3.0;
pub const KAISER_ALPHA: f32 = 4.0;
pub const KAISER_STRETCH: f32 = 1.0;

fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-4 {
        1.0 - x * x * PI * PI / 6.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Zeroth order modified Bessel function of the first kind
fn bessel_i0(x: f32) -> f32 {
    let half = x / 2.0;
    let mut sum = 1.0f32;
    let mut term = 1.0f32;
    for k in 1..64 {
        let ratio = half / k as f32;
        term *= ratio * ratio;
        sum += term;
        if term < sum * 1e-9 {
            break;
        }
    }
    sum
}

/// Kaiser filter response at `x` (zero outside `[-KAISER_WIDTH, KAISER_WIDTH]`).
pub fn kaiser(x: f32) -> f32 {
    let t = x / KAISER_WIDTH;
    let r = 1.0 - t * t;
    if r < 0.0 {
        return 0.0;
    }
    sinc(x * KAISER_STRETCH) * bessel_i0(KAISER_ALPHA * r.sqrt()) / bessel_i0(KAISER_ALPHA)
}

/// Contribution of a run of source texels to one destination texel
#[derive(Debug, Clone)]
pub struct Taps {
    pub start: isize,
    pub weights: Vec<f32>,
}

/// Mirror addressing: `-1` maps to `0`, `len` maps to `len - 1`.
pub fn mirror(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let i = index.rem_euclid(period);
    if i >= len {
        (period - 1 - i) as usize
    } else {
        i as usize
    }
}

/// Normalised filter taps for resampling one axis from `src` to `dst` texels.
pub fn build_taps(src: u32, dst: u32) -> Vec<Taps> {
    let scale = dst as f32 / src as f32;
    let filter_scale = scale.min(1.0);
    let support = KAISER_WIDTH / filter_scale;

    (0..dst)
        .map(|i| {
            let center = (i as f32 + 0.5) / scale;
            let left = (center - support).floor() as isize;
            let right = (center + support).ceil() as isize;

            let mut weights: Vec<f32> = (left..=right)
                .map(|j| kaiser((j as f32 + 0.5 - center) * filter_scale))
                .collect();

            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
            } else {
                // Degenerate kernel: fall back to the nearest source texel
                weights.iter_mut().for_each(|w| *w = 0.0);
                let nearest = (center.floor() as isize - left) as usize;
                if let Some(w) = weights.get_mut(nearest) {
                    *w = 1.0;
                }
            }

            Taps {
                start: left,
                weights,
            }
        })
        .collect()
}

/// Resamples `pixels` (`width` x `height`) to `new_width` x `new_height`.
pub fn resample(
    pixels: &[[f32; 4]],
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
) -> Vec<[f32; 4]> {
    let horizontal = if new_width == width {
        pixels.to_vec()
    } else {
        let taps = build_taps(width, new_width);
        let mut out = Vec::with_capacity(new_width as usize * height as usize);
        for y in 0..height as usize {
            let row = &pixels[y * width as usize..(y + 1) * width as usize];
            for tap in &taps {
                out.push(convolve(tap, |x| row[mirror(x, width as usize)]));
            }
        }
        out
    };

    if new_height == height {
        return horizontal;
    }

    let taps = build_taps(height, new_height);
    let stride = new_width as usize;
    let mut out = Vec::with_capacity(stride * new_height as usize);
    for tap in &taps {
        for x in 0..stride {
            out.push(convolve(tap, |y| {
                horizontal[mirror(y, height as usize) * stride + x]
            }));
        }
    }
    out
}

fn convolve(tap: &Taps, sample: impl Fn(isize) -> [f32; 4]) -> [f32; 4] {
    let mut acc = [0.0f32; 4];
    for (offset, &weight) in tap.weights.iter().enumerate() {
        if weight == 0.0 {
            continue;
        }
        let texel = sample(tap.start + offset as isize);
        for c in 0..4 {
            acc[c] += texel[c] * weight;
        }
    }
    acc
}
