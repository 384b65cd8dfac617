use crate::surface::Surface;

/// Builds a full mipmap chain from `base`.
///
/// Level 0 is `base` itself. Every further level halves the previous one
/// (rounding down, never below 1) until both edges reach 1. Each level is
/// filtered in linear space; with `premultiply_alpha` the colour is scaled by
/// alpha around the filter so transparent texels do not bleed into their
/// neighbours.
pub fn build_chain(base: Surface, premultiply_alpha: bool) -> Vec<Surface> {
    let mut chain = Vec::with_capacity(level_count(base.width(), base.height()) as usize);
    chain.push(base);

    loop {
        let Some(previous) = chain.last() else {
            break;
        };
        if !previous.can_make_next_mipmap() {
            break;
        }

        let mut level = previous.clone();
        level.to_linear_from_srgb();
        if premultiply_alpha {
            level.premultiply_alpha();
        }
        level.build_next_mipmap();
        if premultiply_alpha {
            level.demultiply_alpha();
        }
        level.to_srgb();

        chain.push(level);
    }

    chain
}

/// Number of levels `build_chain` produces for a `width` x `height` base.
pub fn level_count(width: u32, height: u32) -> u32 {
    let longest = width.max(height).max(1);
    u32::BITS - longest.leading_zeros()
}
