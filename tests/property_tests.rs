use proptest::prelude::*;
use std::path::Path;
use tex_squeeze::batch::{generate_output_path, is_input_image};
use tex_squeeze::classify::{classify, RULES};
use tex_squeeze::dds::{level_size, DdsHeader, DDS_FILE_HEADER_LEN};
use tex_squeeze::formats::TextureFormat;
use tex_squeeze::mipmap::{build_chain, level_count};
use tex_squeeze::processing::{needs_resize, target_extent};
use tex_squeeze::surface::{AlphaMode, Surface};

proptest! {
    #[test]
    fn target_extent_respects_cap(
        width in 1u32..=20_000u32,
        height in 1u32..=20_000u32,
        cap in 1u32..=8192u32
    ) {
        match target_extent(width, height, cap) {
            Some((w, h)) => {
                prop_assert!(needs_resize(width, height, cap));
                prop_assert_eq!(w.max(h), cap);
                prop_assert!(w >= 1 && h >= 1);
                prop_assert!(w <= width && h <= height);
            }
            None => prop_assert!(width <= cap && height <= cap),
        }
    }

    #[test]
    fn disabled_cap_never_resizes(width in 1u32..=100_000u32, height in 1u32..=100_000u32) {
        prop_assert!(!needs_resize(width, height, 0));
        prop_assert_eq!(target_extent(width, height, 0), None);
    }

    #[test]
    fn chain_halves_down_to_one(width in 1u32..=64u32, height in 1u32..=64u32) {
        let base = Surface::filled(width, height, [0.5, 0.5, 0.5, 1.0], AlphaMode::None);
        let chain = build_chain(base, true);

        let longest = width.max(height);
        prop_assert_eq!(chain.len() as u32, 32 - longest.leading_zeros());
        prop_assert_eq!(chain.len() as u32, level_count(width, height));
        prop_assert_eq!(chain.last().unwrap().dimensions(), (1, 1));

        for pair in chain.windows(2) {
            let (w, h) = pair[0].dimensions();
            prop_assert_eq!(pair[1].dimensions(), ((w / 2).max(1), (h / 2).max(1)));
        }
    }

    #[test]
    fn suffix_rules_resolve_for_any_prefix(prefix in "[A-Za-z]{0,12}", has_alpha: bool) {
        for rule in RULES {
            let stem = format!("{}{}", prefix, rule.suffix);
            prop_assert_eq!(classify(&stem, has_alpha), Some(rule.decide(has_alpha)));
        }
    }

    #[test]
    fn stems_without_underscore_never_resolve(stem in "[A-Za-z0-9]{0,16}", has_alpha: bool) {
        prop_assert_eq!(classify(&stem, has_alpha), None);
    }

    #[test]
    fn input_extensions_are_case_sensitive(stem in "[a-zA-Z0-9_]{1,12}") {
        for ext in ["png", "PNG", "jpg", "JPG", "jpeg", "JPEG"] {
            let name = format!("{}.{}", stem, ext);
            prop_assert!(is_input_image(Path::new(&name)));
        }
        for ext in ["Png", "pNG", "Jpg", "dds", "tga", "webp"] {
            let name = format!("{}.{}", stem, ext);
            prop_assert!(!is_input_image(Path::new(&name)));
        }
    }

    #[test]
    fn output_path_keeps_directories(
        dirs in prop::collection::vec("[a-z]{1,8}", 0..4),
        stem in "[A-Za-z_]{1,12}"
    ) {
        let root = Path::new("/textures");
        let mut input = root.to_path_buf();
        for dir in &dirs {
            input.push(dir);
        }
        input.push(format!("{}.png", stem));

        let output = generate_output_path(&input, root).unwrap();
        prop_assert_eq!(output.extension().unwrap(), "dds");
        prop_assert_eq!(output.file_stem().unwrap().to_string_lossy(), stem.as_str());
        prop_assert_eq!(output.components().count(), dirs.len() + 1);
    }

    #[test]
    fn header_linear_size_matches_blocks(
        width in 1u32..=4096u32,
        height in 1u32..=4096u32,
        levels in 1u32..=13u32
    ) {
        for format in [TextureFormat::Bc1, TextureFormat::Bc3, TextureFormat::Bc5] {
            let header = DdsHeader::new(width, height, levels, format).unwrap();
            prop_assert_eq!(header.to_bytes().len(), DDS_FILE_HEADER_LEN);
            prop_assert_eq!(header.pitch_or_linear_size, level_size(width, height, format));
            let blocks = ((width + 3) / 4) * ((height + 3) / 4);
            prop_assert_eq!(header.pitch_or_linear_size, blocks * format.block_size());
        }
    }
}
