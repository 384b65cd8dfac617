//! Filename-convention classifier.
//!
//! Texture roles are encoded as a suffix on the file stem (`Skin_D`,
//! `Wheels_N`, ...). Each suffix maps to a block compression format and to
//! the alpha policy used while building mipmaps.

use crate::formats::TextureFormat;

/// What the codec should produce for one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDecision {
    pub format: TextureFormat,
    /// Premultiply colour by alpha while filtering mip levels. Off when the
    /// alpha channel packs non-opacity data.
    pub premultiply_alpha: bool,
}

impl FormatDecision {
    pub const fn new(format: TextureFormat, premultiply_alpha: bool) -> Self {
        Self {
            format,
            premultiply_alpha,
        }
    }
}

/// Format selection for one suffix rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Fixed(TextureFormat),
    /// Depends on whether the image carries an alpha channel
    ByAlpha {
        opaque: TextureFormat,
        alpha: TextureFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRule {
    pub suffix: &'static str,
    pub format: RuleFormat,
    pub premultiply_alpha: bool,
}

impl SuffixRule {
    const fn fixed(suffix: &'static str, format: TextureFormat, premultiply_alpha: bool) -> Self {
        Self {
            suffix,
            format: RuleFormat::Fixed(format),
            premultiply_alpha,
        }
    }

    pub fn decide(&self, has_alpha: bool) -> FormatDecision {
        let format = match self.format {
            RuleFormat::Fixed(format) => format,
            RuleFormat::ByAlpha { opaque, alpha } => {
                if has_alpha {
                    alpha
                } else {
                    opaque
                }
            }
        };
        FormatDecision::new(format, self.premultiply_alpha)
    }
}

/// Rules in priority order; the first suffix the stem ends with wins.
/// Matching is case-sensitive.
pub const RULES: &[SuffixRule] = &[
    SuffixRule::fixed("_B", TextureFormat::Bc1, true),
    SuffixRule::fixed("_R", TextureFormat::Bc5, true),
    // Alpha holds the illumination trigger mask, not opacity
    SuffixRule::fixed("_I", TextureFormat::Bc3, false),
    SuffixRule::fixed("_N", TextureFormat::Bc5, true),
    SuffixRule::fixed("_AO", TextureFormat::Bc1, true),
    SuffixRule::fixed("_DirtMask", TextureFormat::Bc1, true),
    SuffixRule {
        suffix: "_D",
        format: RuleFormat::ByAlpha {
            opaque: TextureFormat::Bc1,
            alpha: TextureFormat::Bc3,
        },
        premultiply_alpha: true,
    },
    SuffixRule::fixed("_H", TextureFormat::Bc1, true),
    SuffixRule::fixed("_M", TextureFormat::Bc3, true),
    SuffixRule::fixed("_L", TextureFormat::Bc3, true),
    SuffixRule::fixed("_CoatR", TextureFormat::Bc1, true),
];

/// Resolves the rule matching `stem`, if any.
pub fn find_rule(stem: &str) -> Option<&'static SuffixRule> {
    RULES.iter().find(|rule| stem.ends_with(rule.suffix))
}

/// Picks the compression format and alpha policy for a file stem.
///
/// Returns `None` when no suffix matches; callers skip such files.
pub fn classify(stem: &str, has_alpha: bool) -> Option<FormatDecision> {
    find_rule(stem).map(|rule| rule.decide(has_alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(suffix: &str, has_alpha: bool) -> (TextureFormat, bool) {
        match suffix {
            "_B" => (TextureFormat::Bc1, true),
            "_R" => (TextureFormat::Bc5, true),
            "_I" => (TextureFormat::Bc3, false),
            "_N" => (TextureFormat::Bc5, true),
            "_AO" => (TextureFormat::Bc1, true),
            "_DirtMask" => (TextureFormat::Bc1, true),
            "_D" if has_alpha => (TextureFormat::Bc3, true),
            "_D" => (TextureFormat::Bc1, true),
            "_H" => (TextureFormat::Bc1, true),
            "_M" => (TextureFormat::Bc3, true),
            "_L" => (TextureFormat::Bc3, true),
            "_CoatR" => (TextureFormat::Bc1, true),
            other => panic!("unexpected suffix {}", other),
        }
    }

    #[test]
    fn test_every_rule_both_alpha_states() {
        for rule in RULES {
            for has_alpha in [false, true] {
                let stem = format!("Skin{}", rule.suffix);
                let decision = classify(&stem, has_alpha).unwrap();
                let (format, premultiply) = expected(rule.suffix, has_alpha);
                assert_eq!(decision.format, format, "{} alpha={}", stem, has_alpha);
                assert_eq!(decision.premultiply_alpha, premultiply, "{}", stem);
            }
        }
    }

    #[test]
    fn test_diffuse_depends_on_alpha() {
        assert_eq!(
            classify("Wheels_D", false),
            Some(FormatDecision::new(TextureFormat::Bc1, true))
        );
        assert_eq!(
            classify("Wheels_D", true),
            Some(FormatDecision::new(TextureFormat::Bc3, true))
        );
    }

    #[test]
    fn test_illumination_keeps_straight_alpha() {
        let decision = classify("Details_I", true).unwrap();
        assert_eq!(decision.format, TextureFormat::Bc3);
        assert!(!decision.premultiply_alpha);
    }

    #[test]
    fn test_unmatched_stems() {
        assert_eq!(classify("Skin", false), None);
        assert_eq!(classify("Skin_X", true), None);
        assert_eq!(classify("", false), None);
        // Suffixes are case-sensitive
        assert_eq!(classify("Skin_d", false), None);
        assert_eq!(classify("Skin_dirtmask", false), None);
    }

    #[test]
    fn test_only_the_last_suffix_counts() {
        assert_eq!(classify("Skin_N_D", false).unwrap().format, TextureFormat::Bc1);
        assert_eq!(classify("Skin_D_N", false).unwrap().format, TextureFormat::Bc5);
        assert_eq!(classify("Road_CoatR", false).unwrap().format, TextureFormat::Bc1);
    }

    #[test]
    fn test_suffixes_are_unique() {
        for (i, rule) in RULES.iter().enumerate() {
            assert!(RULES[i + 1..].iter().all(|other| other.suffix != rule.suffix));
        }
    }
}
