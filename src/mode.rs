//! Product mode inference.
//!
//! Car skins and stadium mods use different, well-known texture names. The
//! mode guessed from those names only picks a default output location and
//! layout; callers may override both.

use crate::batch::is_input_image;
use crate::constants::{
    MOD_IMAGE_PREFIXES, MOD_OUTPUT_SUBDIR, SKIN_IMAGE_PREFIXES, SKIN_OUTPUT_SUBDIR,
};
use crate::error::{ExportError, Result};
use crate::formats::OutputFormat;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Skin,
    Mod,
    Unknown,
}

impl Mode {
    /// Where the game looks for this kind of product, under the user's
    /// documents directory. `None` for `Unknown` or when no documents or home
    /// directory can be found.
    pub fn default_output_dir(&self) -> Option<PathBuf> {
        let subdir = match self {
            Mode::Skin => SKIN_OUTPUT_SUBDIR,
            Mode::Mod => MOD_OUTPUT_SUBDIR,
            Mode::Unknown => return None,
        };
        let mut path = dirs::document_dir().or_else(dirs::home_dir)?;
        path.extend(subdir);
        Some(path)
    }

    /// Skins ship as one archive, mods as a loose folder.
    pub fn default_output_format(&self) -> OutputFormat {
        match self {
            Mode::Skin => OutputFormat::Archive,
            Mode::Mod | Mode::Unknown => OutputFormat::Folder,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Skin => "skin",
            Mode::Mod => "mod",
            Mode::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Parses a mode chosen by the user. `Unknown` only comes out of a guess.
impl FromStr for Mode {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skin" => Ok(Mode::Skin),
            "mod" => Ok(Mode::Mod),
            _ => Err(ExportError::UnsupportedOption(s.to_string())),
        }
    }
}

/// Image counts per known name list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeCounts {
    pub skin: usize,
    pub mods: usize,
    pub unknown: usize,
}

impl ModeCounts {
    /// Any mod image wins; skin needs at least one skin image and no mod
    /// images.
    pub fn mode(&self) -> Mode {
        if self.skin > 0 && self.mods == 0 {
            Mode::Skin
        } else if self.mods > 0 {
            Mode::Mod
        } else {
            Mode::Unknown
        }
    }
}

fn stem_starts_with_any(path: &Path, prefixes: &[&str]) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .map(|stem| prefixes.iter().any(|prefix| stem.starts_with(prefix)))
        .unwrap_or(false)
}

pub fn is_skin_image(path: &Path) -> bool {
    stem_starts_with_any(path, SKIN_IMAGE_PREFIXES)
}

pub fn is_mod_image(path: &Path) -> bool {
    stem_starts_with_any(path, MOD_IMAGE_PREFIXES)
}

/// Counts input images under `root` by name list. A skin image is never
/// tested against the mod list.
pub fn count_mode_images(root: &Path) -> ModeCounts {
    let mut counts = ModeCounts::default();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", ExportError::from(err));
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_input_image(path) {
            continue;
        }

        if is_skin_image(path) {
            counts.skin += 1;
        } else if is_mod_image(path) {
            counts.mods += 1;
        } else {
            counts.unknown += 1;
        }
    }

    info!(
        skin = counts.skin,
        mods = counts.mods,
        unknown = counts.unknown,
        "Images - skin: {}, mod: {}, unknown: {}",
        counts.skin,
        counts.mods,
        counts.unknown
    );
    counts
}

pub fn guess_mode(root: &Path) -> Mode {
    count_mode_images(root).mode()
}
