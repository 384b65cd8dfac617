/// Input image extensions accepted by discovery. Matching is a literal,
/// case-sensitive comparison, so each casing is listed on its own.
pub const INPUT_EXTENSIONS: &[&str] = &["png", "PNG", "jpg", "JPG", "jpeg", "JPEG"];

pub const TEXTURE_EXTENSION: &str = "dds";
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Longest edge allowed before a texture is scaled down. 0 disables the cap.
pub const DEFAULT_MAX_RESOLUTION: u32 = 4096;
pub const RESOLUTION_CHOICES: &[u32] = &[0, 8192, 4096, 2048, 1024, 512, 256];

pub const SKIN_IMAGE_PREFIXES: &[&str] = &["Skin", "Details", "Wheels", "Glass"];
pub const MOD_IMAGE_PREFIXES: &[&str] = &[
    "ChronoCheckpoint",
    "DecalPlatform",
    "DecoHill",
    "OpenTech",
    "Platform",
    "Road",
    "Track",
];

// Relative to the user's documents directory
pub const SKIN_OUTPUT_SUBDIR: &[&str] = &["Trackmania", "Skins", "Models", "CarSport"];
pub const MOD_OUTPUT_SUBDIR: &[&str] = &["Trackmania", "Skins", "Stadium", "ModWork"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const INFO_PREFIX: &str = "📋";
