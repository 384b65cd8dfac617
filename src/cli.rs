use crate::constants::DEFAULT_MAX_RESOLUTION;
use crate::formats::{OutputFormat, Quality};
use crate::mode::Mode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tex-squeeze",
    about = "Batch converter from texture images to BCn-compressed DDS files",
    long_about = "tex-squeeze turns a directory of skin or mod texture images into DDS textures. \
                  The compression format of each file is picked from its name suffix \
                  (_D, _N, _R, ...), mipmaps are generated with a Kaiser filter, and the result \
                  is written as a folder tree or a single ZIP archive.",
    version,
    after_help = "EXAMPLES:\n  \
    tex-squeeze export ./MyCar -f archive\n  \
    tex-squeeze export ./MyMod -o ./out -n MyMod -r 2048 -Q highest\n  \
    tex-squeeze guess ./MyCar\n  \
    tex-squeeze info ./MyCar/Skin_D.png"
)]
pub struct Args {
    #[arg(short = 'v', long, global = true, help = "Log debug details")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Only log warnings and errors",
        long_help = "Only log warnings and errors. Takes precedence over --verbose. \
                     RUST_LOG overrides both."
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert every texture image under a directory",
        long_about = "Walk the input directory recursively, convert each .png/.jpg/.jpeg image \
                      to DDS and write the results under <OUTPUT>/<NAME>/ (folder) or to \
                      <OUTPUT>/<NAME>.zip (archive). Files whose names match no format rule \
                      are skipped with a warning."
    )]
    Export {
        #[arg(help = "Input directory")]
        input: PathBuf,

        #[arg(
            short = 'o',
            long,
            help = "Output directory (default: the game directory for the mode)",
            long_help = "Output directory. When omitted, the game's skin or mod directory \
                         under your documents folder is used, based on --mode or on the \
                         guessed mode."
        )]
        output: Option<PathBuf>,

        #[arg(
            short = 'n',
            long,
            help = "Product name (default: input directory name)"
        )]
        name: Option<String>,

        #[arg(
            short = 'f',
            long,
            help = "Output layout: folder or archive (default: archive for skins)"
        )]
        format: Option<OutputFormat>,

        #[arg(
            short = 'm',
            long,
            help = "Product mode: skin or mod (default: guessed from file names)"
        )]
        mode: Option<Mode>,

        #[arg(
            short = 'r',
            long,
            default_value_t = DEFAULT_MAX_RESOLUTION,
            help = "Maximum texture edge in pixels, 0 for no limit",
            long_help = "Textures larger than this are scaled down so their longest edge \
                         matches it, keeping the aspect ratio. Common values: 8192, 4096, \
                         2048, 1024, 512, 256. 0 disables the limit."
        )]
        max_resolution: u32,

        #[arg(
            short = 'Q',
            long,
            default_value_t = Quality::Normal,
            help = "Compression quality: fastest, normal or highest"
        )]
        quality: Quality,

        #[arg(long, help = "Only write the base level, no mipmaps")]
        no_mipmaps: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)"
        )]
        threads: Option<usize>,
    },

    #[command(about = "Guess whether a directory holds a car skin or a mod")]
    Guess {
        #[arg(help = "Input directory")]
        input: PathBuf,
    },

    #[command(
        about = "Show how a single image would be converted",
        long_about = "Display dimensions, colour type and alpha of an image together with the \
                      format, alpha policy and mip level count an export would use."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,

        #[arg(
            short = 'r',
            long,
            default_value_t = DEFAULT_MAX_RESOLUTION,
            help = "Maximum texture edge in pixels, 0 for no limit"
        )]
        max_resolution: u32,
    },
}
