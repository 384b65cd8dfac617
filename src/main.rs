use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tex_squeeze::batch::{batch_export_textures, ExportConfig, ExportSummary};
use tex_squeeze::cli::{Args, Commands};
use tex_squeeze::codec::BcCodec;
use tex_squeeze::constants::{INFO_PREFIX, RESOLUTION_CHOICES, SUCCESS_PREFIX, WARNING_PREFIX};
use tex_squeeze::formats::{OutputFormat, Quality};
use tex_squeeze::info::{get_texture_info, print_texture_info};
use tex_squeeze::logger::init_logging;
use tex_squeeze::mode::{count_mode_images, Mode};
use tex_squeeze::progress::ProgressBarListener;
use tex_squeeze::utils::{calculate_compression_ratio, format_file_size};
use tex_squeeze::validation::validate_input_root;
use tracing::warn;

struct ExportArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    name: Option<String>,
    format: Option<OutputFormat>,
    mode: Option<Mode>,
    max_resolution: u32,
    quality: Quality,
    no_mipmaps: bool,
    threads: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.command {
        Commands::Export {
            input,
            output,
            name,
            format,
            mode,
            max_resolution,
            quality,
            no_mipmaps,
            threads,
        } => run_export(
            ExportArgs {
                input,
                output,
                name,
                format,
                mode,
                max_resolution,
                quality,
                no_mipmaps,
                threads,
            },
            args.quiet,
        ),
        Commands::Guess { input } => show_guess(&input),
        Commands::Info {
            input,
            max_resolution,
        } => {
            let info = get_texture_info(&input, max_resolution)
                .with_context(|| format!("Unable to inspect {}", input.display()))?;
            print_texture_info(&info);
            Ok(())
        }
    }
}

fn run_export(args: ExportArgs, quiet: bool) -> Result<()> {
    let root = validate_input_root(&args.input)?;
    if !RESOLUTION_CHOICES.contains(&args.max_resolution) {
        warn!(
            "Maximum resolution {} is not one of {:?}",
            args.max_resolution, RESOLUTION_CHOICES
        );
    }

    // The mode only matters for defaults the user did not give
    let mode = match args.mode {
        Some(mode) => mode,
        None if args.output.is_none() || args.format.is_none() => {
            count_mode_images(&root).mode()
        }
        None => Mode::Unknown,
    };

    let output = match args.output {
        Some(output) => output,
        None => match mode.default_output_dir() {
            Some(dir) => dir,
            None => bail!(
                "Could not tell whether {} is a skin or a mod; pass --output or --mode",
                args.input.display()
            ),
        },
    };
    let format = args
        .format
        .unwrap_or_else(|| mode.default_output_format());

    let mut config = ExportConfig::new(&root, &output)
        .with_output_format(format)
        .with_max_resolution(args.max_resolution)
        .with_quality(args.quality)
        .with_mipmaps(!args.no_mipmaps)
        .with_threads(args.threads);
    if let Some(name) = args.name {
        config = config.with_product_name(name);
    }

    if !quiet {
        println!("🚀 Starting export...");
        println!("📁 Input: {:?}", root);
        println!("📁 Output: {:?} ({})", output, format);
        println!("{} Mode: {}", INFO_PREFIX, mode);
    }

    let listener = if quiet {
        ProgressBarListener::hidden()
    } else {
        ProgressBarListener::new()
    };
    let summary = batch_export_textures(&config, &BcCodec::new(), &listener)?;

    if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ExportSummary) {
    println!("\n📊 Export Summary:");
    println!("  📁 Textures found: {}", summary.total);
    println!("  {} Exported: {}", SUCCESS_PREFIX, summary.succeeded);

    let failures = [
        ("Unreadable images", summary.load_failures),
        ("Unknown formats", summary.unresolved_formats),
        ("Compression errors", summary.compress_failures),
        ("Duplicate outputs skipped", summary.duplicates_skipped),
        ("Archive errors", summary.archive_failures),
    ];
    for (label, count) in failures.iter().filter(|(_, count)| *count > 0) {
        println!("  {}  {}: {}", WARNING_PREFIX, label, count);
    }

    println!(
        "  📦 {} -> {}",
        format_file_size(summary.bytes_read),
        format_file_size(summary.bytes_written)
    );
    println!(
        "  🎯 Compression ratio: {:.1}%",
        calculate_compression_ratio(summary.bytes_read, summary.bytes_written)
    );
    if let Some(output) = &summary.output {
        println!("  📍 Written to {:?}", output);
    }
}

fn show_guess(input: &Path) -> Result<()> {
    let root = validate_input_root(input)?;
    let counts = count_mode_images(&root);
    let mode = counts.mode();

    println!("{} Guessed mode: {}", INFO_PREFIX, mode);
    println!(
        "  Images - skin: {}, mod: {}, unknown: {}",
        counts.skin, counts.mods, counts.unknown
    );
    match mode.default_output_dir() {
        Some(dir) => println!(
            "  Suggested output: {:?} ({})",
            dir,
            mode.default_output_format()
        ),
        None => println!("  {}  No suggested output; pass --output to export", WARNING_PREFIX),
    }
    Ok(())
}
