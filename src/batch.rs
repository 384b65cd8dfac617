use crate::archive::{ArchiveSink, ZipArchiveSink};
use crate::codec::{OutputSink, TextureCodec};
use crate::constants::{
    ARCHIVE_EXTENSION, DEFAULT_MAX_RESOLUTION, INPUT_EXTENSIONS, TEXTURE_EXTENSION,
};
use crate::error::{ExportError, FailureKind, Result};
use crate::formats::{OutputFormat, Quality};
use crate::processing::{compress_texture, TextureOptions, TextureReport};
use crate::progress::ExportListener;
use crate::utils;
use crate::validation::{validate_input_root, validate_product_name};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Everything one export run needs, fixed before the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Folder or archive name under `output_dir`. Empty means "use the input
    /// directory's name".
    pub product_name: String,
    pub output_format: OutputFormat,
    /// 0 disables the cap
    pub max_resolution: u32,
    pub quality: Quality,
    pub generate_mipmaps: bool,
    /// Worker count; defaults to the number of logical CPUs
    pub threads: Option<usize>,
}

impl ExportConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let product_name = input_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            input_dir,
            output_dir: output_dir.into(),
            product_name,
            output_format: OutputFormat::default(),
            max_resolution: DEFAULT_MAX_RESOLUTION,
            quality: Quality::default(),
            generate_mipmaps: true,
            threads: None,
        }
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_resolution(mut self, max_resolution: u32) -> Self {
        self.max_resolution = max_resolution;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_mipmaps(mut self, generate_mipmaps: bool) -> Self {
        self.generate_mipmaps = generate_mipmaps;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn texture_options(&self) -> TextureOptions {
        TextureOptions::new(self.max_resolution, self.quality, self.generate_mipmaps)
    }

    fn resolved_product_name(&self, root: &Path) -> String {
        if !self.product_name.is_empty() {
            return self.product_name.clone();
        }
        root.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An input file and its output path relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PathPair {
    /// Forward-slash form of the relative output path
    pub fn entry_name(&self) -> String {
        utils::entry_name(&self.output)
    }
}

/// Result of walking an input root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub pairs: Vec<PathPair>,
    /// Later inputs whose output path was already taken
    pub duplicates: Vec<PathPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Discovering,
    Processing,
    Finalizing,
    Done,
}

impl ExportStage {
    fn enter(self, next: ExportStage) -> ExportStage {
        debug!(from = ?self, to = ?next, "Export stage");
        next
    }
}

/// A validated configuration plus the files it will process
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub config: ExportConfig,
    /// Canonical input root
    pub root: PathBuf,
    pub product_name: String,
    pub pairs: Vec<PathPair>,
    pub duplicates: Vec<PathPair>,
}

impl BatchJob {
    /// Validates the input root and product name, then discovers inputs.
    pub fn prepare(config: &ExportConfig) -> Result<Self> {
        let (root, product_name) = Self::preflight(config)?;
        Ok(Self::discover(config, root, product_name))
    }

    /// Checks that must pass before anything is read or written. Returns the
    /// canonical input root and the resolved product name.
    pub fn preflight(config: &ExportConfig) -> Result<(PathBuf, String)> {
        let root = validate_input_root(&config.input_dir)?;
        let product_name = config.resolved_product_name(&root);
        validate_product_name(&product_name)?;
        Ok((root, product_name))
    }

    fn discover(config: &ExportConfig, root: PathBuf, product_name: String) -> Self {
        let Discovery { pairs, duplicates } = collect_texture_files(&root);
        Self {
            config: config.clone(),
            root,
            product_name,
            pairs,
            duplicates,
        }
    }

    /// Directory receiving loose DDS files in folder mode
    pub fn folder_root(&self) -> PathBuf {
        self.config.output_dir.join(&self.product_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.{}", self.product_name, ARCHIVE_EXTENSION))
    }

    pub fn output_path(&self, pair: &PathPair) -> PathBuf {
        self.folder_root().join(&pair.output)
    }
}

/// Aggregate outcome of one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Files dispatched to the compression driver
    pub total: usize,
    pub succeeded: usize,
    pub load_failures: usize,
    pub unresolved_formats: usize,
    pub compress_failures: usize,
    pub duplicates_skipped: usize,
    pub archive_failures: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Output folder or archive file
    pub output: Option<PathBuf>,
}

impl ExportSummary {
    pub fn failed(&self) -> usize {
        self.load_failures
            + self.unresolved_formats
            + self.compress_failures
            + self.archive_failures
    }

    fn record_failure(&mut self, kind: Option<FailureKind>) {
        match kind {
            Some(FailureKind::Load) => self.load_failures += 1,
            Some(FailureKind::FormatUnresolved) => self.unresolved_formats += 1,
            Some(FailureKind::Archive) => self.archive_failures += 1,
            Some(FailureKind::Compress) | None => self.compress_failures += 1,
        }
    }
}

/// Accepted input images. Extensions compare literally, so `Skin.Png` is
/// not an input.
pub fn is_input_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| INPUT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Output path of `input` relative to `root`, with the DDS extension.
pub fn generate_output_path(input: &Path, root: &Path) -> Option<PathBuf> {
    let relative = input.strip_prefix(root).ok()?;
    relative.file_stem()?;
    Some(relative.with_extension(TEXTURE_EXTENSION))
}

/// Walks `root` recursively in file name order and pairs every input image
/// with its output path. Symlinks are followed; link loops are logged and
/// skipped.
///
/// Two inputs mapping to the same output (compared case-insensitively, e.g.
/// `Skin_D.png` and `Skin_D.jpg`) keep the first one; the later one is logged
/// and reported in [`Discovery::duplicates`]. Unreadable entries are logged
/// and skipped.
pub fn collect_texture_files(root: &Path) -> Discovery {
    let mut discovery = Discovery::default();
    let mut taken = HashSet::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", ExportError::from(err));
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_input_image(entry.path()) {
            continue;
        }

        let Some(output) = generate_output_path(entry.path(), root) else {
            continue;
        };
        let pair = PathPair {
            input: entry.into_path(),
            output,
        };

        if !taken.insert(pair.entry_name().to_lowercase()) {
            let err = ExportError::DuplicateOutputPath {
                input: pair.input.clone(),
                output: pair.output.clone(),
            };
            warn!("{}, skipping", err);
            discovery.duplicates.push(pair);
            continue;
        }

        discovery.pairs.push(pair);
    }

    discovery
}

fn report_failure(pair: &PathPair, output: &Path, err: &ExportError) {
    match err.kind() {
        Some(FailureKind::FormatUnresolved) => {
            warn!(input = ?pair.input, "{}, skipping", err);
        }
        kind => {
            error!(
                input = ?pair.input,
                output = ?output,
                kind = ?kind,
                "Error compressing {} -> {}: {}",
                pair.input.display(),
                output.display(),
                err
            );
        }
    }
}

/// Runs a whole export: validate, discover, compress in parallel, then
/// finalize as a folder tree or a single archive.
///
/// # Arguments
/// * `config` - Input, output and texture settings
/// * `codec` - Block compressor shared by every worker
/// * `listener` - Receives progress and completion notifications
///
/// # Returns
/// * `Ok(ExportSummary)` - Counts per outcome; individual files may have failed
/// * `Err(ExportError)` - The input root or product name is invalid, or the
///   worker pool could not start. Nothing was written and no notification
///   was sent.
///
/// Per-file failures never stop the batch, and `batch_finished` is sent
/// exactly once whenever this returns `Ok`.
pub fn batch_export_textures<C, L>(
    config: &ExportConfig,
    codec: &C,
    listener: &L,
) -> Result<ExportSummary>
where
    C: TextureCodec + Sync + ?Sized,
    L: ExportListener + ?Sized,
{
    let start_time = Instant::now();
    let mut stage = ExportStage::Idle;

    let threads = config.threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let (root, product_name) = BatchJob::preflight(config)?;
    stage = stage.enter(ExportStage::Discovering);
    let job = BatchJob::discover(config, root, product_name);
    info!(
        input = ?job.root,
        output = ?config.output_dir,
        files = job.pairs.len(),
        threads,
        "Starting export"
    );
    if job.pairs.is_empty() {
        warn!("No texture images found under {}", job.root.display());
    }

    let mut summary = ExportSummary {
        total: job.pairs.len(),
        duplicates_skipped: job.duplicates.len(),
        ..Default::default()
    };

    stage = stage.enter(ExportStage::Processing);
    match config.output_format {
        OutputFormat::Folder => export_folder(&job, codec, listener, &pool, &mut summary),
        OutputFormat::Archive => {
            let buffers = compress_all(&job, codec, listener, &pool, |_| OutputSink::memory());
            stage = stage.enter(ExportStage::Finalizing);
            write_archive(&job, buffers, listener, &mut summary);
        }
    }

    stage.enter(ExportStage::Done);
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed(),
        duplicates = summary.duplicates_skipped,
        elapsed = ?start_time.elapsed(),
        "Export finished"
    );
    listener.batch_finished(&summary);

    Ok(summary)
}

/// Runs the compression driver for every pair on `pool`. Results come back
/// in discovery order.
fn compress_all<C, L, F>(
    job: &BatchJob,
    codec: &C,
    listener: &L,
    pool: &rayon::ThreadPool,
    sink_for: F,
) -> Vec<(PathPair, Result<TextureReport>)>
where
    C: TextureCodec + Sync + ?Sized,
    L: ExportListener + ?Sized,
    F: Fn(&PathPair) -> OutputSink + Sync,
{
    let options = job.config.texture_options();
    listener.progress_range_set(job.pairs.len() as u64);

    pool.install(|| {
        job.pairs
            .par_iter()
            .map(|pair| {
                let result = compress_texture(codec, &pair.input, sink_for(pair), &options);
                if let Err(err) = &result {
                    report_failure(pair, &job.output_path(pair), err);
                }
                listener.progress_advanced();
                (pair.clone(), result)
            })
            .collect()
    })
}

fn export_folder<C, L>(
    job: &BatchJob,
    codec: &C,
    listener: &L,
    pool: &rayon::ThreadPool,
    summary: &mut ExportSummary,
) where
    C: TextureCodec + Sync + ?Sized,
    L: ExportListener + ?Sized,
{
    // All directories exist before any worker starts writing
    let directories: BTreeSet<PathBuf> = job
        .pairs
        .iter()
        .filter_map(|pair| job.output_path(pair).parent().map(Path::to_path_buf))
        .collect();
    for directory in &directories {
        if let Err(err) = fs::create_dir_all(directory) {
            error!(directory = ?directory, "Unable to create output directory: {}", err);
        }
    }

    let results = compress_all(job, codec, listener, pool, |pair| {
        OutputSink::file(job.output_path(pair))
    });

    for (_, result) in results {
        match result {
            Ok(report) => {
                summary.succeeded += 1;
                summary.bytes_read += report.original_size;
                summary.bytes_written += report.output.len();
            }
            Err(err) => summary.record_failure(err.kind()),
        }
    }
    summary.output = Some(job.folder_root());
}

/// Writes every successful buffer into one archive, sequentially.
fn write_archive<L: ExportListener + ?Sized>(
    job: &BatchJob,
    results: Vec<(PathPair, Result<TextureReport>)>,
    listener: &L,
    summary: &mut ExportSummary,
) {
    listener.progress_reset();
    info!("Archiving...");

    let mut entries = Vec::with_capacity(results.len());
    for (pair, result) in results {
        match result {
            Ok(report) => {
                summary.bytes_read += report.original_size;
                if let Some(bytes) = report.output.into_bytes() {
                    entries.push((pair.entry_name(), bytes));
                }
            }
            Err(err) => summary.record_failure(err.kind()),
        }
    }

    let archive_path = job.archive_path();
    let sink = fs::create_dir_all(&job.config.output_dir)
        .map_err(ExportError::from)
        .and_then(|_| ZipArchiveSink::create(&archive_path));
    let mut sink = match sink {
        Ok(sink) => sink,
        Err(err) => {
            error!(output = ?archive_path, "Unable to create archive: {}", err);
            summary.archive_failures += entries.len();
            return;
        }
    };

    let mut written = 0;
    for (name, bytes) in &entries {
        match sink.append(name, bytes) {
            Ok(()) => {
                written += 1;
                listener.entry_archived(name);
            }
            Err(err) => {
                error!(entry = %name, output = ?archive_path, "Unable to archive entry: {}", err);
                summary.archive_failures += 1;
            }
        }
    }

    match sink.finish() {
        Ok(len) => {
            summary.succeeded += written;
            summary.bytes_written = len;
            summary.output = Some(archive_path);
        }
        Err(err) => {
            // The archive may be left incomplete on disk
            error!(output = ?archive_path, "Unable to finish archive: {}", err);
            summary.archive_failures += written;
        }
    }
}
