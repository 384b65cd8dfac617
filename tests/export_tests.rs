mod common;

use common::{
    create_skin_fixture, create_temp_directory, write_broken_image, write_rgb_png, write_rgba_png,
};
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tex_squeeze::batch::{batch_export_textures, collect_texture_files, ExportConfig, ExportSummary};
use tex_squeeze::codec::{BcCodec, CompressionOptions, Serialized, TextureCodec};
use tex_squeeze::dds::DDS_FILE_HEADER_LEN;
use tex_squeeze::formats::{OutputFormat, TextureFormat};
use tex_squeeze::mode::{guess_mode, Mode};
use tex_squeeze::progress::ExportListener;
use tex_squeeze::surface::Surface;
use tex_squeeze::{classify, CodecError, ExportError};
use zip::ZipArchive;

#[derive(Default)]
struct CountingListener {
    range: AtomicU64,
    advanced: AtomicUsize,
    resets: AtomicUsize,
    archived: AtomicUsize,
    finished: AtomicUsize,
    summary: Mutex<Option<ExportSummary>>,
}

impl ExportListener for CountingListener {
    fn progress_range_set(&self, total: u64) {
        self.range.store(total, Ordering::SeqCst);
    }

    fn progress_advanced(&self) {
        self.advanced.fetch_add(1, Ordering::SeqCst);
    }

    fn progress_reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn entry_archived(&self, _name: &str) {
        self.archived.fetch_add(1, Ordering::SeqCst);
    }

    fn batch_finished(&self, summary: &ExportSummary) {
        self.finished.fetch_add(1, Ordering::SeqCst);
        *self.summary.lock().unwrap() = Some(summary.clone());
    }
}

#[test]
fn test_mixed_prefixes_guess_mod() {
    let input = create_temp_directory();
    write_rgba_png(&input.path().join("Wheels_D.png"), 8, 8);
    write_rgb_png(&input.path().join("Road_N.png"), 8, 8);

    assert_eq!(guess_mode(input.path()), Mode::Mod);
}

#[test]
fn test_archive_with_one_unreadable_file() {
    let input = create_temp_directory();
    let output = create_temp_directory();
    write_rgb_png(&input.path().join("Skin_A_D.png"), 8, 8);
    write_broken_image(&input.path().join("Skin_B_N.png"));
    write_rgba_png(&input.path().join("Skin_C_D.png"), 8, 8);

    let config = ExportConfig::new(input.path(), output.path())
        .with_product_name("Car")
        .with_output_format(OutputFormat::Archive);
    let listener = CountingListener::default();
    let summary = batch_export_textures(&config, &BcCodec::new(), &listener).unwrap();

    let archive_path = output.path().join("Car.zip");
    let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.by_name("Skin_B_N.dds").is_err());

    let mut bytes = Vec::new();
    archive
        .by_name("Skin_C_D.dds")
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(&bytes[0..4], b"DDS ");
    assert_eq!(&bytes[84..88], b"DXT5");

    assert_eq!(listener.range.load(Ordering::SeqCst), 3);
    assert_eq!(listener.advanced.load(Ordering::SeqCst), 3);
    assert_eq!(listener.resets.load(Ordering::SeqCst), 1);
    assert_eq!(listener.archived.load(Ordering::SeqCst), 2);
    assert_eq!(listener.finished.load(Ordering::SeqCst), 1);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.load_failures, 1);
    assert_eq!(summary.output, Some(archive_path));
    assert_eq!(listener.summary.lock().unwrap().as_ref(), Some(&summary));
}

#[test]
fn test_folder_export_mirrors_input_tree() {
    let input = create_skin_fixture();
    let output = create_temp_directory();

    let config = ExportConfig::new(input.path(), output.path())
        .with_product_name("Car")
        .with_mipmaps(false);
    let summary = batch_export_textures(&config, &BcCodec::new(), &CountingListener::default())
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);

    let car = output.path().join("Car");
    for name in ["Skin_D.dds", "Skin_N.dds", "Wheels/Wheels_R.dds"] {
        assert!(car.join(name).is_file(), "{} missing", name);
    }
    assert!(!car.join("readme.dds").exists());

    // 16x8 BC5 without mipmaps: 4x2 blocks of 16 bytes
    let normal = std::fs::read(car.join("Skin_N.dds")).unwrap();
    assert_eq!(normal.len(), DDS_FILE_HEADER_LEN + 8 * 16);
    assert_eq!(&normal[84..88], b"ATI2");
}

#[test]
fn test_every_file_failing_still_finishes_once() {
    let input = create_temp_directory();
    let output = create_temp_directory();
    write_broken_image(&input.path().join("Skin_D.png"));
    write_rgb_png(&input.path().join("Skin.png"), 4, 4);
    write_broken_image(&input.path().join("Details/Details_N.jpg"));

    let config = ExportConfig::new(input.path(), output.path())
        .with_product_name("Car")
        .with_output_format(OutputFormat::Archive);
    let listener = CountingListener::default();
    let summary = batch_export_textures(&config, &BcCodec::new(), &listener).unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed(), 3);
    assert_eq!(listener.advanced.load(Ordering::SeqCst), 3);
    assert_eq!(listener.archived.load(Ordering::SeqCst), 0);
    assert_eq!(listener.finished.load(Ordering::SeqCst), 1);

    let archive = ZipArchive::new(File::open(output.path().join("Car.zip")).unwrap()).unwrap();
    assert_eq!(archive.len(), 0);
}

#[test]
fn test_duplicate_outputs_are_skipped() {
    let input = create_temp_directory();
    let output = create_temp_directory();
    write_rgb_png(&input.path().join("Skin_D.jpg"), 4, 4);
    write_rgb_png(&input.path().join("Skin_D.png"), 4, 4);

    let discovery = collect_texture_files(input.path());
    assert_eq!(discovery.pairs.len(), 1);
    assert_eq!(discovery.duplicates.len(), 1);

    let config = ExportConfig::new(input.path(), output.path()).with_product_name("Car");
    let listener = CountingListener::default();
    let summary = batch_export_textures(&config, &BcCodec::new(), &listener).unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.duplicates_skipped, 1);
    assert_eq!(listener.advanced.load(Ordering::SeqCst), 1);
}

#[test]
fn test_serialized_codec_gives_same_output() {
    let input = create_skin_fixture();
    let direct_out = create_temp_directory();
    let locked_out = create_temp_directory();

    let config = ExportConfig::new(input.path(), direct_out.path()).with_product_name("Car");
    batch_export_textures(&config, &BcCodec::new(), &CountingListener::default()).unwrap();

    let config = ExportConfig::new(input.path(), locked_out.path())
        .with_product_name("Car")
        .with_threads(Some(4));
    let serialized = Serialized::new(BcCodec::new());
    batch_export_textures(&config, &serialized, &CountingListener::default()).unwrap();

    for name in ["Skin_D.dds", "Skin_N.dds", "Wheels/Wheels_R.dds"] {
        let direct = std::fs::read(direct_out.path().join("Car").join(name)).unwrap();
        let locked = std::fs::read(locked_out.path().join("Car").join(name)).unwrap();
        assert_eq!(direct, locked, "{}", name);
    }
}

#[test]
fn test_missing_input_root_is_fatal() {
    let output = create_temp_directory();
    let config = ExportConfig::new(output.path().join("missing"), output.path());
    let listener = CountingListener::default();

    let result = batch_export_textures(&config, &BcCodec::new(), &listener);
    assert!(matches!(result, Err(ExportError::InputRootInvalid(_))));
    assert_eq!(listener.finished.load(Ordering::SeqCst), 0);
}

#[test]
fn test_diffuse_format_follows_alpha() {
    let opaque = classify("Skin_D", false).unwrap();
    assert_eq!(opaque.format, TextureFormat::Bc1);
    assert!(opaque.premultiply_alpha);

    let transparent = classify("Skin_D", true).unwrap();
    assert_eq!(transparent.format, TextureFormat::Bc3);
    assert!(transparent.premultiply_alpha);
}

/// Writes a header, then fails on the payload
struct HeaderThenFail;

impl TextureCodec for HeaderThenFail {
    fn output_header(
        &self,
        _first: &Surface,
        _level_count: u32,
        _options: &CompressionOptions,
        sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        sink.write_all(&[0u8; 128])?;
        Ok(())
    }

    fn compress(
        &self,
        _levels: &[Surface],
        _options: &CompressionOptions,
        _sink: &mut dyn Write,
    ) -> Result<(), CodecError> {
        Err(CodecError::Io(io::Error::new(io::ErrorKind::Other, "encoder gave up")))
    }
}

#[test]
fn test_failed_payload_leaves_no_truncated_dds() {
    let input = create_temp_directory();
    let output = create_temp_directory();
    write_rgba_png(&input.path().join("Skin_D.png"), 8, 8);

    let config = ExportConfig::new(input.path(), output.path()).with_product_name("Car");
    let listener = CountingListener::default();
    let summary = batch_export_textures(&config, &HeaderThenFail, &listener).unwrap();

    assert_eq!(summary.compress_failures, 1);
    assert_eq!(summary.succeeded, 0);
    assert!(!output.path().join("Car/Skin_D.dds").exists());
    assert_eq!(listener.finished.load(Ordering::SeqCst), 1);
}
