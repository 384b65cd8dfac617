pub mod archive;
pub mod batch;
pub mod classify;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod dds;
pub mod error;
pub mod filter;
pub mod formats;
pub mod info;
pub mod logger;
pub mod mipmap;
pub mod mode;
pub mod processing;
pub mod progress;
pub mod surface;
pub mod utils;
pub mod validation;

pub use archive::{ArchiveSink, ZipArchiveSink};
pub use batch::{
    batch_export_textures, collect_texture_files, generate_output_path, is_input_image, BatchJob,
    Discovery, ExportConfig, ExportStage, ExportSummary, PathPair,
};
pub use classify::{classify, FormatDecision};
pub use codec::{BcCodec, CompressionOptions, OutputSink, Serialized, SinkOutput, TextureCodec};
pub use error::{CodecError, ExportError, FailureKind, Result};
pub use formats::{OutputFormat, Quality, TextureFormat};
pub use info::{get_texture_info, print_texture_info, TextureInfo};
pub use mode::{guess_mode, Mode};
pub use processing::{compress_texture, TextureOptions, TextureReport};
pub use progress::{ExportListener, NoopListener, ProgressBarListener};
pub use surface::{AlphaMode, Surface};
