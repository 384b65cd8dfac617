use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Sequential writer of named entries into one archive file.
pub trait ArchiveSink {
    /// Appends an entry. `name` is a forward-slash relative path.
    fn append(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Closes the archive and returns its size in bytes.
    fn finish(self) -> Result<u64>
    where
        Self: Sized;
}

pub struct ZipArchiveSink {
    path: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ZipArchiveSink {
    /// Creates (or truncates) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipWriter::new(BufWriter::new(file)),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        })
    }

    pub fn entries(&self) -> usize {
        self.entries
    }
}

impl ArchiveSink for ZipArchiveSink {
    fn append(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(bytes)?;
        self.entries += 1;
        Ok(())
    }

    fn finish(self) -> Result<u64> {
        let mut inner = self.writer.finish()?;
        inner.flush()?;
        Ok(fs::metadata(&self.path)?.len())
    }
}
