use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Buffered, seekable input file.
///
/// Pipes are rejected: combining streams rewinds each input to its payload.
pub struct InputFile {
    reader: BufReader<File>,
    path: PathBuf,
    len: u64,
}

impl InputFile {
    pub fn open<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path = input_path.as_ref();
        if path.as_os_str() == "-" {
            bail!("Reading from stdin is not supported, inputs must be seekable files");
        }

        let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Cannot stat {}", path.display()))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at the time it was opened.
    pub fn file_size(&self) -> u64 {
        self.len
    }

    pub fn reader(&mut self) -> &mut BufReader<File> {
        &mut self.reader
    }
}
