use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// `<dir>/<stem>.<suffix>.wav` next to `base_path`.
pub fn default_output_path(base_path: &Path, suffix: &str) -> PathBuf {
    let stem = base_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    base_path.with_file_name(format!("{stem}.{suffix}.wav"))
}

/// Fails if `output` already names one of `inputs`.
pub fn ensure_distinct(output: &Path, inputs: &[&Path]) -> Result<()> {
    let Ok(resolved) = output.canonicalize() else {
        return Ok(());
    };

    for input in inputs {
        if input.canonicalize().is_ok_and(|p| p == resolved) {
            bail!(
                "Output {} would overwrite input {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

/// Output file that is deleted again unless [`commit`](Self::commit) is called.
pub struct PartialOutput {
    file: File,
    path: PathBuf,
    committed: bool,
}

impl PartialOutput {
    pub fn create(path: &Path, overwrite: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let file = options.open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                anyhow::anyhow!(
                    "{} already exists, pass --overwrite to replace it",
                    path.display()
                )
            } else {
                anyhow::Error::new(e).context(format!("Cannot create {}", path.display()))
            }
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            committed: false,
        })
    }

    pub fn file(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Syncs the file to disk and keeps it.
    pub fn commit(mut self) -> Result<()> {
        self.file
            .sync_all()
            .with_context(|| format!("Cannot sync {}", self.path.display()))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if !self.committed {
            log::warn!("Removing incomplete output {}", self.path.display());
            if let Err(e) = fs::remove_file(&self.path) {
                log::error!("Cannot remove {}: {e}", self.path.display());
            }
        }
    }
}
