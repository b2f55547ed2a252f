//! Transient on-disk copies of uploads
//!
//! The transcription call streams from a file, so each upload is written to
//! a uniquely named file in the staging directory for the duration of that
//! call. [`StagedAudio`] owns the file: [`StagedAudio::remove`] deletes it
//! explicitly, and dropping the value deletes it on any other exit path
//! (errors, panics, the client hanging up mid-request).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

/// Longest sanitized name kept in a staged filename
const MAX_NAME_LEN: usize = 64;

/// Directory that holds uploads while they are transcribed
#[derive(Debug, Clone)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Use `dir` for staged uploads, creating it if needed
    pub fn create(dir: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to a fresh file named after `original_name`
    ///
    /// Names look like `encore-<random>-<sanitized name>`; the random part is
    /// created with `O_EXCL`, so concurrent uploads of the same name never
    /// share a path.
    pub async fn stage(&self, original_name: &str, bytes: Bytes) -> io::Result<StagedAudio> {
        let dir = self.dir.clone();
        let upload_name = sanitize_file_name(original_name);
        let suffix = format!("-{upload_name}");

        let file = tokio::task::spawn_blocking(move || -> io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("encore-")
                .suffix(&suffix)
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(io::Error::other)??;

        tracing::debug!(path = %file.path().display(), "staged upload");

        Ok(StagedAudio { file, upload_name })
    }
}

/// An upload staged on disk, deleted when removed or dropped
#[derive(Debug)]
pub struct StagedAudio {
    file: NamedTempFile,
    upload_name: String,
}

impl StagedAudio {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Filesystem-safe form of the original upload name
    pub fn upload_name(&self) -> &str {
        &self.upload_name
    }

    /// Delete the staged file now, reporting failure
    pub fn remove(self) -> io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!(path = %path.display(), "removed staged upload");
        Ok(())
    }
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Directory parts are dropped, characters outside `[A-Za-z0-9._-]` become
/// `_`, and long names keep their tail so the extension survives.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    let cleaned: Vec<char> = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let start = cleaned.len().saturating_sub(MAX_NAME_LEN);
    let name: String = cleaned[start..].iter().collect();
    let name = name.trim_start_matches('.');

    if name.is_empty() {
        "upload".to_string()
    } else {
        name.to_string()
    }
}
