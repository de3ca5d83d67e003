use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::error::UploadError;

/// Size and extension limits applied to one upload slot before anything is
/// written to disk.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub extensions: &'static [&'static str],
}

/// Photos: course avatars and topic photos.
pub const IMAGE_POLICY: UploadPolicy = UploadPolicy {
    max_bytes: 4 * 1024 * 1024,
    extensions: &["png", "jpg", "jpeg", "gif"],
};

/// Topic attachments.
pub const ATTACHMENT_POLICY: UploadPolicy = UploadPolicy {
    max_bytes: 8 * 1024 * 1024,
    extensions: &["doc", "jpg", "jpeg", "gif"],
};

impl UploadPolicy {
    /// Returns the form error message when the file breaks the policy.
    pub fn check(&self, file_name: &str, len: usize) -> Result<(), String> {
        let Some(base) = sanitize_file_name(file_name) else {
            return Err("Invalid file name.".to_string());
        };

        let extension = Path::new(&base)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let allowed = extension
            .as_deref()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext));
        if !allowed {
            return Err("This file extension is not allowed.".to_string());
        }

        if len > self.max_bytes {
            return Err(format!("Maximum allowed file size is {} bytes.", self.max_bytes));
        }

        Ok(())
    }
}

/// Longest base name kept, so that `<uuid>-<base>` stays within the usual
/// 255-byte file name limit.
pub const MAX_BASE_NAME_BYTES: usize = 255 - 37;

/// Reduces a client-supplied file name to its last path component.
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// is left (empty, `.` or `..`). Long names are cut to
/// [`MAX_BASE_NAME_BYTES`] on a char boundary, keeping the extension.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?;
    let base: String = base.chars().filter(|c| !c.is_control()).collect();
    let base = base.trim();

    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(truncate_base_name(base))
    }
}

fn truncate_base_name(base: &str) -> String {
    if base.len() <= MAX_BASE_NAME_BYTES {
        return base.to_string();
    }

    let suffix = Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() < MAX_BASE_NAME_BYTES / 2)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let mut end = MAX_BASE_NAME_BYTES - suffix.len();
    while !base.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &base[..end], suffix)
}

/// Writes uploaded files into a single flat directory.
///
/// The directory must already exist; startup creates it.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stores `bytes` as `<uuid>-<base name>` and returns that stored name.
    ///
    /// The file is flushed to disk before this returns. Existing files are
    /// never overwritten.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let base = sanitize_file_name(original_name)
            .ok_or_else(|| UploadError::InvalidFileName(original_name.to_string()))?;
        let stored_name = format!("{}-{}", Uuid::new_v4(), base);
        let path = self.dir.join(&stored_name);

        let io_err = |source| UploadError::Io {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(bytes).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;

        debug!("stored upload {} ({} bytes)", stored_name, bytes.len());
        Ok(stored_name)
    }
}
