//! Photo store contract and directory-backed implementation.
//!
//! # Responsibility
//! - Persist photo bytes per owner scope.
//! - Return a URL suitable for `Member::photo_url`.
//!
//! # Invariants
//! - Every upload gets a fresh file name; existing files are never replaced.
//! - Returned URLs stay valid for as long as the file exists.
//! - Stored file names never contain caller-controlled path segments.
//! - Each owner id maps to its own directory; no two owners share one.

use crate::model::owner::OwnerScope;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// `_` never starts a valid escape here, so no account can map onto it.
const SAMPLE_OWNER_SEGMENT: &str = "_sample";
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "heic", "gif"];

pub type PhotoStoreResult<T> = Result<T, PhotoStoreError>;

#[derive(Debug)]
pub enum PhotoStoreError {
    /// Upload payload is empty.
    EmptyPayload,
    /// File name has no supported image extension.
    UnsupportedFileType(String),
    /// Store root is not usable.
    InvalidRoot(String),
    Io(std::io::Error),
}

impl Display for PhotoStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "photo upload is empty"),
            Self::UnsupportedFileType(name) => write!(
                f,
                "unsupported photo file `{name}`; expected one of {}",
                ALLOWED_EXTENSIONS.join("|")
            ),
            Self::InvalidRoot(message) => write!(f, "invalid photo store root: {message}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PhotoStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PhotoStoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Upload target for member photos.
pub trait PhotoStore {
    /// Stores one photo and returns its public URL.
    fn upload(&self, scope: &OwnerScope, file_name: &str, bytes: &[u8])
        -> PhotoStoreResult<String>;
}

/// Stores photos as files under `<root>/<owner>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct DirectoryPhotoStore {
    root: PathBuf,
}

impl DirectoryPhotoStore {
    /// Creates a store rooted at an absolute directory.
    ///
    /// The directory is created lazily on first upload.
    pub fn new(root: impl AsRef<Path>) -> PhotoStoreResult<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(PhotoStoreError::InvalidRoot("root cannot be empty".to_string()));
        }
        if !root.is_absolute() {
            return Err(PhotoStoreError::InvalidRoot(format!(
                "root must be an absolute path, got `{}`",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn owner_dir(&self, scope: &OwnerScope) -> PathBuf {
        match scope.owner_id() {
            Some(owner_id) => self.root.join(encode_owner_segment(owner_id)),
            None => self.root.join(SAMPLE_OWNER_SEGMENT),
        }
    }
}

impl PhotoStore for DirectoryPhotoStore {
    fn upload(
        &self,
        scope: &OwnerScope,
        file_name: &str,
        bytes: &[u8],
    ) -> PhotoStoreResult<String> {
        if bytes.is_empty() {
            return Err(PhotoStoreError::EmptyPayload);
        }
        let extension = photo_extension(file_name)
            .ok_or_else(|| PhotoStoreError::UnsupportedFileType(file_name.to_string()))?;

        let dir = self.owner_dir(scope);
        let path = dir.join(format!("{}.{extension}", Uuid::new_v4()));
        let written = fs::create_dir_all(&dir).and_then(|()| fs::write(&path, bytes));
        if let Err(err) = written {
            error!(
                "event=photo_upload module=media status=error scope={} error_code=photo_write_failed error={}",
                scope, err
            );
            return Err(err.into());
        }

        info!(
            "event=photo_upload module=media status=ok scope={} bytes={}",
            scope,
            bytes.len()
        );
        Ok(file_url(&path))
    }
}

fn photo_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name.trim())
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// One-to-one, path-safe and case-insensitive-filesystem-safe owner segment.
///
/// `[a-z0-9-]` is kept; every other byte becomes `_xx` (lowercase hex).
fn encode_owner_segment(owner_id: &str) -> String {
    let mut encoded = String::with_capacity(owner_id.len());
    for byte in owner_id.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{byte:02x}"));
        }
    }
    encoded
}

fn file_url(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}
