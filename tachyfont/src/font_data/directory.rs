use super::{BASE_ENTRY, FontData, FontDataError, ensure_path_safe};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`FontData`] implementation backed by a directory tree.
///
/// Every font gets its own sub-directory, named after its identifier:
///
/// ```text
/// <root>/
/// ├── NotoSansJP-Thin/
/// │   └── base
/// └── NotoSansKR-Regular/
///     └── base
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryFontData {
    root: PathBuf,
}

impl DirectoryFontData {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the data of every font.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn base_path(&self, font_id: &str) -> PathBuf {
        self.root.join(font_id).join(BASE_ENTRY)
    }
}

#[async_trait::async_trait]
impl FontData for DirectoryFontData {
    #[tracing::instrument(name = "Read font base from directory", skip(self))]
    async fn base(&self, font_id: &str) -> Result<Bytes, FontDataError> {
        ensure_path_safe(font_id)?;
        let path = self.base_path(font_id);
        match fs_err::tokio::read(&path).await {
            Ok(buffer) => Ok(Bytes::from(buffer)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Err(FontDataError::unknown_font(font_id))
            }
            Err(e) => Err(FontDataError::Storage(
                anyhow::Error::new(e)
                    .context(format!("Failed to read the base blob of font `{font_id}`")),
            )),
        }
    }
}
