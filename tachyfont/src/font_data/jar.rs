use super::{BASE_ENTRY, FontData, FontDataError, ensure_path_safe};
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use bytes::Bytes;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// The suffix appended to the font identifier to get the name of its archive.
pub const JAR_SUFFIX: &str = ".TachyFont.jar";

/// Upper bound on the buffer reserved upfront for the `base` entry.
///
/// The size declared in the archive is not trusted beyond this point:
/// larger entries grow the buffer while they are decompressed.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// A [`FontData`] implementation backed by one jar archive per font.
///
/// This is the layout produced by the TachyFont build tools:
///
/// ```text
/// <root>/
/// ├── NotoSansJP-Thin.TachyFont.jar
/// └── NotoSansKR-Regular.TachyFont.jar
/// ```
///
/// Each archive holds the base blob in an entry named `base`, next to the
/// glyph data used by incremental loading.
#[derive(Debug, Clone)]
pub struct JarFontData {
    root: PathBuf,
}

impl JarFontData {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the archive of every font.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn archive_path(&self, font_id: &str) -> PathBuf {
        self.root.join(format!("{font_id}{JAR_SUFFIX}"))
    }
}

#[async_trait::async_trait]
impl FontData for JarFontData {
    #[tracing::instrument(name = "Read font base from jar", skip(self))]
    async fn base(&self, font_id: &str) -> Result<Bytes, FontDataError> {
        ensure_path_safe(font_id)?;
        let path = self.archive_path(font_id);
        let font_id = font_id.to_owned();
        spawn_blocking_with_tracing(move || read_base_entry(&path, &font_id))
            .await
            .context("The task reading the font archive panicked")?
    }
}

/// Extract the `base` entry out of the archive stored at `path`.
fn read_base_entry(path: &Path, font_id: &str) -> Result<Bytes, FontDataError> {
    let file = match fs_err::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FontDataError::unknown_font(font_id));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to open the archive of font `{font_id}`"))
                .into());
        }
    };
    let mut archive = zip::ZipArchive::new(file).with_context(|| {
        format!(
            "The archive of font `{font_id}` at {} is not a valid jar",
            path.display()
        )
    })?;
    let mut entry = match archive.by_name(BASE_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            tracing::warn!(
                archive = %path.display(),
                "The font archive doesn't contain a `{BASE_ENTRY}` entry"
            );
            return Err(FontDataError::unknown_font(font_id));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to locate the base entry of font `{font_id}`"))
                .into());
        }
    };
    let mut buffer = Vec::with_capacity(preallocation_hint(entry.size()));
    entry
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to decompress the base entry of font `{font_id}`"))?;
    Ok(Bytes::from(buffer))
}

fn preallocation_hint(declared_size: u64) -> usize {
    usize::try_from(declared_size.min(MAX_PREALLOCATION)).unwrap_or(0)
}
