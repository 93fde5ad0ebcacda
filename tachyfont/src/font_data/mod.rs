//! Storage for font data.
//!
//! Request handlers never touch the filesystem directly: they go through
//! the [`FontData`] trait, which hides the storage layout.
//!
//! Three implementations are available out of the box:
//!
//! - [`DirectoryFontData`], one directory per font
//! - [`JarFontData`], one jar archive per font
//! - [`InMemoryFontData`], a map held in memory
pub use directory::DirectoryFontData;
pub use errors::FontDataError;
pub use in_memory::InMemoryFontData;
pub use jar::JarFontData;

mod directory;
mod errors;
mod in_memory;
mod jar;

use bytes::Bytes;

/// The name of the file (or archive entry) holding the base blob of a font.
pub const BASE_ENTRY: &str = "base";

/// A store holding the data of every font we can serve.
#[async_trait::async_trait]
pub trait FontData: Send + Sync {
    /// Retrieve the base blob of the font identified by `font_id`.
    ///
    /// `font_id` is passed through verbatim: implementations are in charge of
    /// rejecting identifiers they can't map to their storage.
    async fn base(&self, font_id: &str) -> Result<Bytes, FontDataError>;
}

/// Make sure that `font_id` can be used as a single path component.
///
/// It must not be empty, it must not refer to the current or the parent
/// directory and it must not contain path separators.
pub(crate) fn ensure_path_safe(font_id: &str) -> Result<(), FontDataError> {
    let is_safe = !font_id.is_empty()
        && font_id != "."
        && font_id != ".."
        && !font_id.contains(['/', '\\', '\0']);
    if is_safe {
        Ok(())
    } else {
        Err(FontDataError::InvalidFontId {
            font_id: font_id.to_owned(),
        })
    }
}
