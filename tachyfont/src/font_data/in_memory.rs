use super::{FontData, FontDataError};
use bytes::Bytes;
use std::collections::HashMap;

/// A [`FontData`] implementation that keeps every base blob in memory.
///
/// Identifiers are matched verbatim, no validation is applied.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFontData {
    fonts: HashMap<String, Bytes>,
}

impl InMemoryFontData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the base blob of `font_id`, replacing the previous one (if any).
    pub fn insert(&mut self, font_id: impl Into<String>, base: impl Into<Bytes>) {
        self.fonts.insert(font_id.into(), base.into());
    }

    /// Builder-style version of [`InMemoryFontData::insert`].
    pub fn with_font(mut self, font_id: impl Into<String>, base: impl Into<Bytes>) -> Self {
        self.insert(font_id, base);
        self
    }
}

#[async_trait::async_trait]
impl FontData for InMemoryFontData {
    async fn base(&self, font_id: &str) -> Result<Bytes, FontDataError> {
        self.fonts
            .get(font_id)
            .cloned()
            .ok_or_else(|| FontDataError::unknown_font(font_id))
    }
}
