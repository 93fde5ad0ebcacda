/// The error returned by [`FontData::base`](super::FontData::base).
#[derive(Debug, thiserror::Error)]
pub enum FontDataError {
    #[error("There is no font named `{font_id}`")]
    UnknownFont { font_id: String },
    #[error("`{font_id}` is not a valid font identifier")]
    InvalidFontId { font_id: String },
    #[error("Failed to access the font storage")]
    Storage(#[from] anyhow::Error),
}

impl FontDataError {
    /// Shorthand for building a [`FontDataError::UnknownFont`].
    pub fn unknown_font(font_id: &str) -> Self {
        FontDataError::UnknownFont {
            font_id: font_id.to_owned(),
        }
    }
}
