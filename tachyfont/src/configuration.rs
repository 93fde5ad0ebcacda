use crate::font_data::{DirectoryFontData, FontData, JarFontData};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(serde::Deserialize, Debug, Clone)]
/// The configuration object holding all the values required
/// to configure the application.
pub struct AppConfig {
    pub fonts: FontsConfig,
}

impl AppConfig {
    pub fn fonts_config(&self) -> &FontsConfig {
        &self.fonts
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
/// Where the font data is stored and how it is laid out on disk.
pub struct FontsConfig {
    /// The layout used to store fonts under [`FontsConfig::root_dir`].
    ///
    /// Set the `APP_FONTS__BACKEND` environment variable to override its value.
    pub backend: FontBackend,
    /// The directory holding the font data.
    ///
    /// Relative paths are resolved against the directory of the server crate
    /// when the configuration is loaded.
    ///
    /// Set the `APP_FONTS__ROOT_DIR` environment variable to override its value.
    pub root_dir: PathBuf,
}

impl FontsConfig {
    /// Build the font-data store described by this configuration.
    pub fn font_data(&self) -> Arc<dyn FontData> {
        match self.backend {
            FontBackend::Directory => Arc::new(DirectoryFontData::new(self.root_dir.clone())),
            FontBackend::Jar => Arc::new(JarFontData::new(self.root_dir.clone())),
        }
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// The on-disk layout of the font data.
pub enum FontBackend {
    /// One directory per font, `<root_dir>/<font id>/base`.
    Directory,
    /// One jar archive per font, `<root_dir>/<font id>.TachyFont.jar`,
    /// holding a `base` entry.
    Jar,
}
