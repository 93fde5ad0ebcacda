use crate::configuration::ApplicationProfile;
use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use pavex::server::IncomingStream;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tachyfont::configuration::AppConfig;

#[derive(serde::Deserialize, Debug, Clone)]
/// The top-level configuration object, matching the files stored
/// under `tachyfont_server/configuration`.
///
/// It bundles together the application configuration ([`AppConfig`]),
/// visible to the request handlers, and the HTTP server configuration
/// ([`ServerConfig`]), only used by the `api` entrypoint.
pub struct Config {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub app: AppConfig,
}

impl Config {
    /// Retrieve the configuration by merging multiple configuration sources.
    ///
    /// # Hierarchy
    ///
    /// The configuration sources are, in increasing priority order:
    ///
    /// 1. `base.yml`, the values shared by all profiles.
    /// 2. `<profile>.yml`, the values specific to the current [`ApplicationProfile`].
    /// 3. Environment variables.
    ///
    /// # Environment variables
    ///
    /// Every configuration value can be overridden with an environment variable
    /// prefixed by `APP_`. Nested fields are separated by a double underscore,
    /// e.g. `APP_SERVER__PORT` for [`ServerConfig::port`] and
    /// `APP_FONTS__ROOT_DIR` for the font data location.
    ///
    /// # Font data location
    ///
    /// A relative `fonts.root_dir` is resolved against the directory of this crate,
    /// so that the server can be launched from any working directory.
    pub fn load(default_profile: Option<ApplicationProfile>) -> Result<Config, anyhow::Error> {
        let application_profile = ApplicationProfile::load(default_profile)
            .context("Failed to load the desired application profile")?;

        let configuration_dir = crate_dir().join("configuration");
        let base_filepath = configuration_dir.join("base.yml");
        let profile_filepath =
            configuration_dir.join(format!("{}.yml", application_profile.as_str()));

        let figment = Figment::new()
            .merge(Yaml::file(base_filepath))
            .merge(Yaml::file(profile_filepath))
            .merge(Env::prefixed("APP_").split("__"));

        let mut configuration: Config = figment
            .extract()
            .context("Failed to load hierarchical configuration")?;
        configuration.app.fonts.root_dir = resolve(&configuration.app.fonts.root_dir);
        Ok(configuration)
    }
}

fn crate_dir() -> &'static Path {
    Path::new(env!(
        "CARGO_MANIFEST_DIR",
        "`CARGO_MANIFEST_DIR` was not set. Are you using a custom build system?"
    ))
}

/// Absolute paths are left untouched.
fn resolve(path: &Path) -> PathBuf {
    crate_dir().join(path)
}

#[derive(serde::Deserialize, Debug, Clone)]
/// Configuration for the HTTP server used to expose the font endpoint.
pub struct ServerConfig {
    /// The port that the server must listen on.
    ///
    /// Set the `APP_SERVER__PORT` environment variable to override its value.
    #[serde(deserialize_with = "serde_aux::field_attributes::deserialize_number_from_string")]
    pub port: u16,
    /// The network interface that the server must be bound to.
    ///
    /// E.g. `0.0.0.0` for listening to incoming requests from
    /// all sources.
    ///
    /// Set the `APP_SERVER__IP` environment variable to override its value.
    pub ip: std::net::IpAddr,
    /// How long in-flight requests are given to complete when the server is asked
    /// to shut down, e.g. `30 seconds`.
    ///
    /// Set the `APP_SERVER__GRACEFUL_SHUTDOWN_TIMEOUT` environment variable to override its value.
    #[serde(with = "humantime_serde")]
    pub graceful_shutdown_timeout: std::time::Duration,
}

impl ServerConfig {
    /// Bind a TCP listener according to the specified parameters.
    pub async fn listener(&self) -> Result<IncomingStream, std::io::Error> {
        let addr = SocketAddr::new(self.ip, self.port);
        IncomingStream::bind(addr).await
    }
}
