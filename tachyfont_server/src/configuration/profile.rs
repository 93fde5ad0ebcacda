use anyhow::Context;
use std::env::VarError;

/// The environment the font server is running in.
///
/// The profile determines which `<profile>.yml` file is layered on top of
/// `base.yml` (see [`Config::load`]) and how logs are formatted.
///
/// [`Config::load`]: crate::configuration::Config::load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationProfile {
    /// Local development and tests.
    ///
    /// Values come from `dev.yml`, which is committed to the repository and
    /// must only hold non-sensitive values.
    Dev,
    /// Deployed environments, exposed to live traffic.
    ///
    /// Values come from `prod.yml`. Anything environment-specific (e.g. the
    /// location of the font data) should be injected via environment variables.
    Prod,
}

impl ApplicationProfile {
    /// The environment variable used to select the profile.
    pub const ENV_VAR: &'static str = "APP_PROFILE";

    /// Load the application profile from the `APP_PROFILE` environment variable.
    ///
    /// `default_profile` is used when the variable is not set.
    pub fn load(
        default_profile: Option<ApplicationProfile>,
    ) -> Result<ApplicationProfile, anyhow::Error> {
        match (std::env::var(Self::ENV_VAR), default_profile) {
            (Ok(raw_value), _) => raw_value.parse().with_context(|| {
                format!("Failed to parse the `{}` environment variable", Self::ENV_VAR)
            }),
            (Err(VarError::NotPresent), Some(default_profile)) => Ok(default_profile),
            (Err(e), _) => Err(anyhow::anyhow!(e).context(format!(
                "Failed to read the `{}` environment variable",
                Self::ENV_VAR
            ))),
        }
    }

    /// Return the profile as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationProfile::Dev => "dev",
            ApplicationProfile::Prod => "prod",
        }
    }
}

impl std::str::FromStr for ApplicationProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(ApplicationProfile::Dev),
            "prod" | "production" => Ok(ApplicationProfile::Prod),
            s => Err(anyhow::anyhow!(
                "`{s}` is not a valid application profile.\nValid options are `dev` and `prod`."
            )),
        }
    }
}
