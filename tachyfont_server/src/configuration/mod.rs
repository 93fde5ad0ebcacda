//! Refer to Pavex's [configuration guide](https://pavex.dev/docs/guide/configuration) for more details
//! on how to manage configuration values.
mod profile;
mod schema;

pub use profile::ApplicationProfile;
pub use schema::{Config, ServerConfig};
