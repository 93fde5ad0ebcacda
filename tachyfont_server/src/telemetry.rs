use crate::configuration::ApplicationProfile;
use anyhow::Context;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines, for local development.
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

impl From<ApplicationProfile> for LogFormat {
    fn from(profile: ApplicationProfile) -> Self {
        match profile {
            ApplicationProfile::Dev => LogFormat::Pretty,
            ApplicationProfile::Prod => LogFormat::Json,
        }
    }
}

/// Compose multiple layers into a `tracing` subscriber.
///
/// `default_env_filter` is used when the `RUST_LOG` environment variable is not set.
/// Log lines are written to `sink`.
pub fn get_subscriber<Sink>(
    default_env_filter: String,
    format: LogFormat,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_env_filter));
    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .with_writer(sink)
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_writer(sink).boxed(),
    };
    Registry::default().with(env_filter).with(fmt_layer)
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once!
pub fn init_telemetry(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> Result<(), anyhow::Error> {
    // Redirect events emitted via the `log` crate to `tracing`.
    LogTracer::init().context("Failed to redirect `log` events to `tracing`")?;
    set_global_default(subscriber).context("Failed to set a global `tracing` subscriber")?;
    Ok(())
}
