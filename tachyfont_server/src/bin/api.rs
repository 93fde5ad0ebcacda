use anyhow::Context;
use pavex::server::{Server, ServerHandle, ShutdownMode};
use pavex_tracing::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};
use std::time::Duration;
use tachyfont_server::{
    configuration::{ApplicationProfile, Config},
    routing::{build_application_state, run},
    telemetry::{LogFormat, get_subscriber, init_telemetry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if it exists.
    let _ = dotenvy::dotenv();

    // An invalid profile is reported by `Config::load` later on.
    let log_format = ApplicationProfile::load(Some(ApplicationProfile::Dev))
        .map(LogFormat::from)
        .unwrap_or(LogFormat::Pretty);
    let subscriber = get_subscriber("info".into(), log_format, std::io::stdout);
    init_telemetry(subscriber)?;

    // We isolate all the server setup and launch logic in a separate function
    // in order to have a single choke point where we make sure to log fatal errors
    // that will cause the application to exit.
    if let Err(e) = _main().await {
        tracing::event!(
            tracing::Level::ERROR,
            { ERROR_MESSAGE } = error_message(&e),
            { ERROR_DETAILS } = error_details(&e),
            "The application is exiting due to an error"
        )
    }

    Ok(())
}

async fn _main() -> anyhow::Result<()> {
    let config = Config::load(None)?;
    let application_state = build_application_state(&config.app);

    let tcp_listener = config
        .server
        .listener()
        .await
        .context("Failed to bind the server TCP listener")?;
    let address = tcp_listener
        .local_addr()
        .context("The server TCP listener doesn't have a local socket address")?;
    let server_builder = Server::new().listen(tcp_listener);

    tracing::info!(
        fonts.backend = ?config.app.fonts.backend,
        fonts.root_dir = %config.app.fonts.root_dir.display(),
        "Starting to listen for incoming requests at {}",
        address
    );
    let server_handle = run(server_builder, application_state);
    graceful_shutdown(
        server_handle.clone(),
        config.server.graceful_shutdown_timeout,
    );
    server_handle.await;
    Ok(())
}

/// Shut the server down gracefully when a Ctrl-C signal is received.
fn graceful_shutdown(server_handle: ServerHandle, timeout: Duration) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing_log_error::log_error!(e, "Failed to listen for the Ctrl-C signal");
            return;
        }
        tracing::info!("Received Ctrl-C, shutting down gracefully");
        server_handle
            .shutdown(ShutdownMode::Graceful { timeout })
            .await;
    });
}
