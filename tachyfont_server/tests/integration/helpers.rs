use pavex::server::Server;
use std::sync::Once;
use tachyfont::configuration::FontBackend;
use tachyfont_server::configuration::{ApplicationProfile, Config};
use tachyfont_server::routing::{build_application_state, run};
use tempfile::TempDir;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

pub struct TestApi {
    pub api_address: String,
    pub api_client: reqwest::Client,
    /// Where the fonts served by this instance are stored.
    /// It's deleted when [`TestApi`] is dropped.
    pub fonts_dir: TempDir,
}

impl TestApi {
    pub async fn spawn() -> Self {
        Self::init_telemetry();
        let fonts_dir = tempfile::tempdir().expect("Failed to create the fonts directory");
        let config = Self::get_config(&fonts_dir);

        let application_state = build_application_state(&config.app);

        let tcp_listener = config
            .server
            .listener()
            .await
            .expect("Failed to bind the server TCP listener");
        let address = tcp_listener
            .local_addr()
            .expect("The server TCP listener doesn't have a local socket address");
        let server_builder = Server::new().listen(tcp_listener);

        tokio::spawn(async move { run(server_builder, application_state).await });

        TestApi {
            api_address: format!("http://{}:{}", config.server.ip, address.port()),
            api_client: reqwest::Client::new(),
            fonts_dir,
        }
    }

    /// Load the dev configuration and tweak it to ensure that tests are
    /// properly isolated from each other.
    fn get_config(fonts_dir: &TempDir) -> Config {
        let mut config =
            Config::load(Some(ApplicationProfile::Dev)).expect("Failed to load test configuration");
        // We use port `0` to get the operating system to assign us a random port.
        // This lets us run tests in parallel without running into "port X is already in use"
        // errors.
        config.server.port = 0;
        config.app.fonts.backend = FontBackend::Directory;
        config.app.fonts.root_dir = fonts_dir.path().to_owned();
        config
    }

    fn init_telemetry() {
        // Initialize the telemetry setup at most once.
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")),
                    )
                    .finish();
                // We don't redirect panic messages to the `tracing` subsystem because
                // we want to see them in the test output.
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }

    /// Store `base` as the base blob of `font_id`.
    pub fn add_font(&self, font_id: &str, base: &[u8]) {
        let font_dir = self.fonts_dir.path().join(font_id);
        fs_err::create_dir_all(&font_dir).expect("Failed to create the font directory");
        fs_err::write(font_dir.join("base"), base).expect("Failed to write the font base");
    }
}

/// Convenient methods for calling the API under test.
impl TestApi {
    pub async fn get_ping(&self) -> reqwest::Response {
        self.get(tachyfont_server::routing::PING_PATH).await
    }

    pub async fn get_base(&self, font_id: &str) -> reqwest::Response {
        self.get(&format!("/{font_id}/base")).await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.request(reqwest::Method::GET, path).await
    }

    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.api_client
            .request(method, format!("{}{}", &self.api_address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
