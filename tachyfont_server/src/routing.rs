//! The routing table and the request dispatcher.
//!
//! Handlers in `tachyfont::routes` don't know which path they are mounted on:
//! this module owns the mapping from incoming requests to handlers, wraps every
//! request in its root span and turns handler errors into responses.
use std::sync::Arc;

use pavex::{IntoResponse, Response};
use pavex::connection::ConnectionInfo;
use pavex::http::header::ALLOW;
use pavex::http::{HeaderValue, Method};
use pavex::request::RequestHead;
use pavex::request::path::MatchedPathPattern;
use pavex::server::{Server, ServerHandle};
use pavex::telemetry::ServerRequestId;
use pavex_tracing::RootSpan;
use tachyfont::configuration::AppConfig;
use tachyfont::font_data::FontData;
use tachyfont::routes::{base, ping};
use tachyfont::telemetry;
use tracing::Instrument;

/// The path of the health check.
pub const PING_PATH: &str = "/api/ping";
/// The pattern recorded on the root span for base font requests.
///
/// The font endpoint is mounted on every path that doesn't match another route:
/// it validates the path shape on its own.
pub const BASE_FONT_PATTERN: &str = "/{font_id}/base";

/// Both routes only serve reads.
const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::HEAD];

/// The long-lived components shared by all requests.
#[derive(Clone)]
pub struct ApplicationState {
    font_data: Arc<dyn FontData>,
}

impl ApplicationState {
    pub fn new(font_data: Arc<dyn FontData>) -> Self {
        Self { font_data }
    }
}

/// Build the application state from the configuration.
pub fn build_application_state(config: &AppConfig) -> ApplicationState {
    ApplicationState::new(config.fonts_config().font_data())
}

struct ServerState {
    router: matchit::Router<Route>,
    application_state: ApplicationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Ping,
}

/// Start serving requests on the listeners registered with `server_builder`.
pub fn run(server_builder: Server, application_state: ApplicationState) -> ServerHandle {
    let server_state = Arc::new(ServerState {
        router: build_router(),
        application_state,
    });
    server_builder.serve(route_request, server_state)
}

fn build_router() -> matchit::Router<Route> {
    let mut router = matchit::Router::new();
    // The route paths are static and don't conflict with each other,
    // therefore `insert` can't fail.
    router
        .insert(PING_PATH, Route::Ping)
        .expect("Failed to register the health check route");
    router
}

async fn route_request(
    request: http::Request<hyper::body::Incoming>,
    _connection_info: Option<ConnectionInfo>,
    server_state: Arc<ServerState>,
) -> Response {
    // None of our routes reads the request body.
    let (request_head, _request_body) = request.into_parts();
    let request_head: RequestHead = request_head.into();
    let route = server_state
        .router
        .at(request_head.target.path())
        .ok()
        .map(|matched| *matched.value);
    let matched_path_pattern = match route {
        Some(Route::Ping) => MatchedPathPattern::new(PING_PATH),
        None => MatchedPathPattern::new(BASE_FONT_PATTERN),
    };

    let root_span = telemetry::root_span(
        &request_head,
        matched_path_pattern,
        ServerRequestId::generate(),
    );
    let response = dispatch(
        route,
        &request_head,
        &server_state.application_state,
        &root_span,
    )
    .instrument(root_span.clone().into_inner())
    .await;
    telemetry::response_logger(response, &root_span)
}

async fn dispatch(
    route: Option<Route>,
    request_head: &RequestHead,
    application_state: &ApplicationState,
    root_span: &RootSpan,
) -> Response {
    if !ALLOWED_METHODS.contains(&request_head.method) {
        return method_not_allowed();
    }
    match route {
        Some(Route::Ping) => ping::get().into_response(),
        None => match base::get(request_head, application_state.font_data.as_ref()).await {
            Ok(response) => response,
            Err(e) => {
                telemetry::error_logger(&e, root_span);
                e.to_response()
            }
        },
    }
}

fn method_not_allowed() -> Response {
    Response::method_not_allowed().insert_header(ALLOW, HeaderValue::from_static("GET, HEAD"))
}
