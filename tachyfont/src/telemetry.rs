use pavex::Response;
use pavex::request::RequestHead;
use pavex::request::path::MatchedPathPattern;
use pavex::telemetry::ServerRequestId;
use pavex_tracing::RootSpan;
use pavex_tracing::fields::{
    ERROR_DETAILS, ERROR_MESSAGE, ERROR_SOURCE_CHAIN, HTTP_REQUEST_METHOD, HTTP_REQUEST_SERVER_ID,
    HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE, NETWORK_PROTOCOL_VERSION, URL_PATH, URL_QUERY,
    USER_AGENT_ORIGINAL, error_details, error_message, error_source_chain, http_request_method,
    http_request_server_id, http_response_status_code, http_route, network_protocol_version,
    url_path, url_query, user_agent_original,
};
use tokio::task::JoinHandle;
use tracing_log_error::log_error;

/// Construct a new root span for the given request.
pub fn root_span(
    request_head: &RequestHead,
    matched_path_pattern: MatchedPathPattern,
    request_id: ServerRequestId,
) -> RootSpan {
    // We use the `{ <expr> }` syntax to tell `tracing` that it should
    // interpret those identifiers as expressions rather than string literals.
    let span = tracing::info_span!(
        "HTTP request",
        { HTTP_REQUEST_METHOD } = http_request_method(request_head),
        { HTTP_REQUEST_SERVER_ID } = http_request_server_id(request_id),
        { HTTP_ROUTE } = http_route(matched_path_pattern),
        { NETWORK_PROTOCOL_VERSION } = network_protocol_version(request_head),
        { URL_QUERY } = url_query(request_head),
        { URL_PATH } = url_path(request_head),
        { USER_AGENT_ORIGINAL } = user_agent_original(request_head),
        // Populated later by `response_logger` and, on failure, `error_logger`.
        // `tracing` requires all fields to be declared when the span is created.
        { HTTP_RESPONSE_STATUS_CODE } = tracing::field::Empty,
        { ERROR_MESSAGE } = tracing::field::Empty,
        { ERROR_DETAILS } = tracing::field::Empty,
        { ERROR_SOURCE_CHAIN } = tracing::field::Empty,
    );
    RootSpan::new(span)
}

/// Enrich [`RootSpan`] with information extracted from the outgoing response.
pub fn response_logger(response: Response, root_span: &RootSpan) -> Response {
    root_span.record(
        HTTP_RESPONSE_STATUS_CODE,
        http_response_status_code(&response),
    );
    response
}

/// Log the details of a failed request.
///
/// It emits an error event and attaches information about the error to the root span.
pub fn error_logger<E>(e: &E, root_span: &RootSpan)
where
    E: std::error::Error,
{
    log_error!(e, "An error occurred during request handling");
    root_span.record(ERROR_MESSAGE, error_message(e));
    root_span.record(ERROR_DETAILS, error_details(e));
    root_span.record(ERROR_SOURCE_CHAIN, error_source_chain(e));
}

/// Spawn a blocking task without losing the current `tracing` span.
///
/// `tracing`'s span context is thread-local, so when a blocking task is spawned
/// the current span is lost. This function explicitly re-attaches the current
/// span to the workload in the new thread.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || current_span.in_scope(f))
}
