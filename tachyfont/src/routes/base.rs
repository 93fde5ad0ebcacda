//! Serve the base blob of a font.
//!
//! The endpoint expects paths shaped as `/<font id>/base`.
//! The path is percent-decoded before being split, so `%2F` can't smuggle a
//! separator into the font identifier.
//! The font identifier is forwarded verbatim to the [`FontData`] store: it is
//! up to the store to reject identifiers it can't handle.
use crate::font_data::{FontData, FontDataError};
use bytes::Bytes;
use pavex::Response;
use pavex::http::HeaderValue;
use pavex::request::RequestHead;
use pavex::response::body::TypedBody;
use pavex::response::body::raw::Full;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// The literal segment that must follow the font identifier.
pub const BASE_SEGMENT: &str = "base";

/// The `Content-Type` of a successful response.
///
/// TachyFont clients don't look at it, they parse the blob themselves.
pub const FONT_BASE_CONTENT_TYPE: &str = "application/binary";

/// Retrieve the base blob of the font named in the request path.
pub async fn get(
    request_head: &RequestHead,
    font_data: &dyn FontData,
) -> Result<Response, BaseFontError> {
    let blob = get_base(request_head.target.path(), font_data).await?;
    Ok(Response::ok().set_typed_body(blob))
}

/// Validate `path` and fetch the base blob of the font it refers to.
///
/// `path` is expected to be percent-encoded, as it appears in the request target.
/// The store is only queried if `path` is well-formed.
#[tracing::instrument(name = "Retrieve font base", skip(font_data))]
pub async fn get_base(path: &str, font_data: &dyn FontData) -> Result<FontBlob, BaseFontError> {
    let decoded = decode_path(path)?;
    let base_path = BasePath::parse(&decoded)?;
    let font_id = base_path.font_id();
    let blob = font_data
        .base(font_id)
        .await
        .map_err(|source| BaseFontError::BlobLookupFailure {
            font_id: font_id.to_owned(),
            source,
        })?;
    Ok(FontBlob(blob))
}

/// Percent-decode `path`.
///
/// Paths that don't decode to valid UTF-8 are malformed.
pub fn decode_path(path: &str) -> Result<Cow<'_, str>, MalformedRequest> {
    percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| MalformedRequest {
            path: path.to_owned(),
        })
}

/// A request path that matched the `/<font id>/base` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePath<'a> {
    font_id: &'a str,
}

impl<'a> BasePath<'a> {
    /// Split `path` on `/` and check its shape.
    ///
    /// Trailing empty segments are dropped before checking, therefore
    /// `/myfont/base/` is accepted.
    /// Anything past the `base` segment is ignored.
    pub fn parse(path: &'a str) -> Result<Self, MalformedRequest> {
        let mut segments: Vec<&str> = path.split('/').collect();
        while segments.last() == Some(&"") {
            segments.pop();
        }
        match segments.as_slice() {
            ["", font_id, BASE_SEGMENT, ..] => Ok(Self { font_id: *font_id }),
            _ => Err(MalformedRequest {
                path: path.to_owned(),
            }),
        }
    }

    /// The (unvalidated) font identifier.
    pub fn font_id(&self) -> &'a str {
        self.font_id
    }
}

/// The base blob of a font, ready to be sent back to the caller.
#[derive(Debug, Clone)]
pub struct FontBlob(Bytes);

impl FontBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TypedBody for FontBlob {
    type Body = Full<Bytes>;

    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(FONT_BASE_CONTENT_TYPE)
    }

    fn body(self) -> Self::Body {
        Full::new(self.0)
    }
}

/// The request path doesn't match `/<font id>/base`.
#[derive(Debug, thiserror::Error)]
#[error("`{path}` is not a valid font base path. Expected `/<font id>/{BASE_SEGMENT}`")]
pub struct MalformedRequest {
    path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BaseFontError {
    #[error(transparent)]
    MalformedRequest(#[from] MalformedRequest),
    #[error("Failed to retrieve the base blob of font `{font_id}`")]
    BlobLookupFailure {
        font_id: String,
        #[source]
        source: FontDataError,
    },
}

impl BaseFontError {
    /// Convert [`BaseFontError`] into an HTTP response.
    ///
    /// Storage failures get a generic message: their details are only
    /// available in the logs.
    pub fn to_response(&self) -> Response {
        match self {
            BaseFontError::MalformedRequest(e) => {
                Response::bad_request().set_typed_body(e.to_string())
            }
            BaseFontError::BlobLookupFailure { source, .. } => match source {
                FontDataError::UnknownFont { .. } => {
                    Response::not_found().set_typed_body(source.to_string())
                }
                FontDataError::InvalidFontId { .. } => {
                    Response::bad_request().set_typed_body(source.to_string())
                }
                FontDataError::Storage(_) => Response::internal_server_error()
                    .set_typed_body("Something went wrong. Please retry later."),
            },
        }
    }
}
