use crate::helpers::TestApi;
use pavex::http::StatusCode;
use pavex::http::header::{ALLOW, CONTENT_TYPE};

const OTTO: [u8; 4] = [0x4F, 0x54, 0x54, 0x4F];

#[tokio::test]
async fn the_base_blob_is_returned_verbatim() {
    let api = TestApi::spawn().await;
    api.add_font("myfont123", &OTTO);

    let response = api.get_base("myfont123").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/binary"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), &OTTO);
}

#[tokio::test]
async fn repeated_requests_get_identical_responses() {
    let api = TestApi::spawn().await;
    let blob: Vec<u8> = (0..=255).cycle().take(64 * 1024).collect();
    api.add_font("NotoSansJP-Thin", &blob);

    let first = api.get_base("NotoSansJP-Thin").await.bytes().await.unwrap();
    let second = api.get_base("NotoSansJP-Thin").await.bytes().await.unwrap();

    assert_eq!(first.as_ref(), blob.as_slice());
    assert_eq!(first, second);
}

#[tokio::test]
async fn trailing_segments_are_ignored() {
    let api = TestApi::spawn().await;
    api.add_font("myfont123", &OTTO);

    for path in ["/myfont123/base/", "/myfont123/base/extra"] {
        let response = api.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(response.bytes().await.unwrap().as_ref(), &OTTO, "{path}");
    }
}

#[tokio::test]
async fn malformed_paths_are_a_bad_request() {
    let api = TestApi::spawn().await;
    api.add_font("myfont123", &OTTO);

    for path in ["/base", "/myfont123", "/myfont123/notbase", "/"] {
        let response = api.get(path).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
    }
}

#[tokio::test]
async fn unknown_fonts_are_not_found() {
    let api = TestApi::spawn().await;

    let response = api.get_base("myfont123").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_font_identifiers_are_rejected() {
    let api = TestApi::spawn().await;

    let response = api.get("//base").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn head_requests_are_allowed() {
    let api = TestApi::spawn().await;
    api.add_font("myfont123", &OTTO);

    let response = api.request(reqwest::Method::HEAD, "/myfont123/base").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/binary"
    );
}

#[tokio::test]
async fn writes_are_not_allowed() {
    let api = TestApi::spawn().await;
    api.add_font("myfont123", &OTTO);

    let response = api.request(reqwest::Method::POST, "/myfont123/base").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(ALLOW).unwrap(), "GET, HEAD");
}

#[tokio::test]
async fn percent_encoded_identifiers_are_decoded() {
    let api = TestApi::spawn().await;
    api.add_font("my font", &OTTO);

    let response = api.get("/my%20font/base").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), &OTTO);
}

#[tokio::test]
async fn encoded_separators_are_a_bad_request() {
    let api = TestApi::spawn().await;
    api.add_font("a", &OTTO);

    let response = api.get("/a%2Fb/base").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
