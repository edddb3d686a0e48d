//! Shared helpers for driving routers in tests

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

pub(crate) async fn send(app: Router, req: Request<Body>) -> Response {
    match app.oneshot(req).await {
        Ok(resp) => resp,
        Err(e) => panic!("handler error: {e}"),
    }
}

pub(crate) async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
        Ok(b) => b,
        Err(e) => panic!("failed to read body: {e}"),
    };
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("invalid JSON: {e}"),
    }
}

/// One part of a hand-built multipart/form-data body
pub(crate) struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

pub(crate) const BOUNDARY: &str = "studio-test-boundary";

/// Encode `parts` as a multipart/form-data POST to `uri`
pub(crate) fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    match Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
    {
        Ok(r) => r,
        Err(e) => panic!("failed to build request: {e}"),
    }
}
