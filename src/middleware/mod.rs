//! Response injection middleware
//!
//! For applications that produce their own HTML instead of registering
//! templates: buffer the downstream response and splice the generated
//! asset tags in just before the closing head tag.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::Error;
use crate::handler::Handler;

/// Marker the [`inject`] middleware splices tags in front of.
pub const HEAD_MARKER: &str = "</head>";

/// Insert `html` immediately before the first occurrence of `marker`.
///
/// Only the first occurrence counts; a marker that never occurs is an
/// error.
pub fn inject_fragment(content: &[u8], marker: &str, html: &str) -> Result<Vec<u8>, Error> {
    if marker.is_empty() {
        return Err(Error::MarkerNotFound(marker.to_string()));
    }

    let Some(pos) = content
        .windows(marker.len())
        .position(|window| window == marker.as_bytes())
    else {
        return Err(Error::MarkerNotFound(marker.to_string()));
    };

    let mut out = Vec::with_capacity(content.len() + html.len());
    out.extend_from_slice(&content[..pos]);
    out.extend_from_slice(html.as_bytes());
    out.extend_from_slice(&content[pos..]);
    Ok(out)
}

/// axum middleware injecting the handler's asset tags into downstream HTML.
///
/// Wire it up with `axum::middleware::from_fn_with_state(handler, inject)`.
/// The downstream response is buffered whole; a response without a
/// `</head>` marker is answered with an internal error.
pub async fn inject(State(handler): State<Handler>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let (mut parts, body) = response.into_parts();

    let content = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(error = %err, "failed to buffer downstream response");
            return internal_error();
        }
    };

    let tags = match handler.fragment_tags() {
        Ok(tags) => tags,
        Err(err) => {
            error!(error = %err, "failed to generate asset tags");
            return internal_error();
        }
    };

    match inject_fragment(&content, HEAD_MARKER, &tags) {
        Ok(rewritten) => {
            // The body length changed; let the server recompute it.
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(rewritten))
        }
        Err(err) => {
            error!(error = %err, "failed to inject asset tags");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
