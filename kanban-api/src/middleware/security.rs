/// Security response headers
///
/// The API only ever serves JSON, so the content policy forbids loading
/// anything at all and framing is denied outright.
///
/// Installed with `axum::middleware::from_fn_with_state`, the state being
/// whether HSTS should be sent:
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, Router};
/// use kanban_api::middleware::security::security_headers;
///
/// let app: Router = Router::new().layer(from_fn_with_state(true, security_headers));
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; frame-ancestors 'none'";
const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains";

/// Adds security headers to every response; `hsts` turns on
/// `Strict-Transport-Security`
pub async fn security_headers(State(hsts): State<bool>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    if hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
        );
    }

    response
}
