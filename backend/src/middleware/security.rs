//! Security response headers.

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;

/// Content security policy sent by containerised deployments.
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'";

/// Headers added to every response unless a handler already set them.
///
/// The content security policy is only sent when `containerised` is set.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userdesk::middleware::security::security_headers;
///
/// let app = App::new().wrap(security_headers(false));
/// ```
pub fn security_headers(containerised: bool) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .add((header::REFERRER_POLICY, "strict-origin-when-cross-origin"));
    if containerised {
        headers.add((header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY))
    } else {
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[actix_web::test]
    async fn adds_baseline_headers(#[case] containerised: bool) {
        let app = test::init_service(
            App::new()
                .wrap(security_headers(containerised))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let headers = res.headers();

        assert_eq!(
            headers.get(header::X_CONTENT_TYPE_OPTIONS).map(|v| v.as_bytes()),
            Some(&b"nosniff"[..])
        );
        assert_eq!(
            headers.get(header::X_FRAME_OPTIONS).map(|v| v.as_bytes()),
            Some(&b"SAMEORIGIN"[..])
        );
        assert!(headers.contains_key(header::REFERRER_POLICY));
        assert_eq!(
            headers.contains_key(header::CONTENT_SECURITY_POLICY),
            containerised
        );
    }
}
