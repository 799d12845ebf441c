use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use std::env;
use tower_http::set_header::SetResponseHeaderLayer;

const PERMISSIONS_POLICY: &str = "permissions-policy";
const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const XSS_BLOCK: &str = "1; mode=block";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const PERMISSIONS_POLICY_VALUE: &str = "geolocation=(), microphone=(), camera=()";

/// Response headers added to every API answer.
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeaders {
    include_hsts: bool,
}

impl SecurityHeaders {
    pub fn new(include_hsts: bool) -> Self {
        Self { include_hsts }
    }

    pub fn from_env() -> Self {
        let is_production = env::var("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        if is_production {
            tracing::info!("Security: HSTS header enabled (production mode)");
        } else {
            tracing::info!("Security: HSTS header disabled (development mode)");
        }

        Self::new(is_production)
    }

    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static(NOSNIFF)),
            (header::X_FRAME_OPTIONS, HeaderValue::from_static(DENY)),
            (header::X_XSS_PROTECTION, HeaderValue::from_static(XSS_BLOCK)),
            (
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(CSP_API_VALUE),
            ),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static(REFERRER_POLICY_VALUE),
            ),
            (
                HeaderName::from_static(PERMISSIONS_POLICY),
                HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
            ),
        ];

        // Only meaningful behind HTTPS.
        if self.include_hsts {
            headers.push((
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_static(HSTS_VALUE),
            ));
        }
        headers
    }

    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.headers()
            .into_iter()
            .fold(router, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::overriding(name, value))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    #[test]
    fn test_hsts_only_when_requested() {
        let dev = SecurityHeaders::new(false).headers();
        assert!(!dev
            .iter()
            .any(|(name, _)| *name == header::STRICT_TRANSPORT_SECURITY));

        let prod = SecurityHeaders::new(true).headers();
        assert!(prod
            .iter()
            .any(|(name, _)| *name == header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_headers_are_set_on_responses() {
        let app = SecurityHeaders::new(false).apply(Router::new().route("/", get(|| async { "ok" })));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router answers");

        let headers = response.headers();
        assert_eq!(headers.get(header::X_FRAME_OPTIONS), Some(&HeaderValue::from_static(DENY)));
        assert_eq!(
            headers.get(PERMISSIONS_POLICY),
            Some(&HeaderValue::from_static(PERMISSIONS_POLICY_VALUE))
        );
        assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }
}
