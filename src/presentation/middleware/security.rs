//! Security Headers Middleware
//!
//! Adds browser hardening headers to every response. Headers already set
//! by a handler are left alone.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request, Response},
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Security headers configuration
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    /// Content-Security-Policy directive. The chat page opens a
    /// same-origin WebSocket, so `connect-src` must allow `ws:`/`wss:`.
    pub content_security_policy: String,
    /// Referrer-Policy value
    pub referrer_policy: String,
    /// X-Frame-Options value
    pub frame_options: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            content_security_policy: "default-src 'self'; connect-src 'self' ws: wss:".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            frame_options: "DENY".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        )];
        let configured = [
            (header::CONTENT_SECURITY_POLICY, &self.content_security_policy),
            (header::REFERRER_POLICY, &self.referrer_policy),
            (header::X_FRAME_OPTIONS, &self.frame_options),
        ];
        for (name, value) in configured {
            match HeaderValue::from_str(value) {
                Ok(value) => headers.push((name, value)),
                Err(_) => tracing::warn!(header = %name, "Skipping invalid security header value"),
            }
        }
        headers
    }
}

/// Layer that adds security headers to responses
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeadersLayer {
    /// Create a new security headers layer with default configuration
    pub fn new() -> Self {
        Self::with_config(SecurityHeadersConfig::default())
    }

    /// Create a security headers layer with custom configuration
    pub fn with_config(config: SecurityHeadersConfig) -> Self {
        Self {
            headers: config.headers(),
        }
    }
}

impl Default for SecurityHeadersLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Middleware service that adds security headers
#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl<S> Service<Request<Body>> for SecurityHeadersMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = self.headers.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            let target = response.headers_mut();
            for (name, value) in headers {
                target.entry(name).or_insert(value);
            }
            Ok(response)
        })
    }
}
