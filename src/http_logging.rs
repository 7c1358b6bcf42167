//! Per-request logging for the HTTP surface.
//!
//! Every request runs inside an `http.request` span carrying a short request
//! id, so handler spans and store logs nest under it. The same id is echoed
//! back in the `x-request-id` response header.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderName, HeaderValue, Request, Response};
use tower::{Layer, Service};
use tracing::{info, info_span, warn, Instrument};

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Short id correlating the log lines of one request.
#[must_use]
pub fn generate_request_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// A Tower layer that logs HTTP requests and responses.
#[derive(Clone, Copy)]
pub struct HttpLoggingLayer;

impl<S> Layer<S> for HttpLoggingLayer {
    type Service = HttpLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpLoggingService { inner }
    }
}

/// A Tower service that logs HTTP requests and responses.
#[derive(Clone)]
pub struct HttpLoggingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let request_id = generate_request_id();
        let span = info_span!(
            "http.request",
            request_id = %request_id,
            http.method = %req.method(),
            http.path = %req.uri().path(),
        );

        // Drive the clone that was polled ready, leave a fresh one behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                info!("HTTP request started");
                let mut result = inner.call(req).await;
                let duration_ms = start.elapsed().as_millis();

                match &mut result {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_server_error() {
                            warn!(
                                http.status = status.as_u16(),
                                duration_ms = %duration_ms,
                                "HTTP request failed"
                            );
                        } else {
                            info!(
                                http.status = status.as_u16(),
                                duration_ms = %duration_ms,
                                "HTTP request completed"
                            );
                        }
                        if let Ok(value) = HeaderValue::from_str(&request_id) {
                            response
                                .headers_mut()
                                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                        }
                    }
                    Err(_) => {
                        warn!(duration_ms = %duration_ms, "HTTP request errored");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
