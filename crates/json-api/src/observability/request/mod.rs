//! Per-request span, request id and access log.

mod parent_context;
mod request_id;
mod route;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, field::Empty, info, info_span, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use self::request_id::RequestId;
use super::{metrics, settings};

/// Scraped or polled constantly; logging them drowns out real traffic.
const UNLOGGED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let path = req.uri().path().to_owned();

    if UNLOGGED_PATHS.iter().any(|unlogged| *unlogged == path) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let settings = settings::current();
    let started = Instant::now();

    let request_id = RequestId::from_header(req.headers().get(request_id::HEADER));

    request_id.attach(depot, res);

    let access = AccessLog {
        method: req.method().to_string(),
        route: route::template(&path),
        path,
        request_id,
    };

    let span = access.span(&req.remote_addr().to_string());

    if settings.accept_remote_parent
        && let Some(parent) = parent_context::remote_parent(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to attach upstream trace context: {source}");
    }

    let _in_flight = metrics::InFlightRequestGuard::track();

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    access.finish(
        &span,
        res.status_code.unwrap_or(StatusCode::OK),
        started.elapsed(),
        settings.slow_request,
    );
}

#[derive(Debug)]
struct AccessLog {
    method: String,
    path: String,
    route: String,
    request_id: RequestId,
}

impl AccessLog {
    /// Root span for the request; `user_uuid` is filled in by the auth hoop.
    fn span(&self, remote_addr: &str) -> Span {
        let name = format!("{} {}", self.method, self.route);

        info_span!(
            parent: None,
            "http.request",
            otel.name = %name,
            otel.kind = "server",
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            remote_addr,
            user_uuid = Empty,
            status = Empty,
            duration_ms = Empty,
        )
    }

    fn finish(&self, span: &Span, status: StatusCode, elapsed: Duration, slow_after: Duration) {
        let code = status.as_u16();
        let duration_ms = elapsed.as_millis();

        metrics::observe_request(&self.method, &self.route, code, elapsed.as_secs_f64());

        span.record("status", code);
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            if status.is_server_error() {
                error!(status = code, duration_ms, "request failed");
            } else if status.is_client_error() {
                warn!(status = code, duration_ms, "request rejected");
            } else {
                info!(status = code, duration_ms, "request completed");
            }

            if elapsed > slow_after {
                warn!(
                    duration_ms,
                    threshold_ms = slow_after.as_millis(),
                    route = %self.route,
                    "slow request"
                );
            }
        });
    }
}
