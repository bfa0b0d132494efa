//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounter,
    checkout_rejections_total: IntCounterVec,
    orders_cancelled_total: IntCounter,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Why a checkout attempt was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckoutRejection {
    EmptyCart,
    Unavailable,
    OutOfStock,
}

impl CheckoutRejection {
    const fn as_label(self) -> &'static str {
        match self {
            Self::EmptyCart => "empty_cart",
            Self::Unavailable => "unavailable",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    with_metrics(|metrics| {
        let status = status_code.to_string();

        metrics
            .requests_total
            .with_label_values(&[method, route, status_class(status_code), status.as_str()])
            .inc();

        metrics
            .request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration_seconds);
    });
}

pub(crate) fn record_order_created() {
    with_metrics(|metrics| metrics.orders_created_total.inc());
}

pub(crate) fn record_checkout_rejection(reason: CheckoutRejection) {
    with_metrics(|metrics| {
        metrics
            .checkout_rejections_total
            .with_label_values(&[reason.as_label()])
            .inc();
    });
}

pub(crate) fn record_order_cancelled() {
    with_metrics(|metrics| metrics.orders_cancelled_total.inc());
}

/// Prometheus text exposition of every registered collector.
#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    match encode() {
        Ok((content_type, body)) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(body);
        }
        Err(reason) => {
            error!("failed to render metrics: {reason}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn encode() -> Result<(HeaderValue, String), String> {
    let metrics = metrics().ok_or("metrics registry unavailable")?;
    let encoder = TextEncoder::new();

    let mut buffer = Vec::new();

    encoder
        .encode(&metrics.registry.gather(), &mut buffer)
        .map_err(|source| source.to_string())?;

    let content_type =
        HeaderValue::from_str(encoder.format_type()).map_err(|source| source.to_string())?;
    let body = String::from_utf8(buffer).map_err(|source| source.to_string())?;

    Ok((content_type, body))
}

fn with_metrics(record: impl FnOnce(&Metrics)) {
    if let Some(metrics) = metrics() {
        record(metrics);
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| match build_metrics() {
            Ok(metrics) => Some(metrics),
            Err(source) => {
                error!("failed to build metrics registry: {source}");
                None
            }
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> prometheus::Result<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "storefront_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "storefront_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "storefront_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        ))?,
    )?;

    let orders_created_total = register(
        &registry,
        IntCounter::with_opts(Opts::new(
            "orders_created_total",
            "Orders successfully created from a cart.",
        ))?,
    )?;

    let checkout_rejections_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "checkout_rejections_total",
                "Checkout attempts rejected before an order was created, by reason.",
            ),
            &["reason"],
        )?,
    )?;

    let orders_cancelled_total = register(
        &registry,
        IntCounter::with_opts(Opts::new(
            "orders_cancelled_total",
            "Successful order cancellation requests, repeats included.",
        ))?,
    )?;

    Ok(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_created_total,
        checkout_rejections_total,
        orders_cancelled_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_checkout_metrics() -> TestResult {
        observe_request("GET", "/cart", 200, 0.042);
        observe_request("POST", "/orders", 400, 0.123);
        record_order_created();
        record_checkout_rejection(CheckoutRejection::OutOfStock);
        record_order_cancelled();

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        for name in [
            "storefront_json_http_requests_total",
            "storefront_json_http_request_duration_seconds",
            "storefront_json_http_requests_in_flight",
            "orders_created_total",
            "checkout_rejections_total{reason=\"out_of_stock\"}",
            "orders_cancelled_total",
        ] {
            assert!(response.contains(name), "expected {name} in metrics response");
        }

        Ok(())
    }

    #[test]
    fn status_codes_group_into_classes() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(409), "4xx");
        assert_eq!(status_class(999), "other");
    }
}
