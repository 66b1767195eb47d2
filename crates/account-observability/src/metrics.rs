use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

/// Prometheus collectors for the Account App.
///
/// Each instance owns its registry, so tests can build as many as they like.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_total_by_route: IntCounterVec,
    pub http_request_duration_seconds_by_route: HistogramVec,

    /// Authorization code pages rendered.
    pub account_code_views_total: IntCounter,
    /// Code page visits without a code, redirected back to the account root.
    pub account_code_redirects_total: IntCounter,
    /// Login attempts by outcome (`success`, `invalid_credentials`, `invalid_request`).
    pub account_logins_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_total_by_route = IntCounterVec::new(
            Opts::new(
                "http_requests_by_route_total",
                "HTTP requests by method, route and status",
            ),
            &["method", "route", "status"],
        )?;
        let http_request_duration_seconds_by_route = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_by_route_seconds",
                "HTTP request latency by method, route and status",
            ),
            &["method", "route", "status"],
        )?;

        let account_code_views_total = IntCounter::new(
            "account_code_views_total",
            "Authorization code pages rendered",
        )?;
        let account_code_redirects_total = IntCounter::new(
            "account_code_redirects_total",
            "Authorization code page visits without a code",
        )?;
        let account_logins_total = IntCounterVec::new(
            Opts::new("account_logins_total", "Login attempts by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total_by_route.clone()))?;
        registry.register(Box::new(http_request_duration_seconds_by_route.clone()))?;
        registry.register(Box::new(account_code_views_total.clone()))?;
        registry.register(Box::new(account_code_redirects_total.clone()))?;
        registry.register(Box::new(account_logins_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_total_by_route,
            http_request_duration_seconds_by_route,
            account_code_views_total,
            account_code_redirects_total,
            account_logins_total,
        })
    }

    /// Record one finished request against its route pattern.
    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        let labels = [method, route, status.as_str()];
        let seconds = elapsed.as_secs_f64();

        self.http_request_duration_seconds.observe(seconds);
        self.http_requests_total_by_route
            .with_label_values(&labels)
            .inc();
        self.http_request_duration_seconds_by_route
            .with_label_values(&labels)
            .observe(seconds);
    }
}
