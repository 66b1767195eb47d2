use std::time::Instant;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error};

use crate::Metrics;

/// Route label shared by every request no resource matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Request metrics middleware, for use with `actix_web::middleware::from_fn`.
///
/// Reads the app's `web::Data<Metrics>`; apps without one are passed through.
/// Requests are labelled by matched route pattern (`/oauth/code`, not the raw
/// path with its token) so the label set stays bounded.
pub async fn track_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let Some(metrics) = req.app_data::<web::Data<Metrics>>().cloned() else {
        return next.call(req).await;
    };

    let method = req.method().clone();
    let started = Instant::now();
    metrics.http_requests_total.inc();

    let res = next.call(req).await?;

    let route = res
        .request()
        .match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
    metrics.observe_request(
        method.as_str(),
        &route,
        res.status().as_u16(),
        started.elapsed(),
    );

    Ok(res)
}
