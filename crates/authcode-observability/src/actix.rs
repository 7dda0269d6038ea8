//! Actix-web middleware feeding [`Metrics`] with per-request counters and latencies.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use crate::Metrics;

/// Route label for requests that matched no resource; keeps label cardinality bounded.
const UNMATCHED_ROUTE: &str = "unmatched";

pub struct MetricsMiddleware {
    metrics: Metrics,
}

impl MetricsMiddleware {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsService {
            inner: Rc::new(service),
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestMetricsService<S> {
    inner: Rc<S>,
    metrics: Metrics,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let inner = Rc::clone(&self.inner);
        let metrics = self.metrics.clone();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

        metrics.http_requests_total.inc();

        Box::pin(async move {
            let outcome = inner.call(req).await;
            let status = match &outcome {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            metrics.observe_request(&method, &route, status.as_u16(), started.elapsed());
            outcome
        })
    }
}
