//! Per-client-IP token bucket, grounded on the keyed `governor::RateLimiter`
//! usage in `Qovery-engine`'s cloud storage services (there applied to
//! outbound API calls; here to inbound requests). Default 5 req/s, burst 10,
//! per spec.md §5.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;

pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

pub fn build_limiter() -> Arc<IpRateLimiter> {
    let quota = Quota::per_second(nonzero!(5u32)).allow_burst(nonzero!(10u32));
    Arc::new(RateLimiter::keyed(quota))
}

pub async fn enforce(
    State(limiter): State<Arc<IpRateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    if limiter.check_key(&addr.ip()).is_err() {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }
    next.run(request).await
}
