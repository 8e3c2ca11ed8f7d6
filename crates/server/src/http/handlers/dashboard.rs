//! `/api/dashboard/*` — summary counts, recent events, aggregate stats, and
//! a server-pushed event stream, replacing the teacher's GraphQL
//! subscription transport with a plain SSE endpoint fed by `AppState`'s
//! `dashboard_tx` broadcast channel.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures_util::stream::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::rbac::Action;
use crate::auth::RequestContext;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::state::AppState;

const RESOURCE: &str = "dashboard";
const RECENT_EVENTS_LIMIT: i64 = 20;
const METRIC_WINDOW_SECS: i64 = 60;

#[derive(Serialize)]
struct Summary {
    instances: usize,
    vpcs: usize,
    load_balancers: usize,
    scaling_groups: usize,
    databases: usize,
    caches: usize,
    functions: usize,
}

pub async fn summary(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let summary = Summary {
        instances: state.instances.list(ctx.user_id).await?.len(),
        vpcs: state.vpcs.list(ctx.user_id).await?.len(),
        load_balancers: state.lbs.list(ctx.user_id).await?.len(),
        scaling_groups: state.scaling.list_groups(ctx.user_id).await?.len(),
        databases: state.databases.list(ctx.user_id).await?.len(),
        caches: state.caches.list(ctx.user_id).await?.len(),
        functions: state.functions.list(ctx.user_id).await?.len(),
    };
    Ok(response::ok(summary))
}

pub async fn events(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let events = state.events.list_recent(Some(RECENT_EVENTS_LIMIT)).await?;
    Ok(response::ok(events))
}

#[derive(Serialize)]
struct Stats {
    instance_count: usize,
    average_cpu_percent: Option<f64>,
}

pub async fn stats(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<axum::response::Response> {
    ctx.require(RESOURCE, Action::Read)?;
    let instances = state.instances.list(ctx.user_id).await?;
    let ids: Vec<_> = instances.iter().map(|i| i.id).collect();
    let average_cpu_percent = state.repos.metric_samples.average_cpu(&ids, METRIC_WINDOW_SECS).await?;
    Ok(response::ok(Stats {
        instance_count: instances.len(),
        average_cpu_percent,
    }))
}

/// Decrements the active-connections gauge when the SSE stream is dropped
/// (client disconnect or server shutdown), so it tracks live connections
/// rather than only ever counting up.
struct ConnectionGuard(prometheus::Gauge);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

pub async fn stream(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    ctx.require(RESOURCE, Action::Read)?;
    state.metrics.ws_connections_active.inc();
    let guard = ConnectionGuard(state.metrics.ws_connections_active.clone());

    let rx = state.dashboard_tx.subscribe();
    // `guard` is moved into the closure so it lives exactly as long as the
    // stream does and decrements on client disconnect.
    let stream = BroadcastStream::new(rx).filter_map(move |item| {
        let _keep_alive = &guard;
        async move {
            match item {
                Ok(event) => serde_json::to_string(&event)
                    .ok()
                    .map(|json| Ok(SseEvent::default().event(event.event_type).data(json))),
                // A lagged receiver just misses old events; keep streaming.
                Err(_) => None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
