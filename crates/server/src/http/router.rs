//! Top-level route table, grounded on the teacher's `build_router` — same
//! `ServiceBuilder` stack (timeout, body limit, CORS) with request-ID and
//! per-IP rate limiting layered in, and the REST resource tree in place of
//! GraphQL/WS routes.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{
    auth, autoscaling, caches, dashboard, databases, events, functions, health, instances, lb,
    secrets, storage, volumes, vpcs,
};
use crate::http::rate_limit;
use crate::http::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_OBJECT_UPLOAD_BYTES: usize = 65 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let limiter = rate_limit::build_limiter();

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/keys", post(auth::create_key))
        .route("/auth/roles", get(auth::list_roles))
        .route("/auth/me/role", get(auth::my_role))
        .route("/auth/users/{id}/role", put(auth::update_user_role));

    let instance_routes = Router::new()
        .route("/instances", post(instances::launch).get(instances::list))
        .route("/instances/{id}", get(instances::get).delete(instances::terminate))
        .route("/instances/{id}/stop", post(instances::stop))
        .route("/instances/{id}/logs", get(instances::logs))
        .route("/instances/{id}/stats", get(instances::stats));

    let vpc_routes = Router::new()
        .route("/vpcs", post(vpcs::create).get(vpcs::list))
        .route("/vpcs/{id}", get(vpcs::get).delete(vpcs::delete));

    let storage_routes = Router::new()
        .route("/storage/{bucket}", get(storage::list))
        .route(
            "/storage/{bucket}/{key}",
            put(storage::put).get(storage::get).delete(storage::delete),
        )
        // 64 MiB object ceiling needs a higher body limit than the default 2 MiB.
        .layer(DefaultBodyLimit::max(MAX_OBJECT_UPLOAD_BYTES));

    let event_routes = Router::new().route("/events", get(events::list));

    let volume_routes = Router::new()
        .route("/volumes", post(volumes::create).get(volumes::list))
        .route("/volumes/{id}", get(volumes::get).delete(volumes::delete))
        .route("/volumes/{id}/attach", post(volumes::attach))
        .route("/volumes/{id}/detach", post(volumes::detach));

    let dashboard_routes = Router::new()
        .route("/api/dashboard/summary", get(dashboard::summary))
        .route("/api/dashboard/events", get(dashboard::events))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/stream", get(dashboard::stream));

    let lb_routes = Router::new()
        .route("/lb", post(lb::create).get(lb::list))
        .route("/lb/{id}", get(lb::get).delete(lb::delete))
        .route("/lb/{id}/targets", post(lb::add_target).get(lb::list_targets))
        .route("/lb/{id}/targets/{instance_id}", delete(lb::remove_target));

    let database_routes = Router::new()
        .route("/databases", post(databases::create).get(databases::list))
        .route("/databases/{id}", get(databases::get).delete(databases::delete))
        .route("/databases/{id}/connection", get(databases::connection))
        .route("/databases/{id}/logs", get(databases::logs));

    let secret_routes = Router::new()
        .route("/secrets", post(secrets::create).get(secrets::list))
        .route("/secrets/{id}", get(secrets::get).delete(secrets::delete))
        .route("/secrets/{id}/reveal", get(secrets::reveal));

    let function_routes = Router::new()
        .route("/functions", post(functions::create).get(functions::list))
        .route("/functions/{id}", get(functions::get).delete(functions::delete))
        .route("/functions/{id}/invoke", post(functions::invoke))
        .route("/functions/{id}/logs", get(functions::logs));

    let cache_routes = Router::new()
        .route("/caches", post(caches::create).get(caches::list))
        .route("/caches/{id}", get(caches::get).delete(caches::delete))
        .route("/caches/{id}/connection", get(caches::connection))
        .route("/caches/{id}/flush", post(caches::flush))
        .route("/caches/{id}/stats", get(caches::stats));

    let autoscaling_routes = Router::new()
        .route(
            "/autoscaling/groups",
            post(autoscaling::create_group).get(autoscaling::list_groups),
        )
        .route(
            "/autoscaling/groups/{id}",
            get(autoscaling::get_group).delete(autoscaling::delete_group),
        )
        .route(
            "/autoscaling/groups/{id}/desired-capacity",
            put(autoscaling::set_desired_capacity),
        )
        .route(
            "/autoscaling/policies",
            post(autoscaling::create_policy),
        )
        .route(
            "/autoscaling/groups/{id}/policies",
            get(autoscaling::list_policies),
        )
        .route("/autoscaling/policies/{id}", delete(autoscaling::delete_policy));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics))
        .merge(auth_routes)
        .merge(instance_routes)
        .merge(vpc_routes)
        .merge(storage_routes)
        .merge(event_routes)
        .merge(volume_routes)
        .merge(dashboard_routes)
        .merge(lb_routes)
        .merge(database_routes)
        .merge(secret_routes)
        .merge(function_routes)
        .merge(cache_routes)
        .merge(autoscaling_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn_with_state(limiter, rate_limit::enforce)),
        )
        .with_state(state)
}
