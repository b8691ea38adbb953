use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::{from_fn, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sigecon_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{dashboard_handler, health_check, index},
    auth::{login_handler, login_page, logout_handler},
    contracts::{
        contract_detail, contracts_page, delete_contract, delete_contract_item, import_contract,
        save_contract_item, update_contract,
    },
    orders::{
        create_order, delete_order, download_order_xlsx, order_detail, orders_page, update_order,
    },
    users::{change_password, create_user, update_name, users_page},
};
use crate::middleware::auth::auth_middleware;
use crate::AppState;

// contract PDFs run to a few megabytes; leave headroom
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

async fn prometheus_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();
    let response = next.run(request).await;
    crate::services::metrics::observe_request(
        &method,
        &path,
        response.status().as_str(),
        start.elapsed().as_secs_f64(),
    );
    response
}

pub fn build_router(state: AppState) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    let protected = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/contracts", get(contracts_page))
        .route("/contracts/import", post(import_contract))
        .route("/contracts/:id", get(contract_detail).post(update_contract))
        .route("/contracts/:id/delete", post(delete_contract))
        .route("/contracts/:id/items", post(save_contract_item))
        .route(
            "/contracts/:id/items/:item_no/delete",
            post(delete_contract_item),
        )
        .route("/orders", get(orders_page).post(create_order))
        .route("/orders/:id", get(order_detail).post(update_order))
        .route("/orders/:id/delete", post(delete_order))
        .route("/orders/:id/xlsx", post(download_order_xlsx))
        .route("/users", get(users_page))
        .route("/users/name", post(update_name))
        .route("/users/password", post(change_password))
        .route("/users/new", post(create_user))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(session_layer)
        .layer(from_fn(prometheus_middleware))
        .layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
