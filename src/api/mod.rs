//! HTTP interface: two operations against the single implicit plan record.
//!
//! `GET /plan` returns the normalized current plan, creating and persisting
//! a default record when none exists. `POST /plan` upserts a full or partial
//! plan body and returns the normalized result. Persistence failures are
//! logged at the boundary and surfaced as generic 500 responses.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::core::{Plan, normalize};
use crate::store::PlanStore;

#[derive(Clone)]
struct AppState {
    store: Arc<PlanStore>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16, store: PlanStore) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(store);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("plan API listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")
}

fn router(store: PlanStore) -> Router {
    Router::new()
        .route("/plan", get(get_plan_handler).post(post_plan_handler))
        .fallback(not_found_handler)
        .with_state(AppState {
            store: Arc::new(store),
        })
}

async fn get_plan_handler(State(state): State<AppState>) -> Response {
    match load_plan(&state.store).await {
        Ok(plan) => json_response(StatusCode::OK, plan),
        Err(e) => {
            error!("failed to fetch plan: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch plan")
        }
    }
}

async fn post_plan_handler(State(state): State<AppState>, Json(patch): Json<Value>) -> Response {
    match save_plan(&state.store, &patch).await {
        Ok(plan) => json_response(StatusCode::OK, plan),
        Err(e) => {
            error!("failed to save plan: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save plan")
        }
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Loads the stored record, creating the default on first read, and upgrades
/// it to the current shape on the way out.
async fn load_plan(store: &PlanStore) -> anyhow::Result<Plan> {
    let document = match store.load().await? {
        Some(document) => document,
        None => store.create_default().await?,
    };
    Ok(normalize(&document))
}

/// Upserts the body's top-level fields into the stored record and returns
/// the normalized result. Malformed field shapes are not errors; they are
/// resolved by normalization on the next read.
async fn save_plan(store: &PlanStore, patch: &Value) -> anyhow::Result<Plan> {
    let document = store.upsert(patch).await?;
    Ok(normalize(&document))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
