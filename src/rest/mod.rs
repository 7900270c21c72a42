// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, one route per task operation.
//
// Endpoints:
//   GET    /tasks
//   POST   /tasks
//   PUT    /tasks/{id}          (completion status only)
//   PUT    /tasks/update/{id}   (partial field update)
//   DELETE /tasks/{id}
//   GET    /health

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Tasks
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/update/{id}", put(routes::tasks::update_task))
        .route(
            "/tasks/{id}",
            put(routes::tasks::set_status).delete(routes::tasks::delete_task),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
