use std::{net::SocketAddr, time::Duration};

use axum::{http::Request, response::Response, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{dashboard, embed, nutrition, weights};

pub fn build_app(state: AppState) -> Router {
    let embed_config = state.config.embed.clone();
    let owner_id = state.config.owner.id;
    let router = Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(weights::router())
                .merge(dashboard::router())
                .merge(nutrition::router())
                .route("/health", get(|| async { "ok" })),
        )
        .merge(embed::router())
        .with_state(state);

    embed::with_embed_headers(router, &embed_config)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |req: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        area = route_area(req.uri().path()),
                        %owner_id,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status();
                    span.record("status", status.as_u16());
                    span.record("latency_ms", latency.as_millis() as u64);
                    if status.is_server_error() {
                        tracing::error!(%status, "request failed");
                    } else if status.is_client_error() {
                        tracing::warn!(%status, "request rejected");
                    } else {
                        tracing::debug!(%status, "request served");
                    }
                }),
        )
}

/// Coarse feature area of a request path, used to group request logs.
fn route_area(path: &str) -> &'static str {
    let rest = match path.strip_prefix("/api/") {
        Some(rest) => rest,
        None if path.starts_with("/embed-test") => return "embed",
        None => return "other",
    };
    match rest.split('/').next() {
        Some("weights") => "weights",
        Some("dashboard") => "dashboard",
        Some("nutrition") => "nutrition",
        Some("health") => "health",
        _ => "other",
    }
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
