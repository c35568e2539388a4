//! Iframe embedding: the response headers that allow it and a page to check it.

use axum::{
    http::{header, HeaderValue},
    response::Html,
    routing::get,
    Router,
};
use time::{macros::format_description, OffsetDateTime};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::EmbedConfig;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/embed-test", get(embed_test))
}

pub async fn embed_test() -> Html<String> {
    let now = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
        ))
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html><body style=\"padding: 20px\">\
         <h1>Embed Test Page</h1>\
         <p>If you can see this in ClickUp, the embedding is working!</p>\
         <p>Current time: {now}</p>\
         </body></html>"
    ))
}

/// Adds the frame policy headers to every response.
pub fn with_embed_headers<S>(router: Router<S>, embed: &EmbedConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let csp = HeaderValue::from_str(&embed.content_security_policy()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid frame-ancestors; falling back to 'self'");
        HeaderValue::from_static("frame-ancestors 'self'")
    });
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("ALLOWALL"),
        ))
}
