mod app;
mod config;
mod dashboard;
mod db;
mod embed;
mod error;
mod nutrition;
mod state;
mod weights;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let app_state = state::AppState::init().await?;
    let config = app_state.config.clone();
    tracing::info!(
        owner_id = %config.owner.id,
        provision = ?config.owner.provision,
        "weight owner configured"
    );

    let app = app::build_app(app_state);
    app::serve(app, &config).await
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "weightboard=debug,axum=info,tower_http=info".to_string());
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.with_target(false).json().init(),
        _ => builder.init(),
    }
}
