mod app;
mod auth;
mod config;
mod error;
mod movies;
mod starwars;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "holocron=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;

    auth::service::ensure_admin(state.users.as_ref(), &state.config.bootstrap_admin).await?;

    // First run fires inside the task, so a slow or down catalog cannot hold
    // up the listener.
    let _scheduler = movies::sync::spawn_sync_scheduler(state.clone());

    let app = app::build_app(state);
    app::serve(app).await
}
