use anyhow::Context;
use telenach_core::{logging, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let cfg = Config::from_env().context("failed to load configuration")?;
    match &cfg.store_path {
        Some(path) => tracing::info!(path = %path.display(), "using file store"),
        None => tracing::info!("using in-memory store"),
    }

    let mut state = AppState::from_config(cfg).context("failed to initialise app state")?;
    state.router_mut().finish_splash();

    let screen = state.screen();
    match state.current_user() {
        Some(user) => tracing::info!(user = %user.username, ?screen, "session restored"),
        None => tracing::info!(?screen, "no session, showing onboarding"),
    }

    tracing::info!(
        chats = state.chats().chats().len(),
        unread = state.chats().total_unread(),
        rooms = state.voice_rooms().len(),
        "ready"
    );
    Ok(())
}
