use clap::Parser;
use todosync::TaskStoreBuilder;
use todosync_server::{router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let store = TaskStoreBuilder::new(&config.database_url)
        .with_change_capacity(config.change_capacity)
        .build()
        .await?;
    let state = AppState::new(store);

    if let Some((username, password)) = config.seed_account() {
        let account = state.accounts.ensure_user(username, password).await?;
        log::info!("seed account {} ready", account.username);
    }

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    log::info!("todosync listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
