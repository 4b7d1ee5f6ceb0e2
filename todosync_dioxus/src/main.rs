use clap::Parser;
use todosync::TaskStoreBuilder;

/// Desktop configuration. Every flag can also be set through the environment.
#[derive(Parser, Debug)]
#[command(name = "todosync-desktop", version, about = "todosync desktop client")]
struct Config {
    /// SeaORM database URL.
    #[arg(long, env = "TODOSYNC_DATABASE_URL", default_value = "sqlite:./todosync.db?mode=rwc")]
    database_url: String,

    /// Capacity of the store's change notification channel.
    #[arg(long, env = "TODOSYNC_CHANGE_CAPACITY", default_value_t = 256)]
    change_capacity: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();
    let store =
        TaskStoreBuilder::new(&config.database_url).with_change_capacity(config.change_capacity);

    todosync_dioxus::launch(
        store,
        |client| async move {
            // Demo account
            client.accounts().ensure_user("meteorite", "password").await?;
            Ok(())
        },
        todosync_dioxus::App,
    )
}
