use std::future::Future;

use dioxus::prelude::*;
use todosync::{TaskError, TaskStoreBuilder, TodoClient};

/// Open the desktop window with a [`TodoClient`] in the root context.
///
/// Builds the client with [`build_client`], then hands it to Dioxus. The
/// tokio runtime stays entered until the window closes, so components can
/// spawn store work.
pub fn launch<F, Fut>(store: TaskStoreBuilder, setup: F, app: fn() -> Element) -> anyhow::Result<()>
where
    F: FnOnce(TodoClient) -> Fut,
    Fut: Future<Output = Result<(), TaskError>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let client = runtime.block_on(build_client(store, setup))?;

    log::info!("opening desktop window");
    dioxus::LaunchBuilder::desktop()
        .with_context(client)
        .launch(app);
    Ok(())
}

/// Connect the store and run `setup` (seed accounts, etc.) against the client.
pub async fn build_client<F, Fut>(store: TaskStoreBuilder, setup: F) -> Result<TodoClient, TaskError>
where
    F: FnOnce(TodoClient) -> Fut,
    Fut: Future<Output = Result<(), TaskError>>,
{
    let client = TodoClient::new(store.build().await?);
    setup(client.clone()).await?;
    Ok(client)
}

/// The [`TodoClient`] provided by [`launch`].
pub fn use_client() -> TodoClient {
    use_context::<TodoClient>()
}
