use dioxus::prelude::*;

use crate::launch::use_client;

/// Text input that adds a task, then asks the parent to refetch.
#[component]
pub fn TaskForm(refetch: EventHandler<()>) -> Element {
    let client = use_client();
    let mut input = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let text = input.read().trim().to_string();
        if text.is_empty() {
            return;
        }
        input.set(String::new());
        let client = client.clone();
        spawn(async move {
            match client.add_task(&text).await {
                Ok(_) => refetch.call(()),
                Err(e) => log::error!("Failed to add task: {}", e),
            }
        });
    };

    rsx! {
        form { class: "task-form", onsubmit: on_submit,
            input {
                r#type: "text",
                placeholder: "Type to add new tasks",
                value: "{input}",
                oninput: move |evt| input.set(evt.value()),
            }
            button { r#type: "submit", "Add Task" }
        }
    }
}
