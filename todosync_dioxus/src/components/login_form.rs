use dioxus::prelude::*;
use todosync::view::ViewUser;

use crate::launch::use_client;

#[component]
pub fn LoginForm(on_login: EventHandler<ViewUser>) -> Element {
    let client = use_client();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let name = username.read().clone();
        let secret = password.read().clone();
        let client = client.clone();
        spawn(async move {
            match client.login(&name, &secret).await {
                Ok(user) => {
                    error.set(None);
                    password.set(String::new());
                    on_login.call(user);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    rsx! {
        form { class: "login-form", onsubmit: on_submit,
            div {
                label { r#for: "username", "Username" }
                input {
                    id: "username",
                    r#type: "text",
                    placeholder: "Username",
                    required: true,
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
            }
            div {
                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    placeholder: "Password",
                    required: true,
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
            }
            {error().map(|message| rsx! { div { class: "error", "{message}" } })}
            div {
                button { r#type: "submit", "Log In" }
            }
        }
    }
}
