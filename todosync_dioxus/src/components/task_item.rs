use dioxus::prelude::*;
use todosync::view::TaskRow;

#[component]
pub fn TaskItem(
    task: TaskRow,
    on_checkbox_click: EventHandler<TaskRow>,
    on_delete_click: EventHandler<TaskRow>,
) -> Element {
    let checked = task.checked();
    let toggle_task = task.clone();
    let delete_task = task.clone();

    rsx! {
        li { class: "task-item",
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |_| on_checkbox_click.call(toggle_task.clone()),
            }
            label {
                class: if checked { "completed" } else { "" },
                "{task.text}"
            }
            button { onclick: move |_| on_delete_click.call(delete_task.clone()), "×" }
        }
    }
}
