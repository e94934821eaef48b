use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::model::EntryField;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{EntryFeedback, load_categories, submit_entry};

#[component]
pub fn EntryView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flow = ctx.quiz_flow();

    let mut name = use_signal(String::new);
    let mut category = use_signal(|| None::<String>);
    let mut feedback = use_signal(EntryFeedback::default);
    let mut submitting = use_signal(|| false);

    let categories = {
        let flow = flow.clone();
        use_resource(move || {
            let flow = flow.clone();
            async move { load_categories(&flow).await }
        })
    };
    let state = view_state_from_resource(&categories);

    let on_submit = use_callback(move |()| {
        if submitting() {
            return;
        }
        let flow = flow.clone();
        let name_value = name.read().clone();
        let category_value = category.read().clone();
        submitting.set(true);
        spawn(async move {
            match submit_entry(&flow, &name_value, category_value).await {
                Ok(()) => {
                    feedback.set(EntryFeedback::default());
                    navigator.push(Route::Quiz {});
                }
                Err(rejected) => feedback.set(rejected),
            }
            submitting.set(false);
        });
    });

    let current = feedback.read().clone();
    let selected = category.read().clone();

    rsx! {
        div { class: "page entry",
            h2 { "Start a quiz" }
            if let Some(banner) = current.banner {
                div { class: "banner error", role: "alert", "{banner.message()}" }
            }
            form {
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                div { class: "field",
                    label { r#for: "full-name", "Full name" }
                    input {
                        id: "full-name",
                        class: if current.name_error.is_some() { "is-invalid" } else { "" },
                        value: "{name}",
                        oninput: move |evt: FormEvent| {
                            name.set(evt.value());
                            feedback.write().clear_field(EntryField::Name);
                        },
                    }
                    if let Some(message) = current.name_error {
                        p { id: "name-error", class: "field-error", "{message}" }
                    }
                }
                fieldset {
                    class: if current.category_error.is_some() { "categories has-error" } else { "categories" },
                    legend { "Category" }
                    match state {
                        ViewState::Idle | ViewState::Loading => rsx! {
                            p { "Loading categories..." }
                        },
                        ViewState::Ready(names) => rsx! {
                            for (index, option) in names.into_iter().enumerate() {
                                CategoryOption {
                                    key: "{index}",
                                    selected: selected.as_deref() == Some(option.as_str()),
                                    name: option,
                                    on_pick: move |value: String| {
                                        category.set(Some(value));
                                        feedback.write().clear_field(EntryField::Category);
                                    },
                                }
                            }
                        },
                        ViewState::Error(err) => rsx! {
                            div { class: "banner error", role: "alert", "{err.message()}" }
                        },
                    }
                    if let Some(message) = current.category_error {
                        p { id: "category-error", class: "field-error", "{message}" }
                    }
                }
                button {
                    id: "start-quiz",
                    r#type: "submit",
                    disabled: submitting(),
                    "Start quiz"
                }
            }
        }
    }
}

#[component]
fn CategoryOption(name: String, selected: bool, on_pick: EventHandler<String>) -> Element {
    let value = name.clone();
    rsx! {
        label { class: if selected { "category selected" } else { "category" },
            input {
                r#type: "radio",
                name: "category",
                value: "{name}",
                checked: selected,
                onchange: move |_| on_pick.call(value.clone()),
            }
            span { "{name}" }
        }
    }
}
