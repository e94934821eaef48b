use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::Outcome;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::load_outcome;

#[component]
pub fn PoorView() -> Element {
    rsx! { ResultDetails { page: Outcome::Poor } }
}

#[component]
pub fn AverageView() -> Element {
    rsx! { ResultDetails { page: Outcome::Average } }
}

#[component]
pub fn SuccessView() -> Element {
    rsx! { ResultDetails { page: Outcome::Success } }
}

/// Stored results of the last quiz, rendered on the page for `page`'s band.
/// Results from another band are sent to their own page.
#[component]
pub fn ResultDetails(page: Outcome) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flow = ctx.quiz_flow();
    let mut error = use_signal(|| None::<ViewError>);

    let resource = {
        let flow = flow.clone();
        use_resource(move || {
            let flow = flow.clone();
            async move {
                let vm = load_outcome(&flow).await?;
                if let Some(outcome) = vm.redirect_from(page) {
                    navigator.replace(Route::for_outcome(outcome));
                }
                Ok::<_, ViewError>(vm)
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_try_again = use_callback(move |()| {
        let flow = flow.clone();
        spawn(async move {
            match flow.reset().await {
                Ok(()) => {
                    navigator.push(Route::Entry {});
                }
                Err(err) => error.set(Some(ViewError::from_quiz(&err))),
            }
        });
    });

    rsx! {
        div { class: "page result result-{page.as_str()}",
            if let Some(err) = *error.read() {
                div { class: "banner error", role: "alert", "{err.message()}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) if vm.outcome != page => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    h2 { "{vm.heading}" }
                    p { class: "greeting", "{vm.greeting}" }
                    p { id: "score", class: "score", "{vm.score_label}" }
                    table { class: "stats",
                        tbody {
                            for row in vm.rows.iter() {
                                tr { key: "{row.label}",
                                    th { "{row.label}" }
                                    td { "{row.value}" }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
            button {
                id: "try-again",
                class: "primary",
                onclick: move |_| on_try_again.call(()),
                "Try again"
            }
        }
    }
}
