use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::warn;

use services::{OptionMark, OptionView};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizOutcome, QuizVm, finish_quiz, session_to_finish, start_quiz};

fn option_class(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Unmarked => "option",
        OptionMark::Correct => "option correct",
        OptionMark::Incorrect => "option incorrect",
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let flow = ctx.quiz_flow();
    let clock = ctx.clock();

    let mut vm = use_signal(|| None::<QuizVm>);
    let mut error = use_signal(|| None::<ViewError>);
    let mut finishing = use_signal(|| false);

    let finish = {
        let flow = flow.clone();
        use_callback(move |()| {
            let Some(session) = session_to_finish(vm.read().as_ref(), finishing()) else {
                return;
            };
            finishing.set(true);
            let flow = flow.clone();
            spawn(async move {
                match finish_quiz(&flow, &session).await {
                    Ok(outcome) => {
                        navigator.replace(Route::for_outcome(outcome));
                    }
                    Err(err) => {
                        warn!(?err, "failed to store results");
                        error.set(Some(err));
                        finishing.set(false);
                    }
                }
            });
        })
    };

    let resource = use_resource(move || {
        let flow = flow.clone();
        async move {
            let started = start_quiz(&flow, clock).await;
            let (started, mut signals) = match started {
                Ok(pair) => pair,
                Err(ViewError::NoActiveQuiz) => {
                    navigator.replace(Route::Entry {});
                    return Err(ViewError::NoActiveQuiz);
                }
                Err(err) => return Err(err),
            };
            vm.set(Some(started));
            spawn(async move {
                while let Some(signal) = signals.recv().await {
                    let outcome = vm.write().as_mut().map(|vm| vm.on_signal(signal));
                    if outcome == Some(QuizOutcome::Finished) {
                        finish.call(());
                        break;
                    }
                }
            });
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = use_callback(move |intent: QuizIntent| {
        let result = vm.write().as_mut().map(|vm| vm.apply(intent));
        match result {
            Some(Ok(QuizOutcome::Finished)) => finish.call(()),
            Some(Ok(QuizOutcome::Continue)) => error.set(None),
            Some(Err(err)) => error.set(Some(err)),
            None => {}
        }
    });

    let vm_guard = vm.read();
    let view = vm_guard.as_ref().and_then(QuizVm::view);
    let time_label = vm_guard.as_ref().map(QuizVm::time_label).unwrap_or_default();
    let option_error = vm_guard.as_ref().and_then(QuizVm::option_error);
    let banner = *error.read();

    rsx! {
        div { class: "page quiz",
            if let Some(err) = banner {
                div { class: "banner error", role: "alert", "{err.message()}" }
            }
            match (state, view) {
                (ViewState::Error(err), _) => rsx! {
                    p { "{err.message()}" }
                },
                (ViewState::Ready(()), Some(view)) => rsx! {
                    div { class: "quiz-header",
                        span { id: "question-counter", "{view.counter_label()}" }
                        span { id: "timer", class: "timer", "{time_label}" }
                    }
                    div { class: "progress",
                        div {
                            class: "progress-bar",
                            style: "width: {view.progress_percent()}%",
                        }
                    }
                    h3 { id: "question-text", "{view.prompt}" }
                    div { class: "options",
                        for (index, option) in view.options.iter().cloned().enumerate() {
                            OptionButton {
                                key: "{index}",
                                option,
                                on_select: move |text: String| dispatch.call(QuizIntent::Select(text)),
                            }
                        }
                    }
                    if let Some(message) = option_error {
                        p { id: "option-error", class: "field-error", "{message}" }
                    }
                    div { class: "quiz-actions",
                        button {
                            id: "skip",
                            onclick: move |_| dispatch.call(QuizIntent::Skip),
                            "Skip"
                        }
                        button {
                            id: "next",
                            class: "primary",
                            onclick: move |_| dispatch.call(QuizIntent::Next),
                            "Next"
                        }
                    }
                },
                (ViewState::Ready(()), None) => rsx! {
                    p { "Calculating results..." }
                },
                (ViewState::Idle | ViewState::Loading, _) => rsx! {
                    p { "Loading..." }
                },
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionView, on_select: EventHandler<String>) -> Element {
    let text = option.text.clone();
    rsx! {
        button {
            class: option_class(option.mark),
            disabled: !option.enabled,
            onclick: move |_| on_select.call(text.clone()),
            "{option.text}"
        }
    }
}
