use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use quiz_core::model::Outcome;

use crate::views::{AverageView, EntryView, PoorView, QuizView, SuccessView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", EntryView)] Entry {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/result/poor", PoorView)] Poor {},
        #[route("/result/average", AverageView)] Average {},
        #[route("/result/success", SuccessView)] Success {},
}

impl Route {
    /// Outcome page for a score band.
    #[must_use]
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Poor => Self::Poor {},
            Outcome::Average => Self::Average {},
            Outcome::Success => Self::Success {},
        }
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "app-header",
                h1 { "Quiz" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
