use std::io::Write;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::Outcome;
use quiz_core::time::fixed_clock;
use services::{AppServices, Clock, QuestionSource, QuizFlowService};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{EntryView, QuizView, ResultDetails};

pub const SAMPLE_DOC: &str = r#"{ "categories": [
    { "name": "Science", "questions": [
        { "question": "What is H2O?", "correct_answer": "Water", "incorrect_answers": ["Salt", "Air", "Fire"] },
        { "question": "Closest star?", "correct_answer": "The Sun", "incorrect_answers": ["Sirius", "Vega", "Altair"] }
    ] },
    { "name": "Geography", "questions": [
        { "question": "Capital of France?", "correct_answer": "Paris", "incorrect_answers": ["Rome", "Madrid", "Berlin"] }
    ] }
] }"#;

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        self.services.quiz_flow()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Entry,
    Quiz,
    Result(Outcome),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Entry => rsx! { EntryView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Result(page) => rsx! { ResultDetails { page } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub flow: Arc<QuizFlowService>,
    _doc: tempfile::NamedTempFile,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn write_doc(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write doc");
    file
}

/// Build a harness over `doc`; `prepare` runs against the flow before the dom exists.
pub async fn setup_view_harness_with_doc<F, Fut>(view: ViewKind, doc: &str, prepare: F) -> ViewHarness
where
    F: FnOnce(Arc<QuizFlowService>) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let file = write_doc(doc);
    let services = AppServices::from_storage(
        &Storage::in_memory(),
        QuestionSource::File(file.path().to_path_buf()),
        fixed_clock(),
    );
    let flow = services.quiz_flow();
    prepare(Arc::clone(&flow)).await;

    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        flow,
        _doc: file,
    }
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_doc(view, SAMPLE_DOC, |_| async {}).await
}
