use quiz_core::model::{EntryForm, Outcome};
use quiz_core::session::QuizEvent;
use quiz_core::time::fixed_now;

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_doc};

#[tokio::test(flavor = "current_thread")]
async fn entry_view_lists_categories() {
    let mut harness = setup_view_harness(ViewKind::Entry).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Start a quiz"), "missing heading in {html}");
    assert!(html.contains("Science"), "missing category in {html}");
    assert!(html.contains("Geography"), "missing category in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn entry_view_shows_load_failure_banner() {
    let mut harness =
        setup_view_harness_with_doc(ViewKind::Entry, "{ not json", |_| async {}).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Error loading questions. Please try again."),
        "missing banner in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_first_question() {
    let mut harness = setup_view_harness_with_doc(
        ViewKind::Quiz,
        super::test_harness::SAMPLE_DOC,
        |flow| async move {
            flow.start_quiz(&EntryForm::new("Ada", Some("Science".into())))
                .await
                .expect("start quiz");
        },
    )
    .await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("What is H2O?"), "missing prompt in {html}");
    assert!(html.contains("1/2"), "missing counter in {html}");
    assert!(html.contains("0:10"), "missing timer in {html}");
    for option in ["Water", "Salt", "Air", "Fire"] {
        assert!(html.contains(option), "missing {option} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_renders_stored_summary() {
    let mut harness = setup_view_harness_with_doc(
        ViewKind::Result(Outcome::Poor),
        super::test_harness::SAMPLE_DOC,
        |flow| async move {
            flow.start_quiz(&EntryForm::new("Ada", Some("Geography".into())))
                .await
                .expect("start quiz");
            let mut session = flow.resume().await.expect("resume");
            session
                .apply(QuizEvent::Skip { index: 0 }, fixed_now())
                .expect("skip");
            flow.finish(&session).await.expect("finish");
        },
    )
    .await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Keep practicing"), "missing heading in {html}");
    assert!(html.contains("Well played, Ada!"), "missing greeting in {html}");
    assert!(html.contains("0%"), "missing score in {html}");
    assert!(html.contains("Try again"), "missing button in {html}");
    assert!(harness.flow.results().await.is_ok());
}
