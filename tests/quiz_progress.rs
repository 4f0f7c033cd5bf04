//! Quiz runtime and enrollment initialization: gating, idempotent
//! completion, and tolerant progress reads.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use uuid::Uuid;

use aula::application::enrollment::{Enrolled, EnrollmentService, ProgressView};
use aula::application::quiz::{QuizError, QuizPhase, QuizService};
use aula::application::repos::{CompletionsRepo, RecordCompletionParams};

use support::MemoryStore;

fn quiz_service(store: &Arc<MemoryStore>) -> QuizService {
    QuizService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Duration::ZERO,
    )
}

fn enrollment_service(store: &Arc<MemoryStore>) -> EnrollmentService {
    EnrollmentService::new(store.clone(), store.clone())
}

#[tokio::test]
async fn walking_a_quiz_to_completion_records_one_fact_and_recomputes() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let user = Uuid::new_v4();
    let lesson = Uuid::new_v4();
    let quiz = store.seed_quiz(lesson, true, 2);

    let mut session = service.start(user, lesson).await.expect("start");
    assert_eq!(session.phase(), QuizPhase::Idle);
    assert!(session.blocks_forward_navigation());

    // Question 1: wrong answer still advances after feedback.
    session.select_answer(0).expect("select");
    assert_eq!(session.answer_feedback(), Some(false));
    assert_eq!(session.submit().await.expect("submit"), QuizPhase::Idle);
    assert_eq!(session.question_index(), 1);

    // Question 2 (final): completion lands and progress is recomputed.
    session.select_answer(1).expect("select");
    assert_eq!(session.answer_feedback(), Some(true));
    assert_eq!(session.submit().await.expect("submit"), QuizPhase::Completed);

    assert!(session.completed());
    assert!(!session.blocks_forward_navigation());
    assert_eq!(store.completions.lock().unwrap().len(), 1);
    assert_eq!(
        store.recompute_calls.lock().unwrap().as_slice(),
        &[(user, quiz.id)]
    );
}

#[tokio::test]
async fn double_submission_across_tabs_keeps_a_single_fact() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let user = Uuid::new_v4();
    let lesson = Uuid::new_v4();
    store.seed_quiz(lesson, true, 1);

    // Two tabs opened before any completion exists.
    let mut first = service.start(user, lesson).await.expect("start");
    let mut second = service.start(user, lesson).await.expect("start");

    first.select_answer(1).expect("select");
    first.submit().await.expect("submit");

    // The second tab's insert hits the uniqueness constraint; the flow
    // still completes.
    second.select_answer(1).expect("select");
    assert_eq!(second.submit().await.expect("submit"), QuizPhase::Completed);

    assert_eq!(store.completions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn reopening_a_completed_lesson_disables_resubmission() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let user = Uuid::new_v4();
    let lesson = Uuid::new_v4();
    let quiz = store.seed_quiz(lesson, true, 1);
    store
        .record_completion(RecordCompletionParams {
            user_id: user,
            lesson_id: lesson,
            quiz_id: quiz.id,
        })
        .await
        .expect("seed completion");

    let mut session = service.start(user, lesson).await.expect("start");

    assert_eq!(session.phase(), QuizPhase::Completed);
    assert!(session.completed());
    assert!(matches!(
        session.select_answer(0),
        Err(QuizError::AlreadyCompleted)
    ));
    assert!(matches!(
        session.submit().await,
        Err(QuizError::AlreadyCompleted)
    ));
    assert_eq!(store.completions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn optional_quizzes_never_gate_navigation() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let lesson = Uuid::new_v4();
    store.seed_quiz(lesson, false, 1);

    let session = service
        .start(Uuid::new_v4(), lesson)
        .await
        .expect("start");
    assert!(!session.blocks_forward_navigation());
}

#[tokio::test]
async fn lessons_without_a_quiz_have_nothing_to_gate() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let mut session = service
        .start(Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect("start");

    assert!(session.quiz().is_none());
    assert!(!session.blocks_forward_navigation());
    assert!(matches!(session.select_answer(0), Err(QuizError::NoQuiz)));
}

#[tokio::test]
async fn out_of_range_options_are_rejected() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let lesson = Uuid::new_v4();
    store.seed_quiz(lesson, true, 1);

    let mut session = service.start(Uuid::new_v4(), lesson).await.expect("start");
    assert!(matches!(
        session.select_answer(3),
        Err(QuizError::InvalidOption { index: 3 })
    ));
    assert!(matches!(
        session.submit().await,
        Err(QuizError::NothingSelected)
    ));
}

#[tokio::test]
async fn failed_completion_restores_the_selection_for_retry() {
    let store = MemoryStore::new();
    let service = quiz_service(&store);

    let user = Uuid::new_v4();
    let lesson = Uuid::new_v4();
    store.seed_quiz(lesson, true, 1);

    let mut session = service.start(user, lesson).await.expect("start");
    session.select_answer(1).expect("select");

    store.fail_completion_inserts.store(true, Ordering::SeqCst);
    assert!(session.submit().await.is_err());
    assert_eq!(session.phase(), QuizPhase::AnswerSelected(1));
    assert!(store.recompute_calls.lock().unwrap().is_empty());

    store.fail_completion_inserts.store(false, Ordering::SeqCst);
    assert_eq!(session.submit().await.expect("retry"), QuizPhase::Completed);
    assert_eq!(store.completions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn enrolling_creates_enrollment_and_zeroed_progress_once() {
    let store = MemoryStore::new();
    let service = enrollment_service(&store);

    let user = Uuid::new_v4();
    let course = Uuid::new_v4();

    let first = service.enroll(user, course).await.expect("enroll");
    assert!(matches!(first, Enrolled::Created(_)));

    let second = service.enroll(user, course).await.expect("re-enroll");
    assert!(matches!(second, Enrolled::Existing(_)));
    assert_eq!(second.record().id, first.record().id);

    assert_eq!(store.enrollments.lock().unwrap().len(), 1);
    assert_eq!(store.progress.lock().unwrap().len(), 1);

    let progress = store.progress.lock().unwrap();
    assert_eq!(progress[0].percent, 0);
    assert!(!progress[0].completed);
    assert_eq!(progress[0].enrollment_id, first.record().id);
}

#[tokio::test]
async fn missing_progress_row_reads_as_zero() {
    let store = MemoryStore::new();
    let service = enrollment_service(&store);

    let user = Uuid::new_v4();
    let course = Uuid::new_v4();

    // Break the second insert: enrollment lands, progress does not.
    store.fail_progress_inserts.store(true, Ordering::SeqCst);
    let enrolled = service.enroll(user, course).await.expect("enroll");
    assert!(matches!(enrolled, Enrolled::Created(_)));
    assert!(store.progress.lock().unwrap().is_empty());

    // The lesson player still gets a usable view.
    let view = service.progress_for(user, course).await.expect("progress");
    assert_eq!(view, ProgressView::zeroed());
}
