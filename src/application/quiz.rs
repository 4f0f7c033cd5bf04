//! Per-lesson quiz state machine and durable completion recording.
//!
//! A session walks the question list `Idle → AnswerSelected → Submitting
//! → Idle` and terminates in `Completed` once the final question is
//! submitted. Completion is a store fact, re-derived on load, so it
//! survives reloads and concurrent tabs; the store's uniqueness
//! constraint is the final authority and a duplicate insert is treated
//! as success. Progress percentages are never computed here — the
//! session only requests server-side recomputation.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::repos::{
    CompletionsRepo, ProgressRpc, QuizzesRepo, RecordCompletionParams, RepoError,
};
use crate::domain::entities::{QuizQuestion, QuizRecord};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("lesson has no quiz")]
    NoQuiz,
    #[error("quiz is already completed")]
    AlreadyCompleted,
    #[error("option {index} is out of range")]
    InvalidOption { index: u32 },
    #[error("no answer is selected")]
    NothingSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Current question shown, nothing selected.
    Idle,
    /// An option is chosen but not yet submitted.
    AnswerSelected(u32),
    /// A store call is in flight.
    Submitting,
    /// Terminal: the completion fact is recorded.
    Completed,
}

#[derive(Clone)]
pub struct QuizService {
    quizzes: Arc<dyn QuizzesRepo>,
    completions: Arc<dyn CompletionsRepo>,
    progress: Arc<dyn ProgressRpc>,
    feedback_pause: Duration,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizzesRepo>,
        completions: Arc<dyn CompletionsRepo>,
        progress: Arc<dyn ProgressRpc>,
        feedback_pause: Duration,
    ) -> Self {
        Self {
            quizzes,
            completions,
            progress,
            feedback_pause,
        }
    }

    /// Open a session for (user, lesson), re-deriving completion from
    /// the store rather than any client session memory.
    pub async fn start(&self, user_id: Uuid, lesson_id: Uuid) -> Result<QuizSession, QuizError> {
        let quiz = self.quizzes.find_for_lesson(lesson_id).await?;

        let completed = match quiz {
            Some(_) => self
                .completions
                .find_completion(user_id, lesson_id)
                .await?
                .is_some(),
            None => false,
        };

        Ok(QuizSession {
            user_id,
            lesson_id,
            quiz,
            question_index: 0,
            phase: if completed {
                QuizPhase::Completed
            } else {
                QuizPhase::Idle
            },
            completed,
            completions: Arc::clone(&self.completions),
            progress: Arc::clone(&self.progress),
            feedback_pause: self.feedback_pause,
        })
    }
}

pub struct QuizSession {
    user_id: Uuid,
    lesson_id: Uuid,
    quiz: Option<QuizRecord>,
    question_index: usize,
    phase: QuizPhase,
    completed: bool,
    completions: Arc<dyn CompletionsRepo>,
    progress: Arc<dyn ProgressRpc>,
    feedback_pause: Duration,
}

impl QuizSession {
    pub fn quiz(&self) -> Option<&QuizRecord> {
        self.quiz.as_ref()
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.quiz
            .as_ref()
            .and_then(|quiz| quiz.questions.get(self.question_index))
    }

    /// Whether forward lesson navigation is blocked: only a required,
    /// not-yet-completed quiz gates; an optional quiz never does.
    pub fn blocks_forward_navigation(&self) -> bool {
        match &self.quiz {
            Some(quiz) => quiz.required && !self.completed,
            None => false,
        }
    }

    /// Choose (or change) the answer for the current question.
    pub fn select_answer(&mut self, index: u32) -> Result<(), QuizError> {
        if self.completed {
            return Err(QuizError::AlreadyCompleted);
        }
        let question = self.current_question().ok_or(QuizError::NoQuiz)?;
        if index as usize >= question.options.len() {
            return Err(QuizError::InvalidOption { index });
        }
        match self.phase {
            QuizPhase::Idle | QuizPhase::AnswerSelected(_) => {
                self.phase = QuizPhase::AnswerSelected(index);
                Ok(())
            }
            QuizPhase::Submitting | QuizPhase::Completed => Err(QuizError::NothingSelected),
        }
    }

    /// Transient correctness feedback for the selected answer. Never
    /// persisted; derived by comparing against the stored answer index.
    pub fn answer_feedback(&self) -> Option<bool> {
        match (self.phase, self.current_question()) {
            (QuizPhase::AnswerSelected(index), Some(question)) => {
                Some(index == question.answer_index)
            }
            _ => None,
        }
    }

    /// Submit the selected answer. Non-final questions advance to the
    /// next question's `Idle` after the feedback pause; the final
    /// question records the completion fact and requests server-side
    /// progress recomputation. On a store failure the selection is
    /// restored so a retry needs no re-entry.
    pub async fn submit(&mut self) -> Result<QuizPhase, QuizError> {
        if self.completed {
            return Err(QuizError::AlreadyCompleted);
        }
        let QuizPhase::AnswerSelected(selected) = self.phase else {
            return Err(QuizError::NothingSelected);
        };
        let quiz = self.quiz.as_ref().ok_or(QuizError::NoQuiz)?;
        let quiz_id = quiz.id;
        let last_question = self.question_index + 1 >= quiz.questions.len();

        self.phase = QuizPhase::Submitting;

        if !last_question {
            tokio::time::sleep(self.feedback_pause).await;
            self.question_index += 1;
            self.phase = QuizPhase::Idle;
            return Ok(self.phase);
        }

        let params = RecordCompletionParams {
            user_id: self.user_id,
            lesson_id: self.lesson_id,
            quiz_id,
        };
        match self.completions.record_completion(params).await {
            Ok(()) => counter!("aula_quiz_completion_total").increment(1),
            Err(RepoError::Duplicate { constraint }) => {
                // Another tab got there first; the fact exists, which is
                // all that matters.
                debug!(%constraint, "completion already recorded");
            }
            Err(error) => {
                warn!(%error, "failed to record quiz completion");
                self.phase = QuizPhase::AnswerSelected(selected);
                return Err(error.into());
            }
        }

        if let Err(error) = self.progress.recompute_progress(self.user_id, quiz_id).await {
            warn!(%error, "progress recomputation failed");
            self.phase = QuizPhase::AnswerSelected(selected);
            return Err(error.into());
        }

        self.completed = true;
        self.phase = QuizPhase::Completed;
        Ok(self.phase)
    }
}
