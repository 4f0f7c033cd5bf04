use async_trait::async_trait;
use uuid::Uuid;

use aula_store_types::{
    NewQuizCompletionRow, QuizCompletionRow, QuizQuestionRow, QuizRow, RPC_RECOMPUTE_PROGRESS,
    RecomputeProgressParams, tables,
};

use crate::application::repos::{
    CompletionsRepo, ProgressRpc, QuizzesRepo, RecordCompletionParams, RepoError,
};
use crate::domain::entities::{QuizCompletionRecord, QuizQuestion, QuizRecord};
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

impl From<QuizQuestionRow> for QuizQuestion {
    fn from(row: QuizQuestionRow) -> Self {
        Self {
            prompt: row.prompt,
            options: row.options,
            answer_index: row.answer_index,
        }
    }
}

impl From<QuizRow> for QuizRecord {
    fn from(row: QuizRow) -> Self {
        Self {
            id: row.id,
            lesson_id: row.lesson_id,
            required: row.required,
            questions: row.questions.into_iter().map(QuizQuestion::from).collect(),
        }
    }
}

impl From<QuizCompletionRow> for QuizCompletionRecord {
    fn from(row: QuizCompletionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            lesson_id: row.lesson_id,
            quiz_id: row.quiz_id,
            completed_at: row.completed_at,
        }
    }
}

#[async_trait]
impl QuizzesRepo for RemoteRepositories {
    async fn find_for_lesson(&self, lesson_id: Uuid) -> Result<Option<QuizRecord>, RepoError> {
        let rows: Vec<QuizRow> = self
            .store()
            .select(tables::QUIZZES, &Filter::new().eq("lesson_id", lesson_id))
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().next().map(QuizRecord::from))
    }
}

#[async_trait]
impl CompletionsRepo for RemoteRepositories {
    async fn find_completion(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<QuizCompletionRecord>, RepoError> {
        let rows: Vec<QuizCompletionRow> = self
            .store()
            .select(
                tables::QUIZ_COMPLETIONS,
                &Filter::new()
                    .eq("user_id", user_id)
                    .eq("lesson_id", lesson_id),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().next().map(QuizCompletionRecord::from))
    }

    async fn record_completion(&self, params: RecordCompletionParams) -> Result<(), RepoError> {
        let row = NewQuizCompletionRow {
            user_id: params.user_id,
            lesson_id: params.lesson_id,
            quiz_id: params.quiz_id,
        };

        self.store()
            .insert_unit(tables::QUIZ_COMPLETIONS, &row)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl ProgressRpc for RemoteRepositories {
    async fn recompute_progress(&self, user_id: Uuid, quiz_id: Uuid) -> Result<(), RepoError> {
        self.store()
            .rpc(
                RPC_RECOMPUTE_PROGRESS,
                &RecomputeProgressParams { user_id, quiz_id },
            )
            .await
            .map_err(map_store_error)
    }
}
