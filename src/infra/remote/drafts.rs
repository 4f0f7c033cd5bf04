use async_trait::async_trait;
use uuid::Uuid;

use aula_store_types::{DraftRow, DraftUpsertRow, tables};

use crate::application::repos::{DraftsRepo, RepoError};
use crate::domain::authoring::CourseDraft;
use crate::domain::entities::DraftRecord;
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

#[async_trait]
impl DraftsRepo for RemoteRepositories {
    async fn find_draft(&self, user_id: Uuid) -> Result<Option<DraftRecord>, RepoError> {
        let rows: Vec<DraftRow> = self
            .store()
            .select(tables::DRAFTS, &Filter::new().eq("user_id", user_id))
            .await
            .map_err(map_store_error)?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        // Unknown fields are ignored and missing ones default, so only a
        // payload that is not an object at all fails here.
        let payload: CourseDraft =
            serde_json::from_value(row.payload).map_err(RepoError::from_persistence)?;

        Ok(Some(DraftRecord {
            user_id: row.user_id,
            payload,
            updated_at: row.updated_at,
        }))
    }

    async fn upsert_draft(&self, user_id: Uuid, draft: &CourseDraft) -> Result<(), RepoError> {
        let row = DraftUpsertRow {
            user_id,
            payload: serde_json::to_value(draft).map_err(RepoError::from_persistence)?,
        };

        self.store()
            .upsert(tables::DRAFTS, &row, "user_id")
            .await
            .map_err(map_store_error)
    }

    async fn delete_draft(&self, user_id: Uuid) -> Result<(), RepoError> {
        self.store()
            .delete(tables::DRAFTS, &Filter::new().eq("user_id", user_id))
            .await
            .map_err(map_store_error)?;
        Ok(())
    }
}
