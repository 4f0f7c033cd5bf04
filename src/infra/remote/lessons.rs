use async_trait::async_trait;
use uuid::Uuid;

use aula_store_types::{
    DownloadPatch, DownloadRow, LessonPatch, LessonRow, NewDownloadRow, NewLessonRow, tables,
};

use crate::application::repos::{
    CreateDownloadParams, CreateLessonParams, DownloadsRepo, DownloadsWriteRepo, LessonsRepo,
    LessonsWriteRepo, RepoError, UpdateDownloadParams, UpdateLessonParams,
};
use crate::domain::entities::{DownloadRecord, LessonRecord};
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

impl From<LessonRow> for LessonRecord {
    fn from(row: LessonRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            step_order: row.step_order,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            duration_minutes: row.duration_minutes,
            topics: row.topics.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DownloadRow> for DownloadRecord {
    fn from(row: DownloadRow) -> Self {
        Self {
            id: row.id,
            lesson_id: row.lesson_id,
            title: row.title,
            description: row.description,
            file_url: row.file_url,
            file_type: row.file_type,
            file_size_bytes: row.file_size_bytes,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl LessonsRepo for RemoteRepositories {
    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<LessonRecord>, RepoError> {
        let rows: Vec<LessonRow> = self
            .store()
            .select(
                tables::LESSONS,
                &Filter::new()
                    .eq("course_id", course_id)
                    .order_asc("step_order"),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().map(LessonRecord::from).collect())
    }
}

#[async_trait]
impl LessonsWriteRepo for RemoteRepositories {
    async fn create_lesson(&self, params: CreateLessonParams) -> Result<LessonRecord, RepoError> {
        let row = NewLessonRow {
            course_id: params.course_id,
            step_order: params.step_order,
            title: params.title,
            description: params.description,
            video_url: params.video_url,
            duration_minutes: params.duration_minutes,
            topics: params.topics,
        };

        let created: LessonRow = self
            .store()
            .insert(tables::LESSONS, &row)
            .await
            .map_err(map_store_error)?;

        Ok(created.into())
    }

    async fn update_lesson(&self, params: UpdateLessonParams) -> Result<LessonRecord, RepoError> {
        let patch = LessonPatch {
            step_order: params.step_order,
            title: params.title,
            description: params.description,
            video_url: params.video_url,
            duration_minutes: params.duration_minutes,
            topics: params.topics,
        };

        let updated: LessonRow = self
            .store()
            .update_returning(tables::LESSONS, &Filter::new().eq("id", params.id), &patch)
            .await
            .map_err(map_store_error)?;

        Ok(updated.into())
    }

    async fn delete_lesson(&self, id: Uuid) -> Result<(), RepoError> {
        self.store()
            .delete(tables::LESSONS, &Filter::new().eq("id", id))
            .await
            .map_err(map_store_error)?;
        Ok(())
    }
}

#[async_trait]
impl DownloadsRepo for RemoteRepositories {
    async fn list_for_lesson(&self, lesson_id: Uuid) -> Result<Vec<DownloadRecord>, RepoError> {
        let rows: Vec<DownloadRow> = self
            .store()
            .select(
                tables::DOWNLOADS,
                &Filter::new()
                    .eq("lesson_id", lesson_id)
                    .order_asc("created_at"),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().map(DownloadRecord::from).collect())
    }
}

#[async_trait]
impl DownloadsWriteRepo for RemoteRepositories {
    async fn create_download(
        &self,
        params: CreateDownloadParams,
    ) -> Result<DownloadRecord, RepoError> {
        let row = NewDownloadRow {
            lesson_id: params.lesson_id,
            title: params.title,
            description: params.description,
            file_url: params.file_url,
            file_type: params.file_type,
            file_size_bytes: params.file_size_bytes,
        };

        let created: DownloadRow = self
            .store()
            .insert(tables::DOWNLOADS, &row)
            .await
            .map_err(map_store_error)?;

        Ok(created.into())
    }

    async fn update_download(
        &self,
        params: UpdateDownloadParams,
    ) -> Result<DownloadRecord, RepoError> {
        let patch = DownloadPatch {
            title: params.title,
            description: params.description,
            file_url: params.file_url,
            file_type: params.file_type,
            file_size_bytes: params.file_size_bytes,
        };

        let updated: DownloadRow = self
            .store()
            .update_returning(
                tables::DOWNLOADS,
                &Filter::new().eq("id", params.id),
                &patch,
            )
            .await
            .map_err(map_store_error)?;

        Ok(updated.into())
    }

    async fn delete_for_lesson_except(
        &self,
        lesson_id: Uuid,
        keep: &[Uuid],
    ) -> Result<u64, RepoError> {
        let mut filter = Filter::new().eq("lesson_id", lesson_id);
        if !keep.is_empty() {
            filter = filter.not_in("id", keep);
        }

        self.store()
            .delete(tables::DOWNLOADS, &filter)
            .await
            .map_err(map_store_error)
    }
}
