use async_trait::async_trait;
use uuid::Uuid;

use aula_store_types::{EnrollmentRow, NewEnrollmentRow, NewProgressRow, ProgressRow, tables};

use crate::application::repos::{
    CreateEnrollmentParams, CreateProgressParams, EnrollmentsRepo, ProgressRepo, RepoError,
};
use crate::domain::entities::{EnrollmentRecord, ProgressRecord};
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

impl From<EnrollmentRow> for EnrollmentRecord {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            enrolled_at: row.enrolled_at,
        }
    }
}

impl From<ProgressRow> for ProgressRecord {
    fn from(row: ProgressRow) -> Self {
        Self {
            id: row.id,
            enrollment_id: row.enrollment_id,
            user_id: row.user_id,
            course_id: row.course_id,
            percent: row.percent,
            completed: row.completed,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EnrollmentsRepo for RemoteRepositories {
    async fn find_enrollment(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<EnrollmentRecord>, RepoError> {
        let rows: Vec<EnrollmentRow> = self
            .store()
            .select(
                tables::ENROLLMENTS,
                &Filter::new()
                    .eq("user_id", user_id)
                    .eq("course_id", course_id),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().next().map(EnrollmentRecord::from))
    }

    async fn create_enrollment(
        &self,
        params: CreateEnrollmentParams,
    ) -> Result<EnrollmentRecord, RepoError> {
        let row = NewEnrollmentRow {
            user_id: params.user_id,
            course_id: params.course_id,
        };

        let created: EnrollmentRow = self
            .store()
            .insert(tables::ENROLLMENTS, &row)
            .await
            .map_err(map_store_error)?;

        Ok(created.into())
    }
}

#[async_trait]
impl ProgressRepo for RemoteRepositories {
    async fn find_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RepoError> {
        let rows: Vec<ProgressRow> = self
            .store()
            .select(
                tables::PROGRESS,
                &Filter::new()
                    .eq("user_id", user_id)
                    .eq("course_id", course_id),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().next().map(ProgressRecord::from))
    }

    async fn create_progress(
        &self,
        params: CreateProgressParams,
    ) -> Result<ProgressRecord, RepoError> {
        let row = NewProgressRow {
            enrollment_id: params.enrollment_id,
            user_id: params.user_id,
            course_id: params.course_id,
            percent: 0,
            completed: false,
        };

        let created: ProgressRow = self
            .store()
            .insert(tables::PROGRESS, &row)
            .await
            .map_err(map_store_error)?;

        Ok(created.into())
    }
}
