use async_trait::async_trait;
use uuid::Uuid;

use aula_store_types::{CoursePatch, CourseRow, CourseStatusPatch, NewCourseRow, tables};

use crate::application::repos::{
    CourseQueryFilter, CoursesRepo, CoursesWriteRepo, CreateCourseParams, RepoError,
    UpdateCourseParams, UpdateCourseStatusParams,
};
use crate::domain::entities::CourseRecord;
use crate::domain::types::{CourseLevel, CourseStatus};
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

fn parse_level(value: &str) -> Result<CourseLevel, RepoError> {
    value
        .parse()
        .map_err(|()| RepoError::from_persistence(format!("unknown course level `{value}`")))
}

fn parse_status(value: &str) -> Result<CourseStatus, RepoError> {
    value
        .parse()
        .map_err(|()| RepoError::from_persistence(format!("unknown course status `{value}`")))
}

fn record_from_row(row: CourseRow) -> Result<CourseRecord, RepoError> {
    Ok(CourseRecord {
        id: row.id,
        slug: row.slug,
        title: row.title,
        description: row.description,
        hero_image: row.hero_image,
        category: row.category,
        level: parse_level(&row.level)?,
        duration_minutes: row.duration_minutes,
        requirements: row.requirements,
        skills: row.skills,
        featured: row.featured,
        paid: row.paid,
        status: parse_status(&row.status)?,
        student_count: row.student_count,
        rating: row.rating,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl CoursesRepo for RemoteRepositories {
    async fn list_courses(
        &self,
        filter: &CourseQueryFilter,
    ) -> Result<Vec<CourseRecord>, RepoError> {
        let mut query = Filter::new();
        if let Some(category) = filter.category.as_deref() {
            query = query.eq("category", category);
        }
        if let Some(level) = filter.level {
            query = query.eq("level", level.as_str());
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(search) = filter.search.as_deref() {
            query = query.contains("title", search);
        }
        query = query.order_desc("created_at");

        let rows: Vec<CourseRow> = self
            .store()
            .select(tables::COURSES, &query)
            .await
            .map_err(map_store_error)?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepoError> {
        let rows: Vec<CourseRow> = self
            .store()
            .select(tables::COURSES, &Filter::new().eq("id", id))
            .await
            .map_err(map_store_error)?;

        rows.into_iter().next().map(record_from_row).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseRecord>, RepoError> {
        let rows: Vec<CourseRow> = self
            .store()
            .select(tables::COURSES, &Filter::new().eq("slug", slug))
            .await
            .map_err(map_store_error)?;

        rows.into_iter().next().map(record_from_row).transpose()
    }
}

#[async_trait]
impl CoursesWriteRepo for RemoteRepositories {
    async fn create_course(&self, params: CreateCourseParams) -> Result<CourseRecord, RepoError> {
        let row = NewCourseRow {
            slug: params.slug,
            title: params.title,
            description: params.description,
            hero_image: params.hero_image,
            category: params.category,
            level: params.level.as_str().to_string(),
            duration_minutes: params.duration_minutes,
            requirements: params.requirements,
            skills: params.skills,
            featured: params.featured,
            paid: params.paid,
            status: params.status.as_str().to_string(),
        };

        let created: CourseRow = self
            .store()
            .insert(tables::COURSES, &row)
            .await
            .map_err(map_store_error)?;

        record_from_row(created)
    }

    async fn update_course(&self, params: UpdateCourseParams) -> Result<CourseRecord, RepoError> {
        let patch = CoursePatch {
            title: params.title,
            description: params.description,
            hero_image: params.hero_image,
            category: params.category,
            level: params.level.as_str().to_string(),
            duration_minutes: params.duration_minutes,
            requirements: params.requirements,
            skills: params.skills,
            featured: params.featured,
            paid: params.paid,
        };

        let updated: CourseRow = self
            .store()
            .update_returning(tables::COURSES, &Filter::new().eq("id", params.id), &patch)
            .await
            .map_err(map_store_error)?;

        record_from_row(updated)
    }

    async fn update_course_status(
        &self,
        params: UpdateCourseStatusParams,
    ) -> Result<CourseRecord, RepoError> {
        let patch = CourseStatusPatch {
            status: params.status.as_str().to_string(),
        };

        let updated: CourseRow = self
            .store()
            .update_returning(tables::COURSES, &Filter::new().eq("id", params.id), &patch)
            .await
            .map_err(map_store_error)?;

        record_from_row(updated)
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), RepoError> {
        self.store()
            .delete(tables::COURSES, &Filter::new().eq("id", id))
            .await
            .map_err(map_store_error)?;
        Ok(())
    }
}
