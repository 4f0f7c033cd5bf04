//! Repository traits describing persistence adapters.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::authoring::CourseDraft;
use crate::domain::entities::{
    AuditLogRecord, CourseRecord, DownloadRecord, DraftRecord, EnrollmentRecord, LessonRecord,
    ProgressRecord, QuizCompletionRecord, QuizRecord,
};
use crate::domain::types::{CourseLevel, CourseStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("store timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    /// Whether this failure is safe to resolve by re-issuing the same
    /// operation (updates are idempotent, inserts become updates once an
    /// id exists).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Persistence(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourseQueryFilter {
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub status: Option<CourseStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCourseParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub hero_image: Option<String>,
    pub category: String,
    pub level: CourseLevel,
    pub duration_minutes: i32,
    pub requirements: String,
    pub skills: String,
    pub featured: bool,
    pub paid: bool,
    pub status: CourseStatus,
}

#[derive(Debug, Clone)]
pub struct UpdateCourseParams {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub hero_image: Option<String>,
    pub category: String,
    pub level: CourseLevel,
    pub duration_minutes: i32,
    pub requirements: String,
    pub skills: String,
    pub featured: bool,
    pub paid: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateCourseStatusParams {
    pub id: Uuid,
    pub status: CourseStatus,
}

#[derive(Debug, Clone)]
pub struct CreateLessonParams {
    pub course_id: Uuid,
    pub step_order: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_minutes: i32,
    pub topics: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct UpdateLessonParams {
    pub id: Uuid,
    pub step_order: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_minutes: i32,
    pub topics: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct CreateDownloadParams {
    pub lesson_id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateDownloadParams {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size_bytes: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct RecordCompletionParams {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub quiz_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateEnrollmentParams {
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateProgressParams {
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[async_trait]
pub trait CoursesRepo: Send + Sync {
    async fn list_courses(&self, filter: &CourseQueryFilter) -> Result<Vec<CourseRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseRecord>, RepoError>;
}

#[async_trait]
pub trait CoursesWriteRepo: Send + Sync {
    async fn create_course(&self, params: CreateCourseParams) -> Result<CourseRecord, RepoError>;

    async fn update_course(&self, params: UpdateCourseParams) -> Result<CourseRecord, RepoError>;

    async fn update_course_status(
        &self,
        params: UpdateCourseStatusParams,
    ) -> Result<CourseRecord, RepoError>;

    /// Removes the course row; the store cascades the delete to the
    /// course's lessons and their downloads.
    async fn delete_course(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait LessonsRepo: Send + Sync {
    /// Lessons of a course ordered by `step_order`.
    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<LessonRecord>, RepoError>;
}

#[async_trait]
pub trait LessonsWriteRepo: Send + Sync {
    /// The returned record carries the store-assigned id.
    async fn create_lesson(&self, params: CreateLessonParams) -> Result<LessonRecord, RepoError>;

    async fn update_lesson(&self, params: UpdateLessonParams) -> Result<LessonRecord, RepoError>;

    async fn delete_lesson(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait DownloadsRepo: Send + Sync {
    async fn list_for_lesson(&self, lesson_id: Uuid) -> Result<Vec<DownloadRecord>, RepoError>;
}

#[async_trait]
pub trait DownloadsWriteRepo: Send + Sync {
    async fn create_download(
        &self,
        params: CreateDownloadParams,
    ) -> Result<DownloadRecord, RepoError>;

    async fn update_download(
        &self,
        params: UpdateDownloadParams,
    ) -> Result<DownloadRecord, RepoError>;

    /// Deletes every persisted download of the lesson whose id is not in
    /// `keep`; an empty keep-set deletes them all. Returns the number of
    /// rows removed.
    async fn delete_for_lesson_except(
        &self,
        lesson_id: Uuid,
        keep: &[Uuid],
    ) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait QuizzesRepo: Send + Sync {
    async fn find_for_lesson(&self, lesson_id: Uuid) -> Result<Option<QuizRecord>, RepoError>;
}

#[async_trait]
pub trait CompletionsRepo: Send + Sync {
    async fn find_completion(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<QuizCompletionRecord>, RepoError>;

    /// The store enforces at-most-one completion per (user, lesson);
    /// callers treat a `Duplicate` outcome as success-equivalent.
    async fn record_completion(&self, params: RecordCompletionParams) -> Result<(), RepoError>;
}

#[async_trait]
pub trait EnrollmentsRepo: Send + Sync {
    async fn find_enrollment(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<EnrollmentRecord>, RepoError>;

    async fn create_enrollment(
        &self,
        params: CreateEnrollmentParams,
    ) -> Result<EnrollmentRecord, RepoError>;
}

#[async_trait]
pub trait ProgressRepo: Send + Sync {
    async fn find_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RepoError>;

    /// Inserts the zeroed progress row that accompanies a fresh
    /// enrollment.
    async fn create_progress(
        &self,
        params: CreateProgressParams,
    ) -> Result<ProgressRecord, RepoError>;
}

/// Server-side progress arithmetic. The client never computes
/// percentages; it requests recomputation and reads the result back
/// through [`ProgressRepo`].
#[async_trait]
pub trait ProgressRpc: Send + Sync {
    async fn recompute_progress(&self, user_id: Uuid, quiz_id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait DraftsRepo: Send + Sync {
    async fn find_draft(&self, user_id: Uuid) -> Result<Option<DraftRecord>, RepoError>;

    /// Upserts on `user_id`: each user holds at most one remote draft.
    async fn upsert_draft(&self, user_id: Uuid, draft: &CourseDraft) -> Result<(), RepoError>;

    async fn delete_draft(&self, user_id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError>;

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError>;
}
