//! Domain entities mirrored from persistent storage.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::authoring::CourseDraft;
use crate::domain::types::{CourseLevel, CourseStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRecord {
    pub id: Uuid,
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
    pub student_count: i64,
    pub rating: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    /// 1-based, dense within a course; assigned from display order on save.
    pub step_order: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_minutes: i32,
    pub topics: BTreeMap<String, String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRecord {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size_bytes: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizRecord {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub required: bool,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizCompletionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub quiz_id: Uuid,
    pub completed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub percent: i32,
    pub completed: bool,
    pub updated_at: OffsetDateTime,
}

/// The per-user remote draft record; at most one exists per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftRecord {
    pub user_id: Uuid,
    pub payload: CourseDraft,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub payload_text: Option<String>,
    pub created_at: OffsetDateTime,
}
