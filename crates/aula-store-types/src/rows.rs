//! Row representations mirrored from persisted tables.
//!
//! `*Row` structs are what the store returns; `New*Row` structs are insert
//! payloads and deliberately omit store-assigned columns (id, timestamps).
//! Enumerated columns travel as their snake_case string form; the engine
//! owns the typed enums.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub category: String,
    pub level: String,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub paid: bool,
    pub status: String,
    #[serde(default)]
    pub student_count: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourseRow {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub hero_image: Option<String>,
    pub category: String,
    pub level: String,
    pub duration_minutes: i32,
    pub requirements: String,
    pub skills: String,
    pub featured: bool,
    pub paid: bool,
    pub status: String,
}

/// Full-field patch for a course content update. Status changes travel
/// separately through [`CourseStatusPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePatch {
    pub title: String,
    pub description: String,
    pub hero_image: Option<String>,
    pub category: String,
    pub level: String,
    pub duration_minutes: i32,
    pub requirements: String,
    pub skills: String,
    pub featured: bool,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStatusPatch {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub step_order: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub duration_minutes: i32,
    /// `null` and `{}` are both valid persisted forms of "no topics".
    #[serde(default)]
    pub topics: Option<BTreeMap<String, String>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLessonRow {
    pub course_id: Uuid,
    pub step_order: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_minutes: i32,
    /// Serialized unconditionally so an emptied topics map is written as
    /// an explicit empty object, not omitted from the payload.
    pub topics: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPatch {
    pub step_order: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_minutes: i32,
    pub topics: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRow {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub file_url: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDownloadRow {
    pub lesson_id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size_bytes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadPatch {
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size_bytes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRow {
    pub id: Uuid,
    pub lesson_id: Uuid,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub questions: Vec<QuizQuestionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestionRow {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCompletionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub quiz_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuizCompletionRow {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub quiz_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub enrolled_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEnrollmentRow {
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub percent: i32,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgressRow {
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub percent: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRow {
    pub user_id: Uuid,
    pub payload: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Upsert payload for the per-user draft record; conflicts resolve on
/// `user_id` so each user holds at most one remote draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftUpsertRow {
    pub user_id: Uuid,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRow {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub payload_text: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
