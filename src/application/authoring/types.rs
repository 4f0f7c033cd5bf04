use serde::Serialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::authoring::{EditableLesson, MAX_LESSON_DOWNLOADS};
use crate::domain::confirm::ConfirmError;
use crate::domain::entities::CourseRecord;
use crate::domain::types::{CourseLevel, CourseStatus};

#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AuthoringError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseSummarySnapshot<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub status: CourseStatus,
}

#[derive(Debug, Clone)]
pub struct CreateCourseCommand {
    /// Signed-in author, used to clear the stored draft after success.
    pub author: Option<Uuid>,
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
    pub lessons: Vec<EditableLesson>,
}

#[derive(Debug, Clone)]
pub struct UpdateCourseCommand {
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
    pub lessons: Vec<EditableLesson>,
}

/// Result of a successful save: the course row plus the lesson tree with
/// every entry now carrying its durable id.
#[derive(Debug, Clone)]
pub struct CourseSaveOutcome {
    pub course: CourseRecord,
    pub lessons: Vec<EditableLesson>,
}

/// What the author typed into the course-removal dialog.
#[derive(Debug, Clone)]
pub struct RemovalChallenge {
    pub typed_title: String,
    pub secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonRemoval {
    /// The lesson never reached the store; it was dropped from memory.
    DroppedLocally,
    /// The persisted row was deleted.
    Deleted,
}

/// Pre-flight validation for a course save. Runs before any store call
/// and surfaces a single specific message.
pub fn validate_course(title: &str, lessons: &[EditableLesson]) -> Result<(), AuthoringError> {
    if title.trim().is_empty() {
        return Err(AuthoringError::validation("course title is required"));
    }
    if lessons.is_empty() {
        return Err(AuthoringError::validation(
            "a course needs at least one lesson",
        ));
    }

    for (index, lesson) in lessons.iter().enumerate() {
        let position = index + 1;
        if lesson.title.trim().is_empty() {
            return Err(AuthoringError::Validation(format!(
                "lesson {position} is missing a title"
            )));
        }
        let video_url = lesson.video_url.trim();
        if video_url.is_empty() {
            return Err(AuthoringError::Validation(format!(
                "lesson {position} is missing a video URL"
            )));
        }
        if Url::parse(video_url).is_err() {
            return Err(AuthoringError::Validation(format!(
                "lesson {position} has an invalid video URL"
            )));
        }
        if lesson.downloads.len() > MAX_LESSON_DOWNLOADS {
            return Err(AuthoringError::Validation(format!(
                "lesson {position} has more than {MAX_LESSON_DOWNLOADS} downloads"
            )));
        }
    }

    Ok(())
}
