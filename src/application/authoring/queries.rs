use uuid::Uuid;

use crate::application::repos::{CourseQueryFilter, RepoError};
use crate::domain::authoring::{EditableDownload, EditableLesson};
use crate::domain::entities::CourseRecord;

use super::service::AuthoringService;
use super::types::AuthoringError;

/// A persisted course loaded into its editable form: the course row
/// plus the lesson tree with downloads attached, every entry keyed by
/// its durable id.
#[derive(Debug, Clone)]
pub struct CourseEditor {
    pub course: CourseRecord,
    pub lessons: Vec<EditableLesson>,
}

impl AuthoringService {
    pub async fn list(
        &self,
        filter: &CourseQueryFilter,
    ) -> Result<Vec<CourseRecord>, AuthoringError> {
        self.courses
            .list_courses(filter)
            .await
            .map_err(AuthoringError::from)
    }

    pub async fn load_course(&self, id: Uuid) -> Result<Option<CourseRecord>, AuthoringError> {
        self.courses.find_by_id(id).await.map_err(AuthoringError::from)
    }

    /// Load a course into the authoring form for editing.
    pub async fn load_editor(&self, course_id: Uuid) -> Result<CourseEditor, AuthoringError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut lessons = Vec::new();
        for record in self.lessons.list_for_course(course_id).await? {
            let mut lesson = EditableLesson::from_record(&record);
            lesson.downloads = self
                .downloads
                .list_for_lesson(record.id)
                .await?
                .iter()
                .map(EditableDownload::from_record)
                .collect();
            lessons.push(lesson);
        }

        Ok(CourseEditor { course, lessons })
    }
}
