use uuid::Uuid;

use crate::application::repos::{
    CreateCourseParams, UpdateCourseParams, UpdateCourseStatusParams,
};
use crate::domain::authoring::EditableLesson;
use crate::domain::confirm::{ConfirmError, confirm_course_removal, confirm_lesson_removal};
use crate::domain::entities::CourseRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug};
use crate::domain::types::CourseStatus;

use super::service::AuthoringService;
use super::types::{
    AuthoringError, CourseSaveOutcome, CourseSummarySnapshot, CreateCourseCommand, LessonRemoval,
    RemovalChallenge, UpdateCourseCommand, validate_course,
};

impl AuthoringService {
    /// Create a course from the submitted authoring form and bring the
    /// remote lesson tree in line with it. On success the stored draft
    /// is cleared (best-effort) and the returned tree carries durable
    /// ids throughout.
    pub async fn create_course(
        &self,
        actor: &str,
        command: CreateCourseCommand,
    ) -> Result<CourseSaveOutcome, AuthoringError> {
        validate_course(&command.title, &command.lessons)?;

        let courses = self.courses.clone();
        let slug = match generate_unique_slug(&command.title, move |candidate| {
            let courses = courses.clone();
            let candidate = candidate.to_string();
            async move {
                courses
                    .find_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await
        {
            Ok(slug) => slug,
            Err(SlugAsyncError::Slug(SlugError::EmptyInput | SlugError::Unrepresentable { .. })) => {
                return Err(AuthoringError::validation(
                    "course title cannot be turned into a slug",
                ));
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { .. })) => {
                return Err(AuthoringError::validation(
                    "no unique slug is available for this title",
                ));
            }
            Err(SlugAsyncError::Predicate(err)) => return Err(AuthoringError::Repo(err)),
        };

        let course = self
            .courses_writer
            .create_course(CreateCourseParams {
                slug,
                title: command.title,
                description: command.description,
                hero_image: command.hero_image,
                category: command.category,
                level: command.level,
                duration_minutes: command.duration_minutes,
                requirements: command.requirements,
                skills: command.skills,
                featured: command.featured,
                paid: command.paid,
                status: CourseStatus::Draft,
            })
            .await?;

        let mut lessons = command.lessons;
        self.reconcile_lessons(course.id, &mut lessons).await?;

        // Never blocks the success path; failures are logged inside.
        self.drafts.clear(command.author).await;

        self.record_course_audit(actor, "course.create", &course)
            .await?;

        Ok(CourseSaveOutcome { course, lessons })
    }

    /// Update a course's fields and reconcile its lesson tree. The
    /// stored slug is kept; titles may change without breaking URLs.
    pub async fn update_course(
        &self,
        actor: &str,
        command: UpdateCourseCommand,
    ) -> Result<CourseSaveOutcome, AuthoringError> {
        validate_course(&command.title, &command.lessons)?;

        let course = self
            .courses_writer
            .update_course(UpdateCourseParams {
                id: command.id,
                title: command.title,
                description: command.description,
                hero_image: command.hero_image,
                category: command.category,
                level: command.level,
                duration_minutes: command.duration_minutes,
                requirements: command.requirements,
                skills: command.skills,
                featured: command.featured,
                paid: command.paid,
            })
            .await?;

        let mut lessons = command.lessons;
        self.reconcile_lessons(course.id, &mut lessons).await?;

        self.record_course_audit(actor, "course.update", &course)
            .await?;

        Ok(CourseSaveOutcome { course, lessons })
    }

    /// Reviewer action: make the course visible in the catalog.
    pub async fn publish_course(
        &self,
        actor: &str,
        id: Uuid,
    ) -> Result<CourseRecord, AuthoringError> {
        let course = self
            .courses_writer
            .update_course_status(UpdateCourseStatusParams {
                id,
                status: CourseStatus::Published,
            })
            .await?;

        self.record_course_audit(actor, "course.publish", &course)
            .await?;

        Ok(course)
    }

    /// Remove a course after the two-factor confirmation (retyped title
    /// plus the shared removal secret). Rejections happen before any
    /// store call; the store cascades the delete to lessons.
    pub async fn remove_course(
        &self,
        actor: &str,
        id: Uuid,
        challenge: RemovalChallenge,
    ) -> Result<(), AuthoringError> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(ConfirmError::NotFound)?;

        confirm_course_removal(
            &course.title,
            &challenge.typed_title,
            &self.removal_secret_hash,
            &challenge.secret,
        )?;

        self.courses_writer.delete_course(id).await?;

        self.record_course_audit(actor, "course.remove", &course)
            .await?;

        Ok(())
    }

    /// Remove a lesson from the editing session. Lessons that never
    /// reached the store are dropped from memory with no network call;
    /// persisted lessons require the retype-title confirmation and are
    /// deleted immediately rather than at the next save.
    pub async fn remove_lesson(
        &self,
        actor: &str,
        lesson: &EditableLesson,
        typed_title: &str,
    ) -> Result<LessonRemoval, AuthoringError> {
        let Some(id) = lesson.id else {
            return Ok(LessonRemoval::DroppedLocally);
        };

        confirm_lesson_removal(&lesson.title, typed_title)?;

        self.lessons_writer.delete_lesson(id).await?;

        self.audit
            .record(
                actor,
                "lesson.remove",
                "lesson",
                Some(&id.to_string()),
                Option::<&CourseSummarySnapshot<'_>>::None,
            )
            .await?;

        Ok(LessonRemoval::Deleted)
    }

    async fn record_course_audit(
        &self,
        actor: &str,
        action: &str,
        course: &CourseRecord,
    ) -> Result<(), AuthoringError> {
        let snapshot = CourseSummarySnapshot {
            slug: course.slug.as_str(),
            title: course.title.as_str(),
            status: course.status,
        };
        self.audit
            .record(
                actor,
                action,
                "course",
                Some(&course.id.to_string()),
                Some(&snapshot),
            )
            .await?;
        Ok(())
    }
}
