//! Lesson-tree reconciliation against the remote store.
//!
//! Given the in-memory tree (a mix of persisted and not-yet-persisted
//! lessons) the engine issues the minimal insert/update/delete set,
//! strictly per lesson in display order: the lesson row first, its
//! store-assigned id written back, then its downloads. A download is
//! never written against a lesson id the store has not confirmed.
//!
//! The first failing operation aborts the remainder; rows already
//! written stay committed and a resubmit is safe because updates are
//! idempotent and freshly inserted rows now carry ids.

use std::time::Instant;

use metrics::{counter, histogram};
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{
    CreateDownloadParams, CreateLessonParams, RepoError, UpdateDownloadParams, UpdateLessonParams,
};
use crate::domain::authoring::{EditableLesson, entries_to_topics};

use super::service::AuthoringService;

impl AuthoringService {
    pub(crate) async fn reconcile_lessons(
        &self,
        course_id: Uuid,
        lessons: &mut [EditableLesson],
    ) -> Result<(), RepoError> {
        let started = Instant::now();

        for (index, lesson) in lessons.iter_mut().enumerate() {
            let step_order = (index + 1) as i32;
            let topics = entries_to_topics(&lesson.topics);

            let lesson_id = match lesson.id {
                Some(id) => {
                    self.lessons_writer
                        .update_lesson(UpdateLessonParams {
                            id,
                            step_order,
                            title: lesson.title.clone(),
                            description: lesson.description.clone(),
                            video_url: lesson.video_url.clone(),
                            duration_minutes: lesson.duration_minutes,
                            topics,
                        })
                        .await?;
                    counter!("aula_sync_update_total").increment(1);
                    id
                }
                None => {
                    let created = self
                        .lessons_writer
                        .create_lesson(CreateLessonParams {
                            course_id,
                            step_order,
                            title: lesson.title.clone(),
                            description: lesson.description.clone(),
                            video_url: lesson.video_url.clone(),
                            duration_minutes: lesson.duration_minutes,
                            topics,
                        })
                        .await?;
                    counter!("aula_sync_insert_total").increment(1);
                    // Downloads below reference the lesson by this id.
                    lesson.id = Some(created.id);
                    created.id
                }
            };

            self.reconcile_downloads(lesson_id, lesson).await?;

            debug!(%course_id, %lesson_id, step_order, "lesson reconciled");
        }

        histogram!("aula_sync_save_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        Ok(())
    }

    async fn reconcile_downloads(
        &self,
        lesson_id: Uuid,
        lesson: &mut EditableLesson,
    ) -> Result<(), RepoError> {
        let keep: Vec<Uuid> = lesson
            .downloads
            .iter()
            .filter_map(|download| download.id)
            .collect();

        let removed = self
            .downloads_writer
            .delete_for_lesson_except(lesson_id, &keep)
            .await?;
        if removed > 0 {
            counter!("aula_sync_delete_total").increment(removed);
        }

        for download in &mut lesson.downloads {
            match download.id {
                Some(id) => {
                    self.downloads_writer
                        .update_download(UpdateDownloadParams {
                            id,
                            title: download.title.clone(),
                            description: download.description.clone(),
                            file_url: download.file_url.clone(),
                            file_type: download.resolved_file_type(),
                            file_size_bytes: download.file_size_bytes,
                        })
                        .await?;
                    counter!("aula_sync_update_total").increment(1);
                }
                None => {
                    let created = self
                        .downloads_writer
                        .create_download(CreateDownloadParams {
                            lesson_id,
                            title: download.title.clone(),
                            description: download.description.clone(),
                            file_url: download.file_url.clone(),
                            file_type: download.resolved_file_type(),
                            file_size_bytes: download.file_size_bytes,
                        })
                        .await?;
                    counter!("aula_sync_insert_total").increment(1);
                    download.id = Some(created.id);
                }
            }
        }

        Ok(())
    }
}
