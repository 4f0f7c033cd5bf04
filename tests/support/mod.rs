//! Shared in-memory repository fakes for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use aula::application::audit::AuditService;
use aula::application::authoring::AuthoringService;
use aula::application::draft::DraftStore;
use aula::application::repos::{
    AuditRepo, CompletionsRepo, CourseQueryFilter, CoursesRepo, CoursesWriteRepo,
    CreateCourseParams, CreateDownloadParams, CreateEnrollmentParams, CreateLessonParams,
    CreateProgressParams, DownloadsRepo, DownloadsWriteRepo, DraftsRepo, EnrollmentsRepo,
    LessonsRepo, LessonsWriteRepo, ProgressRepo, ProgressRpc, QuizzesRepo, RecordCompletionParams,
    RepoError, UpdateCourseParams, UpdateCourseStatusParams, UpdateDownloadParams,
    UpdateLessonParams,
};
use aula::domain::authoring::CourseDraft;
use aula::domain::entities::{
    AuditLogRecord, CourseRecord, DownloadRecord, DraftRecord, EnrollmentRecord, LessonRecord,
    ProgressRecord, QuizCompletionRecord, QuizQuestion, QuizRecord,
};
use aula::domain::types::{CourseLevel, CourseStatus};
use aula::infra::local::MemorySlot;

#[derive(Default)]
pub struct MemoryStore {
    pub courses: Mutex<HashMap<Uuid, CourseRecord>>,
    pub lessons: Mutex<HashMap<Uuid, LessonRecord>>,
    pub downloads: Mutex<Vec<DownloadRecord>>,
    pub quizzes: Mutex<Vec<QuizRecord>>,
    pub completions: Mutex<Vec<QuizCompletionRecord>>,
    pub enrollments: Mutex<Vec<EnrollmentRecord>>,
    pub progress: Mutex<Vec<ProgressRecord>>,
    pub drafts: Mutex<HashMap<Uuid, DraftRecord>>,
    pub audit: Mutex<Vec<AuditLogRecord>>,
    pub recompute_calls: Mutex<Vec<(Uuid, Uuid)>>,
    ops: Mutex<Vec<String>>,
    pub fail_download_writes: AtomicBool,
    pub fail_progress_inserts: AtomicBool,
    pub fail_completion_inserts: AtomicBool,
    pub fail_draft_upserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn log_op(&self, op: &str) {
        self.ops.lock().unwrap().push(op.to_string());
    }

    pub fn op_count(&self, op: &str) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.as_str() == op)
            .count()
    }

    pub fn reset_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    pub fn seed_course(&self, title: &str) -> CourseRecord {
        let record = CourseRecord {
            id: Uuid::new_v4(),
            slug: slug::slugify(title),
            title: title.to_string(),
            description: String::new(),
            hero_image: None,
            category: "programming".to_string(),
            level: CourseLevel::Beginner,
            duration_minutes: 0,
            requirements: String::new(),
            skills: String::new(),
            featured: false,
            paid: false,
            status: CourseStatus::Draft,
            student_count: 0,
            rating: 0.0,
            created_at: Self::now(),
            updated_at: Self::now(),
        };
        self.courses
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn seed_lesson(&self, course_id: Uuid, step_order: i32, title: &str) -> LessonRecord {
        let record = LessonRecord {
            id: Uuid::new_v4(),
            course_id,
            step_order,
            title: title.to_string(),
            description: String::new(),
            video_url: "https://example.com/video.mp4".to_string(),
            duration_minutes: 10,
            topics: Default::default(),
            created_at: Self::now(),
            updated_at: Self::now(),
        };
        self.lessons
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn seed_download(&self, lesson_id: Uuid, title: &str) -> DownloadRecord {
        let record = DownloadRecord {
            id: Uuid::new_v4(),
            lesson_id,
            title: title.to_string(),
            description: String::new(),
            file_url: format!("https://cdn.example.com/{}.pdf", slug::slugify(title)),
            file_type: "application/pdf".to_string(),
            file_size_bytes: 1024,
            created_at: Self::now(),
        };
        self.downloads.lock().unwrap().push(record.clone());
        record
    }

    pub fn seed_quiz(&self, lesson_id: Uuid, required: bool, questions: usize) -> QuizRecord {
        let record = QuizRecord {
            id: Uuid::new_v4(),
            lesson_id,
            required,
            questions: (0..questions)
                .map(|index| QuizQuestion {
                    prompt: format!("Question {}", index + 1),
                    options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    answer_index: 1,
                })
                .collect(),
        };
        self.quizzes.lock().unwrap().push(record.clone());
        record
    }
}

#[async_trait]
impl CoursesRepo for MemoryStore {
    async fn list_courses(
        &self,
        filter: &CourseQueryFilter,
    ) -> Result<Vec<CourseRecord>, RepoError> {
        let courses = self.courses.lock().unwrap();
        Ok(courses
            .values()
            .filter(|course| {
                filter
                    .status
                    .map(|status| course.status == status)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepoError> {
        Ok(self.courses.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseRecord>, RepoError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .values()
            .find(|course| course.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl CoursesWriteRepo for MemoryStore {
    async fn create_course(&self, params: CreateCourseParams) -> Result<CourseRecord, RepoError> {
        let record = CourseRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            description: params.description,
            hero_image: params.hero_image,
            category: params.category,
            level: params.level,
            duration_minutes: params.duration_minutes,
            requirements: params.requirements,
            skills: params.skills,
            featured: params.featured,
            paid: params.paid,
            status: params.status,
            student_count: 0,
            rating: 0.0,
            created_at: Self::now(),
            updated_at: Self::now(),
        };
        self.courses
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        self.log_op("course.insert");
        Ok(record)
    }

    async fn update_course(&self, params: UpdateCourseParams) -> Result<CourseRecord, RepoError> {
        let mut courses = self.courses.lock().unwrap();
        let record = courses.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        record.title = params.title;
        record.description = params.description;
        record.hero_image = params.hero_image;
        record.category = params.category;
        record.level = params.level;
        record.duration_minutes = params.duration_minutes;
        record.requirements = params.requirements;
        record.skills = params.skills;
        record.featured = params.featured;
        record.paid = params.paid;
        record.updated_at = Self::now();
        self.log_op("course.update");
        Ok(record.clone())
    }

    async fn update_course_status(
        &self,
        params: UpdateCourseStatusParams,
    ) -> Result<CourseRecord, RepoError> {
        let mut courses = self.courses.lock().unwrap();
        let record = courses.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        record.status = params.status;
        record.updated_at = Self::now();
        self.log_op("course.status");
        Ok(record.clone())
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), RepoError> {
        self.courses.lock().unwrap().remove(&id);

        let mut lessons = self.lessons.lock().unwrap();
        let removed: Vec<Uuid> = lessons
            .values()
            .filter(|lesson| lesson.course_id == id)
            .map(|lesson| lesson.id)
            .collect();
        for lesson_id in &removed {
            lessons.remove(lesson_id);
        }
        self.downloads
            .lock()
            .unwrap()
            .retain(|download| !removed.contains(&download.lesson_id));

        self.log_op("course.delete");
        Ok(())
    }
}

#[async_trait]
impl LessonsRepo for MemoryStore {
    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<LessonRecord>, RepoError> {
        let mut lessons: Vec<LessonRecord> = self
            .lessons
            .lock()
            .unwrap()
            .values()
            .filter(|lesson| lesson.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|lesson| lesson.step_order);
        Ok(lessons)
    }
}

#[async_trait]
impl LessonsWriteRepo for MemoryStore {
    async fn create_lesson(&self, params: CreateLessonParams) -> Result<LessonRecord, RepoError> {
        let record = LessonRecord {
            id: Uuid::new_v4(),
            course_id: params.course_id,
            step_order: params.step_order,
            title: params.title,
            description: params.description,
            video_url: params.video_url,
            duration_minutes: params.duration_minutes,
            topics: params.topics,
            created_at: Self::now(),
            updated_at: Self::now(),
        };
        self.lessons
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        self.log_op("lesson.insert");
        Ok(record)
    }

    async fn update_lesson(&self, params: UpdateLessonParams) -> Result<LessonRecord, RepoError> {
        let mut lessons = self.lessons.lock().unwrap();
        let record = lessons.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        record.step_order = params.step_order;
        record.title = params.title;
        record.description = params.description;
        record.video_url = params.video_url;
        record.duration_minutes = params.duration_minutes;
        record.topics = params.topics;
        record.updated_at = Self::now();
        self.log_op("lesson.update");
        Ok(record.clone())
    }

    async fn delete_lesson(&self, id: Uuid) -> Result<(), RepoError> {
        self.lessons.lock().unwrap().remove(&id);
        self.downloads
            .lock()
            .unwrap()
            .retain(|download| download.lesson_id != id);
        self.log_op("lesson.delete");
        Ok(())
    }
}

#[async_trait]
impl DownloadsRepo for MemoryStore {
    async fn list_for_lesson(&self, lesson_id: Uuid) -> Result<Vec<DownloadRecord>, RepoError> {
        Ok(self
            .downloads
            .lock()
            .unwrap()
            .iter()
            .filter(|download| download.lesson_id == lesson_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DownloadsWriteRepo for MemoryStore {
    async fn create_download(
        &self,
        params: CreateDownloadParams,
    ) -> Result<DownloadRecord, RepoError> {
        if self.fail_download_writes.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("injected download failure"));
        }
        let record = DownloadRecord {
            id: Uuid::new_v4(),
            lesson_id: params.lesson_id,
            title: params.title,
            description: params.description,
            file_url: params.file_url,
            file_type: params.file_type,
            file_size_bytes: params.file_size_bytes,
            created_at: Self::now(),
        };
        self.downloads.lock().unwrap().push(record.clone());
        self.log_op("download.insert");
        Ok(record)
    }

    async fn update_download(
        &self,
        params: UpdateDownloadParams,
    ) -> Result<DownloadRecord, RepoError> {
        if self.fail_download_writes.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("injected download failure"));
        }
        let mut downloads = self.downloads.lock().unwrap();
        let record = downloads
            .iter_mut()
            .find(|download| download.id == params.id)
            .ok_or(RepoError::NotFound)?;
        record.title = params.title;
        record.description = params.description;
        record.file_url = params.file_url;
        record.file_type = params.file_type;
        record.file_size_bytes = params.file_size_bytes;
        self.log_op("download.update");
        Ok(record.clone())
    }

    async fn delete_for_lesson_except(
        &self,
        lesson_id: Uuid,
        keep: &[Uuid],
    ) -> Result<u64, RepoError> {
        let mut downloads = self.downloads.lock().unwrap();
        let before = downloads.len();
        downloads.retain(|download| {
            download.lesson_id != lesson_id || keep.contains(&download.id)
        });
        let removed = (before - downloads.len()) as u64;
        for _ in 0..removed {
            self.log_op("download.delete");
        }
        Ok(removed)
    }
}

#[async_trait]
impl QuizzesRepo for MemoryStore {
    async fn find_for_lesson(&self, lesson_id: Uuid) -> Result<Option<QuizRecord>, RepoError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|quiz| quiz.lesson_id == lesson_id)
            .cloned())
    }
}

#[async_trait]
impl CompletionsRepo for MemoryStore {
    async fn find_completion(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<QuizCompletionRecord>, RepoError> {
        Ok(self
            .completions
            .lock()
            .unwrap()
            .iter()
            .find(|completion| {
                completion.user_id == user_id && completion.lesson_id == lesson_id
            })
            .cloned())
    }

    async fn record_completion(&self, params: RecordCompletionParams) -> Result<(), RepoError> {
        if self.fail_completion_inserts.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("injected completion failure"));
        }
        let mut completions = self.completions.lock().unwrap();
        if completions.iter().any(|completion| {
            completion.user_id == params.user_id && completion.lesson_id == params.lesson_id
        }) {
            return Err(RepoError::Duplicate {
                constraint: "quiz_completions_user_lesson_key".to_string(),
            });
        }
        completions.push(QuizCompletionRecord {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            lesson_id: params.lesson_id,
            quiz_id: params.quiz_id,
            completed_at: Self::now(),
        });
        self.log_op("completion.insert");
        Ok(())
    }
}

#[async_trait]
impl EnrollmentsRepo for MemoryStore {
    async fn find_enrollment(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<EnrollmentRecord>, RepoError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|enrollment| {
                enrollment.user_id == user_id && enrollment.course_id == course_id
            })
            .cloned())
    }

    async fn create_enrollment(
        &self,
        params: CreateEnrollmentParams,
    ) -> Result<EnrollmentRecord, RepoError> {
        let mut enrollments = self.enrollments.lock().unwrap();
        if enrollments.iter().any(|enrollment| {
            enrollment.user_id == params.user_id && enrollment.course_id == params.course_id
        }) {
            return Err(RepoError::Duplicate {
                constraint: "enrollments_user_course_key".to_string(),
            });
        }
        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            course_id: params.course_id,
            enrolled_at: Self::now(),
        };
        enrollments.push(record.clone());
        self.log_op("enrollment.insert");
        Ok(record)
    }
}

#[async_trait]
impl ProgressRepo for MemoryStore {
    async fn find_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RepoError> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .find(|progress| progress.user_id == user_id && progress.course_id == course_id)
            .cloned())
    }

    async fn create_progress(
        &self,
        params: CreateProgressParams,
    ) -> Result<ProgressRecord, RepoError> {
        if self.fail_progress_inserts.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("injected progress failure"));
        }
        let mut progress = self.progress.lock().unwrap();
        if progress
            .iter()
            .any(|record| record.enrollment_id == params.enrollment_id)
        {
            return Err(RepoError::Duplicate {
                constraint: "course_progress_enrollment_key".to_string(),
            });
        }
        let record = ProgressRecord {
            id: Uuid::new_v4(),
            enrollment_id: params.enrollment_id,
            user_id: params.user_id,
            course_id: params.course_id,
            percent: 0,
            completed: false,
            updated_at: Self::now(),
        };
        progress.push(record.clone());
        self.log_op("progress.insert");
        Ok(record)
    }
}

#[async_trait]
impl ProgressRpc for MemoryStore {
    async fn recompute_progress(&self, user_id: Uuid, quiz_id: Uuid) -> Result<(), RepoError> {
        self.recompute_calls.lock().unwrap().push((user_id, quiz_id));
        Ok(())
    }
}

#[async_trait]
impl DraftsRepo for MemoryStore {
    async fn find_draft(&self, user_id: Uuid) -> Result<Option<DraftRecord>, RepoError> {
        Ok(self.drafts.lock().unwrap().get(&user_id).cloned())
    }

    async fn upsert_draft(&self, user_id: Uuid, draft: &CourseDraft) -> Result<(), RepoError> {
        if self.fail_draft_upserts.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("injected draft failure"));
        }
        self.drafts.lock().unwrap().insert(
            user_id,
            DraftRecord {
                user_id,
                payload: draft.clone(),
                updated_at: Self::now(),
            },
        );
        self.log_op("draft.upsert");
        Ok(())
    }

    async fn delete_draft(&self, user_id: Uuid) -> Result<(), RepoError> {
        self.drafts.lock().unwrap().remove(&user_id);
        self.log_op("draft.delete");
        Ok(())
    }
}

#[async_trait]
impl AuditRepo for MemoryStore {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        self.audit.lock().unwrap().push(record);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let audit = self.audit.lock().unwrap();
        Ok(audit.iter().rev().take(limit as usize).cloned().collect())
    }
}

/// Draft store wired to an in-memory slot and the fake remote, with a
/// short debounce suited to tests.
pub fn draft_store(store: &Arc<MemoryStore>, debounce: Duration) -> Arc<DraftStore> {
    Arc::new(DraftStore::new(
        Arc::new(MemorySlot::new()),
        store.clone(),
        debounce,
    ))
}

/// Authoring service over the fake store.
pub fn authoring_service(
    store: &Arc<MemoryStore>,
    drafts: Arc<DraftStore>,
    removal_secret_hash: Vec<u8>,
) -> AuthoringService {
    AuthoringService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        drafts,
        AuditService::new(store.clone()),
        removal_secret_hash,
    )
}
