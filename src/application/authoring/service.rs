use std::sync::Arc;

use crate::application::audit::AuditService;
use crate::application::draft::DraftStore;
use crate::application::repos::{
    CoursesRepo, CoursesWriteRepo, DownloadsRepo, DownloadsWriteRepo, LessonsRepo,
    LessonsWriteRepo,
};

#[derive(Clone)]
pub struct AuthoringService {
    pub(crate) courses: Arc<dyn CoursesRepo>,
    pub(crate) courses_writer: Arc<dyn CoursesWriteRepo>,
    pub(crate) lessons: Arc<dyn LessonsRepo>,
    pub(crate) lessons_writer: Arc<dyn LessonsWriteRepo>,
    pub(crate) downloads: Arc<dyn DownloadsRepo>,
    pub(crate) downloads_writer: Arc<dyn DownloadsWriteRepo>,
    pub(crate) drafts: Arc<DraftStore>,
    pub(crate) audit: AuditService,
    pub(crate) removal_secret_hash: Vec<u8>,
}

impl AuthoringService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        courses: Arc<dyn CoursesRepo>,
        courses_writer: Arc<dyn CoursesWriteRepo>,
        lessons: Arc<dyn LessonsRepo>,
        lessons_writer: Arc<dyn LessonsWriteRepo>,
        downloads: Arc<dyn DownloadsRepo>,
        downloads_writer: Arc<dyn DownloadsWriteRepo>,
        drafts: Arc<DraftStore>,
        audit: AuditService,
        removal_secret_hash: Vec<u8>,
    ) -> Self {
        Self {
            courses,
            courses_writer,
            lessons,
            lessons_writer,
            downloads,
            downloads_writer,
            drafts,
            audit,
            removal_secret_hash,
        }
    }
}
