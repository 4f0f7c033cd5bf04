mod commands;
mod queries;
mod service;
mod sync;
pub mod types;

pub use queries::CourseEditor;
pub use service::*;
pub use types::{
    AuthoringError, CourseSaveOutcome, CourseSummarySnapshot, CreateCourseCommand, LessonRemoval,
    RemovalChallenge, UpdateCourseCommand, validate_course,
};
