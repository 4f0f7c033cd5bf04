//! Shared request and row types for the Aula remote course store.
//!
//! The engine talks to the store through a thin REST dialect; the types
//! here describe exactly what crosses the wire. Frontends that consume
//! the same store can depend on this crate without pulling in the engine.

mod rows;
mod rpc;

pub use rows::*;
pub use rpc::*;

/// Table names exposed by the store's REST surface.
pub mod tables {
    pub const COURSES: &str = "courses";
    pub const LESSONS: &str = "lessons";
    pub const DOWNLOADS: &str = "lesson_downloads";
    pub const QUIZZES: &str = "quizzes";
    pub const QUIZ_COMPLETIONS: &str = "quiz_completions";
    pub const ENROLLMENTS: &str = "enrollments";
    pub const PROGRESS: &str = "course_progress";
    pub const DRAFTS: &str = "course_drafts";
    pub const AUDIT_LOG: &str = "audit_log";
}
