//! Editable authoring shapes and the conversions between them and
//! persisted rows.
//!
//! Everything here is pure and infallible: malformed or partial input
//! degrades to documented defaults (empty string, `None`, empty list) so
//! a broken draft can never lock the author out of the form. Every field
//! of the serialized shapes carries `#[serde(default)]` for the same
//! reason.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{DownloadRecord, LessonRecord};
use crate::domain::types::{CourseLevel, LessonKey};

/// Upper bound on download attachments per lesson during authoring.
pub const MAX_LESSON_DOWNLOADS: usize = 4;

const FALLBACK_FILE_TYPE: &str = "application/octet-stream";

/// One editable topic line. Duplicates and blank keys are legal while
/// editing; they are resolved when the list is denormalized to a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl TopicEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Convert a persisted topics map into the ordered editable list.
///
/// The map has no inherent order; entries come out in key order, which
/// is why re-editing a lesson may reorder topics the author entered in a
/// different sequence.
pub fn topics_to_entries(topics: &BTreeMap<String, String>) -> Vec<TopicEntry> {
    topics
        .iter()
        .map(|(key, value)| TopicEntry::new(key.clone(), value.clone()))
        .collect()
}

/// Denormalize the editable list back into the persisted map shape.
///
/// Keys are trimmed; entries whose trimmed key is blank are dropped; the
/// last occurrence of a duplicated key wins. Applying this to an
/// already-denormalized list is a no-op.
pub fn entries_to_topics(entries: &[TopicEntry]) -> BTreeMap<String, String> {
    let mut topics = BTreeMap::new();
    for entry in entries {
        let key = entry.key.trim();
        if key.is_empty() {
            continue;
        }
        topics.insert(key.to_string(), entry.value.clone());
    }
    topics
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableDownload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size_bytes: i64,
}

impl EditableDownload {
    pub fn from_record(record: &DownloadRecord) -> Self {
        Self {
            id: Some(record.id),
            title: record.title.clone(),
            description: record.description.clone(),
            file_url: record.file_url.clone(),
            file_type: record.file_type.clone(),
            file_size_bytes: record.file_size_bytes,
        }
    }

    /// File type to persist: the author's explicit choice when present,
    /// otherwise a guess from the file URL's extension.
    pub fn resolved_file_type(&self) -> String {
        if !self.file_type.trim().is_empty() {
            return self.file_type.trim().to_string();
        }
        mime_guess::from_path(&self.file_url)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_FILE_TYPE.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableLesson {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub topics: Vec<TopicEntry>,
    #[serde(default)]
    pub downloads: Vec<EditableDownload>,
    /// Transient list-UI state; survives drafts but never persists to a row.
    #[serde(default)]
    pub expanded: bool,
}

impl EditableLesson {
    pub fn from_record(record: &LessonRecord) -> Self {
        Self {
            id: Some(record.id),
            title: record.title.clone(),
            description: record.description.clone(),
            video_url: record.video_url.clone(),
            duration_minutes: record.duration_minutes,
            topics: topics_to_entries(&record.topics),
            downloads: Vec::new(),
            expanded: false,
        }
    }

    /// Identity for list keying: the durable id when persisted, the
    /// insertion index otherwise.
    pub fn key(&self, index: usize) -> LessonKey {
        match self.id {
            Some(id) => LessonKey::Persisted(id),
            None => LessonKey::Pending(index as u32),
        }
    }

    fn has_content(&self) -> bool {
        !self.title.trim().is_empty()
            || !self.description.trim().is_empty()
            || !self.video_url.trim().is_empty()
            || self.duration_minutes != 0
            || !self.topics.is_empty()
            || !self.downloads.is_empty()
    }
}

/// Serialized snapshot of the entire create-course form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: Option<CourseLevel>,
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
    #[serde(default)]
    pub student_count: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub lessons: Vec<EditableLesson>,
}

impl CourseDraft {
    /// Content-presence gate for draft persistence: an all-default
    /// snapshot is not worth a write and an existing stored draft for it
    /// should be cleared.
    pub fn has_content(&self) -> bool {
        let scalar_content = [
            &self.title,
            &self.slug,
            &self.description,
            &self.hero_image,
            &self.category,
            &self.requirements,
            &self.skills,
        ]
        .iter()
        .any(|field| !field.trim().is_empty());

        scalar_content
            || self.level.is_some()
            || self.featured
            || self.student_count != 0
            || self.rating != 0.0
            || self.lesson_count != 0
            || self.lessons.iter().any(EditableLesson::has_content)
    }
}
