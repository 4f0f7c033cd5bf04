//! Enrollment creation and progress reads for the lesson player.
//!
//! Enrolling is a check-then-insert sequence followed by a zeroed
//! progress row. The two inserts are not atomic; a gap between them
//! leaves an enrollment without progress, which readers tolerate by
//! treating the missing row as 0% / incomplete.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::repos::{
    CreateEnrollmentParams, CreateProgressParams, EnrollmentsRepo, ProgressRepo, RepoError,
};
use crate::domain::entities::EnrollmentRecord;

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Enrolled {
    Created(EnrollmentRecord),
    Existing(EnrollmentRecord),
}

impl Enrolled {
    pub fn record(&self) -> &EnrollmentRecord {
        match self {
            Self::Created(record) | Self::Existing(record) => record,
        }
    }
}

/// Progress as the lesson player renders it; substitutes zero when the
/// store has no row yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: i32,
    pub completed: bool,
}

impl ProgressView {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentsRepo>,
    progress: Arc<dyn ProgressRepo>,
}

impl EnrollmentService {
    pub fn new(enrollments: Arc<dyn EnrollmentsRepo>, progress: Arc<dyn ProgressRepo>) -> Self {
        Self {
            enrollments,
            progress,
        }
    }

    /// Enroll the user, creating the enrollment row and its zeroed
    /// progress row. Safe to call repeatedly: an existing enrollment is
    /// returned untouched, and a concurrent tab losing the insert race
    /// resolves to the surviving row.
    pub async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrolled, EnrollError> {
        if let Some(existing) = self.enrollments.find_enrollment(user_id, course_id).await? {
            return Ok(Enrolled::Existing(existing));
        }

        let record = match self
            .enrollments
            .create_enrollment(CreateEnrollmentParams { user_id, course_id })
            .await
        {
            Ok(record) => record,
            Err(RepoError::Duplicate { .. }) => {
                // Lost the race to a concurrent tab; the winner's row is
                // authoritative.
                let existing = self
                    .enrollments
                    .find_enrollment(user_id, course_id)
                    .await?
                    .ok_or_else(|| {
                        RepoError::from_persistence("enrollment missing after duplicate insert")
                    })?;
                return Ok(Enrolled::Existing(existing));
            }
            Err(error) => return Err(error.into()),
        };

        match self
            .progress
            .create_progress(CreateProgressParams {
                enrollment_id: record.id,
                user_id,
                course_id,
            })
            .await
        {
            Ok(_) => debug!(%user_id, %course_id, "enrollment initialized"),
            Err(RepoError::Duplicate { .. }) => {}
            Err(error) => {
                // Recoverable inconsistency: the enrollment stands and
                // readers substitute a zeroed view until the server-side
                // recomputation writes the row.
                warn!(%error, %user_id, %course_id, "enrollment created without progress record");
            }
        }

        Ok(Enrolled::Created(record))
    }

    /// Progress for the lesson player; a missing row reads as zero.
    pub async fn progress_for(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<ProgressView, EnrollError> {
        let view = self
            .progress
            .find_progress(user_id, course_id)
            .await?
            .map(|record| ProgressView {
                percent: record.percent,
                completed: record.completed,
            })
            .unwrap_or_else(ProgressView::zeroed);

        Ok(view)
    }
}
