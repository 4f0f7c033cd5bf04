//! Remote-store-backed repository implementations.

mod audit;
mod courses;
mod drafts;
mod enrollments;
mod lessons;
mod quizzes;

use crate::application::repos::RepoError;
use crate::config::StoreSettings;

use super::store::{RestStore, StoreError};

/// One handle implementing every repository trait over the REST store.
#[derive(Debug, Clone)]
pub struct RemoteRepositories {
    store: RestStore,
}

impl RemoteRepositories {
    pub fn new(store: RestStore) -> Self {
        Self { store }
    }

    pub fn from_settings(settings: &StoreSettings) -> Result<Self, StoreError> {
        Ok(Self::new(RestStore::new(settings)?))
    }

    pub(crate) fn store(&self) -> &RestStore {
        &self.store
    }
}

pub(crate) fn map_store_error(err: StoreError) -> RepoError {
    match err {
        StoreError::Http(err) if err.is_timeout() => RepoError::Timeout,
        StoreError::Status { status: 409, body } => {
            if body.contains("duplicate key") || body.contains("23505") {
                RepoError::Duplicate {
                    constraint: extract_constraint(&body),
                }
            } else {
                RepoError::Integrity { message: body }
            }
        }
        StoreError::Status {
            status: 404 | 406, ..
        } => RepoError::NotFound,
        StoreError::Status {
            status: 400 | 422,
            body,
        } => RepoError::InvalidInput { message: body },
        StoreError::EmptyRepresentation => RepoError::NotFound,
        other => RepoError::from_persistence(other),
    }
}

fn extract_constraint(body: &str) -> String {
    body.split_once("constraint \"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
