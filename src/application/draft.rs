//! Dual-location persistence for in-progress authoring drafts.
//!
//! A draft lives in two independent write-through locations: a
//! device-scoped local slot written synchronously on every change, and a
//! per-user remote record upserted after a quiet period. On restore the
//! remote record wins when the user is signed in; the locations are
//! never merged field-by-field. Storage failures degrade to "draft not
//! saved this cycle" — the in-memory form state belongs to the caller
//! and is never at risk here.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::repos::DraftsRepo;
use crate::domain::authoring::CourseDraft;
use crate::infra::local::LocalSlot;

/// Flags for enabling the restore controls in the authoring UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftPresence {
    pub has_local_draft: bool,
    pub has_server_draft: bool,
}

pub struct DraftStore {
    local: Arc<dyn LocalSlot>,
    remote: Arc<dyn DraftsRepo>,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DraftStore {
    pub fn new(local: Arc<dyn LocalSlot>, remote: Arc<dyn DraftsRepo>, debounce: Duration) -> Self {
        Self {
            local,
            remote,
            debounce,
            pending: Mutex::new(None),
        }
    }

    /// Persist the current form snapshot after a tracked-field change.
    ///
    /// An all-default snapshot clears both locations instead of writing;
    /// anything with content writes the local slot immediately and, for
    /// signed-in users, restarts the debounced remote upsert.
    pub async fn record_change(&self, user: Option<Uuid>, draft: &CourseDraft) {
        if !draft.has_content() {
            self.cancel_pending().await;
            if let Err(error) = self.local.clear().await {
                warn!(%error, "failed to clear local draft slot");
            }
            if let Some(user_id) = user {
                self.clear_remote_if_present(user_id).await;
            }
            return;
        }

        match serde_json::to_string(draft) {
            Ok(payload) => {
                if let Err(error) = self.local.store(&payload).await {
                    counter!("aula_draft_skip_total").increment(1);
                    warn!(%error, "draft not cached locally this cycle");
                } else {
                    counter!("aula_draft_write_total").increment(1);
                }
            }
            Err(error) => warn!(%error, "failed to serialize draft snapshot"),
        }

        if let Some(user_id) = user {
            self.schedule_remote_upsert(user_id, draft.clone()).await;
        }
    }

    /// Load the draft to resume from, preferring the remote record for
    /// signed-in users. Returns `None` when nothing restorable exists;
    /// unreadable snapshots degrade to `None` rather than erroring.
    pub async fn restore(&self, user: Option<Uuid>) -> Option<CourseDraft> {
        if let Some(user_id) = user {
            match self.remote.find_draft(user_id).await {
                Ok(Some(record)) => return Some(record.payload),
                Ok(None) => {}
                Err(error) => {
                    warn!(%error, "remote draft lookup failed; falling back to local slot");
                }
            }
        }

        match self.local.load().await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(draft) => Some(draft),
                Err(error) => {
                    warn!(%error, "local draft snapshot unreadable");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "local draft slot unreadable");
                None
            }
        }
    }

    pub async fn presence(&self, user: Option<Uuid>) -> DraftPresence {
        let has_local_draft = matches!(self.local.load().await, Ok(Some(_)));

        let has_server_draft = match user {
            Some(user_id) => match self.remote.find_draft(user_id).await {
                Ok(record) => record.is_some(),
                Err(error) => {
                    warn!(%error, "remote draft lookup failed");
                    false
                }
            },
            None => false,
        };

        DraftPresence {
            has_local_draft,
            has_server_draft,
        }
    }

    /// Best-effort removal of both locations, used after a successful
    /// course creation and on an explicit user-initiated clear. Failures
    /// are logged and swallowed; this must never block the success path.
    pub async fn clear(&self, user: Option<Uuid>) {
        self.cancel_pending().await;

        if let Err(error) = self.local.clear().await {
            warn!(%error, "failed to clear local draft slot");
        }
        if let Some(user_id) = user {
            self.clear_remote_if_present(user_id).await;
        }
    }

    async fn schedule_remote_upsert(&self, user_id: Uuid, draft: CourseDraft) {
        let remote = Arc::clone(&self.remote);
        let delay = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match remote.upsert_draft(user_id, &draft).await {
                Ok(()) => {
                    counter!("aula_draft_write_total").increment(1);
                    debug!(%user_id, "remote draft upserted");
                }
                Err(error) => {
                    counter!("aula_draft_skip_total").increment(1);
                    warn!(%error, %user_id, "remote draft upsert failed");
                }
            }
        });

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    async fn clear_remote_if_present(&self, user_id: Uuid) {
        match self.remote.find_draft(user_id).await {
            Ok(Some(_)) => {
                if let Err(error) = self.remote.delete_draft(user_id).await {
                    warn!(%error, %user_id, "failed to delete remote draft");
                }
            }
            Ok(None) => {}
            Err(error) => warn!(%error, %user_id, "remote draft lookup failed"),
        }
    }

    async fn cancel_pending(&self) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
