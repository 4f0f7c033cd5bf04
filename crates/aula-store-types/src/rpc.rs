//! Payloads for the store's remote procedures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the server-side progress recomputation procedure.
///
/// The required-vs-optional percentage arithmetic lives behind this call;
/// clients only request recomputation and read the resulting
/// `course_progress` row back.
pub const RPC_RECOMPUTE_PROGRESS: &str = "recompute_progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecomputeProgressParams {
    pub user_id: Uuid,
    pub quiz_id: Uuid,
}
