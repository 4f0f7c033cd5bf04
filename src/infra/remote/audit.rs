use async_trait::async_trait;

use aula_store_types::{AuditLogRow, tables};

use crate::application::repos::{AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;
use crate::infra::store::Filter;

use super::{RemoteRepositories, map_store_error};

impl From<AuditLogRow> for AuditLogRecord {
    fn from(row: AuditLogRow) -> Self {
        Self {
            id: row.id,
            actor: row.actor,
            action: row.action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            payload_text: row.payload_text,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AuditRepo for RemoteRepositories {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        let row = AuditLogRow {
            id: record.id,
            actor: record.actor,
            action: record.action,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            payload_text: record.payload_text,
            created_at: record.created_at,
        };

        self.store()
            .insert_unit(tables::AUDIT_LOG, &row)
            .await
            .map_err(map_store_error)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let rows: Vec<AuditLogRow> = self
            .store()
            .select(
                tables::AUDIT_LOG,
                &Filter::new().order_desc("created_at").limit(limit),
            )
            .await
            .map_err(map_store_error)?;

        Ok(rows.into_iter().map(AuditLogRecord::from).collect())
    }
}
