use super::Tx;
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::BlacklistEntry;
use uuid::Uuid;

/// Inserts blacklisted numbers. Numbers already present are left untouched.
pub(super) async fn insert_entries(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    entries: &[BlacklistEntry],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for entry in entries {
        let result = sqlx::query(
            r#"
            INSERT INTO core.blacklist (blacklist_uuid, tenant_uuid, phone_number, insert_date)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (tenant_uuid, phone_number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&entry.phone_number)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            summary.skipped(1);
        } else {
            summary.written(1);
        }
    }
    Ok(())
}
