use super::Tx;
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::GlobalVar;
use uuid::Uuid;

/// Upserts global variables by name. They belong to no tenant.
pub(super) async fn upsert_global_vars(
    tx: &mut Tx<'_>,
    vars: &[GlobalVar],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for var in vars {
        sqlx::query(
            r#"
            INSERT INTO core.global_vars (var_uuid, tenant_uuid, name, value, description, enabled, insert_date)
            VALUES ($1, NULL, $2, $3, $4, TRUE, NOW())
            ON CONFLICT (name)
            DO UPDATE SET
                value = EXCLUDED.value,
                description = EXCLUDED.description,
                update_date = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&var.name)
        .bind(&var.value)
        .bind(&var.description)
        .execute(&mut **tx)
        .await?;
        summary.written(1);
    }
    Ok(())
}
