use super::Tx;
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{DialplanCondition, DialplanContext, DialplanExtension};
use uuid::Uuid;

pub(super) async fn upsert_contexts(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    contexts: &[DialplanContext],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for context in contexts {
        let context_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.dialplan_contexts (context_uuid, tenant_uuid, context_name, category, enabled, insert_date)
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            ON CONFLICT (tenant_uuid, context_name)
            DO UPDATE SET
                category = EXCLUDED.category,
                update_date = NOW()
            RETURNING context_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&context.name)
        .bind(&context.category)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        for extension in &context.extensions {
            upsert_extension(tx, context_uuid, extension, summary).await?;
        }
    }
    Ok(())
}

/// Upserts one extension and replaces its conditions and actions.
async fn upsert_extension(
    tx: &mut Tx<'_>,
    context_uuid: Uuid,
    extension: &DialplanExtension,
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    let extension_uuid = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO core.dialplan_extensions (extension_uuid, context_uuid, extension_name, "continue", priority, xml_config, enabled, insert_date)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW())
        ON CONFLICT (context_uuid, extension_name)
        DO UPDATE SET
            "continue" = EXCLUDED."continue",
            priority = EXCLUDED.priority,
            xml_config = EXCLUDED.xml_config,
            update_date = NOW()
        RETURNING extension_uuid
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(context_uuid)
    .bind(&extension.name)
    .bind(extension.continue_on_match)
    .bind(extension.priority)
    .bind(&extension.xml_config)
    .fetch_one(&mut **tx)
    .await?;
    summary.written(1);

    sqlx::query(
        r#"
        DELETE FROM core.dialplan_actions
        WHERE condition_uuid IN (
            SELECT condition_uuid FROM core.dialplan_conditions WHERE extension_uuid = $1
        )
        "#,
    )
    .bind(extension_uuid)
    .execute(&mut **tx)
    .await?;
    sqlx::query("DELETE FROM core.dialplan_conditions WHERE extension_uuid = $1")
        .bind(extension_uuid)
        .execute(&mut **tx)
        .await?;

    for condition in &extension.conditions {
        insert_condition(tx, extension_uuid, condition, summary).await?;
    }
    Ok(())
}

async fn insert_condition(
    tx: &mut Tx<'_>,
    extension_uuid: Uuid,
    condition: &DialplanCondition,
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    let condition_uuid = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO core.dialplan_conditions (condition_uuid, extension_uuid, field, expression, break_on_match, regex, condition_order, insert_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        "#,
    )
    .bind(condition_uuid)
    .bind(extension_uuid)
    .bind(&condition.field)
    .bind(&condition.expression)
    .bind(&condition.break_on_match)
    .bind(condition.regex.as_deref())
    .bind(condition.order)
    .execute(&mut **tx)
    .await?;
    summary.written(1);

    for action in &condition.actions {
        sqlx::query(
            r#"
            INSERT INTO core.dialplan_actions (action_uuid, condition_uuid, action_type, application, data, inline, action_order, insert_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(condition_uuid)
        .bind(action.kind.as_str())
        .bind(&action.application)
        .bind(&action.data)
        .bind(action.inline)
        .bind(action.order)
        .execute(&mut **tx)
        .await?;
        summary.written(1);
    }
    Ok(())
}
