use super::{SettingsTable, Tx, replace_settings};
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{CallcenterAgent, CallcenterQueue, CallcenterTier};
use tracing::warn;
use uuid::Uuid;

const QUEUE_PARAMS: SettingsTable = SettingsTable {
    table: "core.callcenter_queue_params",
    id_column: "param_uuid",
    parent_column: "queue_uuid",
    order_column: "param_order",
};

pub(super) async fn upsert_queues(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    queues: &[CallcenterQueue],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for queue in queues {
        let queue_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.callcenter_queues (queue_uuid, tenant_uuid, name, strategy, moh_sound, max_wait_time, record_template, insert_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (tenant_uuid, name)
            DO UPDATE SET
                strategy = EXCLUDED.strategy,
                moh_sound = EXCLUDED.moh_sound,
                max_wait_time = EXCLUDED.max_wait_time,
                record_template = EXCLUDED.record_template,
                update_date = NOW()
            RETURNING queue_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&queue.name)
        .bind(&queue.strategy)
        .bind(&queue.moh_sound)
        .bind(queue.max_wait_time)
        .bind(queue.record_template.as_deref())
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        replace_settings(tx, &QUEUE_PARAMS, queue_uuid, &queue.params, summary).await?;
    }
    Ok(())
}

pub(super) async fn upsert_agents(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    agents: &[CallcenterAgent],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for agent in agents {
        sqlx::query(
            r#"
            INSERT INTO core.callcenter_agents (
                agent_uuid, tenant_uuid, name, type, contact, status, max_no_answer,
                wrap_up_time, reject_delay_time, busy_delay_time, insert_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (tenant_uuid, name)
            DO UPDATE SET
                type = EXCLUDED.type,
                contact = EXCLUDED.contact,
                status = EXCLUDED.status,
                max_no_answer = EXCLUDED.max_no_answer,
                wrap_up_time = EXCLUDED.wrap_up_time,
                reject_delay_time = EXCLUDED.reject_delay_time,
                busy_delay_time = EXCLUDED.busy_delay_time,
                update_date = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&agent.name)
        .bind(&agent.agent_type)
        .bind(agent.contact.as_deref())
        .bind(&agent.status)
        .bind(agent.max_no_answer)
        .bind(agent.wrap_up_time)
        .bind(agent.reject_delay_time)
        .bind(agent.busy_delay_time)
        .execute(&mut **tx)
        .await?;
        summary.written(1);
    }
    Ok(())
}

/// Links agents to queues by name.
///
/// A tier whose queue or agent does not exist for the tenant is skipped.
pub(super) async fn upsert_tiers(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    tiers: &[CallcenterTier],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for tier in tiers {
        let result = sqlx::query(
            r#"
            INSERT INTO core.callcenter_tiers (tier_uuid, tenant_uuid, queue_uuid, agent_uuid, level, position, insert_date)
            SELECT $1, $2, q.queue_uuid, a.agent_uuid, $5, $6, NOW()
            FROM core.callcenter_queues q
            JOIN core.callcenter_agents a ON a.tenant_uuid = q.tenant_uuid
            WHERE q.tenant_uuid = $2 AND q.name = $3 AND a.name = $4
            ON CONFLICT (queue_uuid, agent_uuid)
            DO UPDATE SET
                level = EXCLUDED.level,
                position = EXCLUDED.position,
                update_date = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&tier.queue)
        .bind(&tier.agent)
        .bind(tier.level)
        .bind(tier.position)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!(queue = %tier.queue, agent = %tier.agent, "Tier references an unknown queue or agent, skipping");
            summary.skipped(1);
        } else {
            summary.written(1);
        }
    }
    Ok(())
}
