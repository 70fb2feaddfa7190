use super::Tx;
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{SipGroup, SipUser};
use tracing::debug;
use uuid::Uuid;

pub(super) async fn upsert_users(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    users: &[SipUser],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for user in users {
        let sip_user_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.sip_users (
                sip_user_uuid, tenant_uuid, username, password, vm_password, toll_allow, accountcode,
                user_context, effective_caller_id_name, effective_caller_id_number, xml_config,
                enabled, insert_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, NOW())
            ON CONFLICT (tenant_uuid, username)
            DO UPDATE SET
                password = EXCLUDED.password,
                vm_password = EXCLUDED.vm_password,
                toll_allow = EXCLUDED.toll_allow,
                accountcode = EXCLUDED.accountcode,
                user_context = EXCLUDED.user_context,
                effective_caller_id_name = EXCLUDED.effective_caller_id_name,
                effective_caller_id_number = EXCLUDED.effective_caller_id_number,
                xml_config = EXCLUDED.xml_config,
                update_date = NOW()
            RETURNING sip_user_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.vm_password)
        .bind(user.toll_allow.as_deref())
        .bind(user.accountcode.as_deref())
        .bind(&user.user_context)
        .bind(&user.effective_caller_id_name)
        .bind(&user.effective_caller_id_number)
        .bind(&user.xml_config)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        sqlx::query("DELETE FROM core.sip_user_settings WHERE sip_user_uuid = $1")
            .bind(sip_user_uuid)
            .execute(&mut **tx)
            .await?;

        for setting in &user.settings {
            sqlx::query(
                r#"
                INSERT INTO core.sip_user_settings (setting_uuid, sip_user_uuid, name, type, value, setting_order, insert_date)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(sip_user_uuid)
            .bind(&setting.name)
            .bind(setting.kind.as_str())
            .bind(&setting.value)
            .bind(setting.order)
            .execute(&mut **tx)
            .await?;
        }
        summary.written(user.settings.len());
    }
    Ok(())
}

/// Upserts groups and links their members by username.
///
/// Members are added, never removed. A member naming a user that does not
/// exist for the tenant, or one that is already linked, is skipped.
pub(super) async fn upsert_groups(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    groups: &[SipGroup],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for group in groups {
        let group_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.sip_groups (group_uuid, tenant_uuid, group_name, insert_date)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (tenant_uuid, group_name)
            DO UPDATE SET group_name = EXCLUDED.group_name
            RETURNING group_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&group.name)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        for member in &group.members {
            let result = sqlx::query(
                r#"
                INSERT INTO core.sip_group_members (member_uuid, group_uuid, sip_user_uuid, insert_date)
                SELECT $1, $2, u.sip_user_uuid, NOW()
                FROM core.sip_users u
                WHERE u.tenant_uuid = $3 AND u.username = $4
                ON CONFLICT (group_uuid, sip_user_uuid) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(group_uuid)
            .bind(tenant)
            .bind(member)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                debug!(group = %group.name, member = %member, "Member already linked or unknown");
                summary.skipped(1);
            } else {
                summary.written(1);
            }
        }
    }
    Ok(())
}
