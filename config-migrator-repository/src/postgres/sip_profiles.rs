use super::{SettingsTable, Tx, replace_settings};
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{SipGateway, SipProfile};
use tracing::warn;
use uuid::Uuid;

const GATEWAY_PARAMS: SettingsTable = SettingsTable {
    table: "core.sip_gateway_params",
    id_column: "param_uuid",
    parent_column: "gateway_uuid",
    order_column: "param_order",
};

/// Category and type every imported profile setting is stored under.
const SETTING_CATEGORY: &str = "sofia";
const SETTING_TYPE: &str = "setting";

pub(super) async fn upsert_profiles(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    profiles: &[SipProfile],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for profile in profiles {
        let profile_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.sip_profiles (profile_uuid, tenant_uuid, profile_name, description, category, xml_config, enabled, insert_date)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW())
            ON CONFLICT (tenant_uuid, profile_name)
            DO UPDATE SET
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                xml_config = EXCLUDED.xml_config,
                update_date = NOW()
            RETURNING profile_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.category)
        .bind(&profile.xml_config)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        sqlx::query("DELETE FROM core.sip_profile_settings WHERE profile_uuid = $1")
            .bind(profile_uuid)
            .execute(&mut **tx)
            .await?;

        for entry in &profile.settings {
            sqlx::query(
                r#"
                INSERT INTO core.sip_profile_settings (
                    setting_uuid, profile_uuid, name, value, category, setting_type, setting_order, description, insert_date
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_uuid)
            .bind(&entry.setting.name)
            .bind(&entry.setting.value)
            .bind(SETTING_CATEGORY)
            .bind(SETTING_TYPE)
            .bind(entry.setting.order)
            .bind(&entry.description)
            .execute(&mut **tx)
            .await?;
        }
        summary.written(profile.settings.len());
    }
    Ok(())
}

/// Upserts gateways under the profile they are declared for.
///
/// Gateways of a profile that has not been imported are skipped.
pub(super) async fn upsert_gateways(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    gateways: &[SipGateway],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for gateway in gateways {
        let profile_uuid = sqlx::query_scalar::<_, Uuid>(
            "SELECT profile_uuid FROM core.sip_profiles WHERE tenant_uuid = $1 AND profile_name = $2",
        )
        .bind(tenant)
        .bind(&gateway.profile)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(profile_uuid) = profile_uuid else {
            warn!(profile = %gateway.profile, gateway = %gateway.name, "Gateway references an unknown SIP profile, skipping");
            summary.skipped(1 + gateway.params.len());
            continue;
        };

        let gateway_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.sip_gateways (gateway_uuid, profile_uuid, gateway_name, enabled, insert_date)
            VALUES ($1, $2, $3, TRUE, NOW())
            ON CONFLICT (profile_uuid, gateway_name)
            DO UPDATE SET update_date = NOW()
            RETURNING gateway_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_uuid)
        .bind(&gateway.name)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        replace_settings(tx, &GATEWAY_PARAMS, gateway_uuid, &gateway.params, summary).await?;
    }
    Ok(())
}
