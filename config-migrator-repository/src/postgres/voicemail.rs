use super::{SettingsTable, Tx, replace_settings};
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{VoicemailBox, VoicemailProfile};
use uuid::Uuid;

const PROFILE_SETTINGS: SettingsTable = SettingsTable {
    table: "core.voicemail_profile_settings",
    id_column: "setting_uuid",
    parent_column: "profile_uuid",
    order_column: "setting_order",
};

pub(super) async fn upsert_profiles(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    profiles: &[VoicemailProfile],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for profile in profiles {
        let profile_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.voicemail_profiles (profile_uuid, tenant_uuid, name, enabled, insert_date)
            VALUES ($1, $2, $3, TRUE, NOW())
            ON CONFLICT (tenant_uuid, name)
            DO UPDATE SET update_date = NOW()
            RETURNING profile_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&profile.name)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        replace_settings(tx, &PROFILE_SETTINGS, profile_uuid, &profile.settings, summary).await?;
    }
    Ok(())
}

pub(super) async fn upsert_boxes(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    boxes: &[VoicemailBox],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for mailbox in boxes {
        sqlx::query(
            r#"
            INSERT INTO core.voicemail_boxes (voicemail_uuid, tenant_uuid, mailbox, password, enabled, insert_date)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (tenant_uuid, mailbox)
            DO UPDATE SET
                password = EXCLUDED.password,
                enabled = EXCLUDED.enabled,
                update_date = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&mailbox.mailbox)
        .bind(mailbox.password.as_deref())
        .bind(mailbox.enabled)
        .execute(&mut **tx)
        .await?;
        summary.written(1);
    }
    Ok(())
}
