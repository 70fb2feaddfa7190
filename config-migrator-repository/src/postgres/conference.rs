use super::{SettingsTable, Tx, replace_settings};
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::{ConferenceControlGroup, ConferenceProfile, ConferenceRoom};
use uuid::Uuid;

const PROFILE_PARAMS: SettingsTable = SettingsTable {
    table: "core.conference_profile_params",
    id_column: "param_uuid",
    parent_column: "profile_uuid",
    order_column: "param_order",
};

pub(super) async fn upsert_rooms(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    rooms: &[ConferenceRoom],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for room in rooms {
        sqlx::query(
            r#"
            INSERT INTO core.conference_rooms (conference_uuid, tenant_uuid, room_name, status, insert_date)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (tenant_uuid, room_name)
            DO UPDATE SET
                status = EXCLUDED.status,
                update_date = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&room.name)
        .bind(room.status.as_deref())
        .execute(&mut **tx)
        .await?;
        summary.written(1);
    }
    Ok(())
}

pub(super) async fn upsert_control_groups(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    groups: &[ConferenceControlGroup],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for group in groups {
        let group_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.conference_control_groups (group_uuid, tenant_uuid, group_name, insert_date)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (tenant_uuid, group_name)
            DO UPDATE SET update_date = NOW()
            RETURNING group_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&group.name)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        sqlx::query("DELETE FROM core.conference_controls WHERE group_uuid = $1")
            .bind(group_uuid)
            .execute(&mut **tx)
            .await?;

        for control in &group.controls {
            sqlx::query(
                r#"
                INSERT INTO core.conference_controls (control_uuid, group_uuid, action, digits, control_order, insert_date)
                VALUES ($1, $2, $3, $4, $5, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(group_uuid)
            .bind(&control.action)
            .bind(&control.digits)
            .bind(control.order)
            .execute(&mut **tx)
            .await?;
            summary.written(1);
        }
    }
    Ok(())
}

pub(super) async fn upsert_profiles(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    profiles: &[ConferenceProfile],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for profile in profiles {
        let profile_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.conference_profiles (profile_uuid, tenant_uuid, profile_name, xml_data, insert_date)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (tenant_uuid, profile_name)
            DO UPDATE SET
                xml_data = EXCLUDED.xml_data,
                update_date = NOW()
            RETURNING profile_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&profile.name)
        .bind(&profile.xml_config)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        replace_settings(tx, &PROFILE_PARAMS, profile_uuid, &profile.params, summary).await?;
    }
    Ok(())
}
