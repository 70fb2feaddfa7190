use super::Tx;
use crate::{PersistSummary, RepositoryError};
use config_migrator_shared::types::IvrMenu;
use uuid::Uuid;

pub(super) async fn upsert_menus(
    tx: &mut Tx<'_>,
    tenant: Uuid,
    menus: &[IvrMenu],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    for menu in menus {
        let ivr_uuid = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO core.ivr_menus (
                ivr_uuid, tenant_uuid, name, greet_long, greet_short, invalid_sound, exit_sound,
                confirm_macro, timeout, inter_digit_timeout, max_failures, max_timeouts, digit_len,
                direct_dial, xml_config, enabled, insert_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, TRUE, NOW())
            ON CONFLICT (tenant_uuid, name)
            DO UPDATE SET
                greet_long = EXCLUDED.greet_long,
                greet_short = EXCLUDED.greet_short,
                invalid_sound = EXCLUDED.invalid_sound,
                exit_sound = EXCLUDED.exit_sound,
                confirm_macro = EXCLUDED.confirm_macro,
                timeout = EXCLUDED.timeout,
                inter_digit_timeout = EXCLUDED.inter_digit_timeout,
                max_failures = EXCLUDED.max_failures,
                max_timeouts = EXCLUDED.max_timeouts,
                digit_len = EXCLUDED.digit_len,
                direct_dial = EXCLUDED.direct_dial,
                xml_config = EXCLUDED.xml_config,
                update_date = NOW()
            RETURNING ivr_uuid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant)
        .bind(&menu.name)
        .bind(menu.greet_long.as_deref())
        .bind(menu.greet_short.as_deref())
        .bind(menu.invalid_sound.as_deref())
        .bind(menu.exit_sound.as_deref())
        .bind(menu.confirm_macro.as_deref())
        .bind(menu.timeout)
        .bind(menu.inter_digit_timeout)
        .bind(menu.max_failures)
        .bind(menu.max_timeouts)
        .bind(menu.digit_len)
        .bind(menu.direct_dial)
        .bind(&menu.xml_config)
        .fetch_one(&mut **tx)
        .await?;
        summary.written(1);

        sqlx::query("DELETE FROM core.ivr_menu_options WHERE ivr_uuid = $1")
            .bind(ivr_uuid)
            .execute(&mut **tx)
            .await?;

        for option in &menu.options {
            sqlx::query(
                r#"
                INSERT INTO core.ivr_menu_options (option_uuid, ivr_uuid, digits, action, destination, condition, priority, enabled, insert_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(ivr_uuid)
            .bind(&option.digits)
            .bind(&option.action)
            .bind(option.destination.as_deref())
            .bind(option.condition.as_deref())
            .bind(option.priority)
            .execute(&mut **tx)
            .await?;
            summary.written(1);
        }
    }
    Ok(())
}
