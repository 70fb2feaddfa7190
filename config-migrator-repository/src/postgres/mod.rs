//! PostgreSQL implementation of the config repository.
//!
//! Flattens the nested records of a changeset into parent/child rows of the
//! `core` schema. Every changeset is written in one transaction:
//!
//! - parents are upserted with `ON CONFLICT ... DO UPDATE ... RETURNING`
//!   on their natural key, so the stored id is reused across runs
//! - ordered children (conditions, actions, settings, params) are deleted
//!   and re-inserted for their parent, keeping document order in explicit
//!   order columns
//! - references by name (tiers, group members, gateways) are resolved with
//!   `INSERT ... SELECT` and skipped when the referenced row is missing
//!
//! Queries are built at runtime with `sqlx::query` so the crate builds
//! without a reachable database.
mod blacklist;
mod callcenter;
mod conference;
mod dialplan;
mod directory;
mod global_vars;
mod ivr;
mod sip_profiles;
mod voicemail;

use crate::{ConfigRepository, PersistSummary, RepositoryError};
use async_trait::async_trait;
use config_migrator_shared::types::{Changeset, Setting};
use tracing::debug;
use uuid::Uuid;

pub(crate) type Tx<'c> = sqlx::Transaction<'c, sqlx::Postgres>;

/// Location of an ordered name/value child table.
pub(crate) struct SettingsTable {
    table: &'static str,
    id_column: &'static str,
    parent_column: &'static str,
    order_column: &'static str,
}

/// Replaces every name/value child of `parent` in `target` with `settings`.
pub(crate) async fn replace_settings(
    tx: &mut Tx<'_>,
    target: &SettingsTable,
    parent: Uuid,
    settings: &[Setting],
    summary: &mut PersistSummary,
) -> Result<(), RepositoryError> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE {} = $1",
        target.table, target.parent_column
    ))
    .bind(parent)
    .execute(&mut **tx)
    .await?;

    if settings.is_empty() {
        return Ok(());
    }

    let insert = format!(
        "INSERT INTO {} ({}, {}, name, value, {}, insert_date) VALUES ($1, $2, $3, $4, $5, NOW())",
        target.table, target.id_column, target.parent_column, target.order_column
    );
    for setting in settings {
        sqlx::query(&insert)
            .bind(Uuid::new_v4())
            .bind(parent)
            .bind(&setting.name)
            .bind(&setting.value)
            .bind(setting.order)
            .execute(&mut **tx)
            .await?;
    }
    summary.written(settings.len());
    Ok(())
}

/// PostgreSQL-backed config repository.
pub struct PostgresConfigRepository {
    pool: sqlx::PgPool,
}

impl PostgresConfigRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the `core` schema
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    /// Writes every record of the changeset inside `tx`.
    ///
    /// Order matters: global variables and profiles first, users before the
    /// groups that reference them, queues and agents before tiers.
    async fn persist_changeset_tx(
        &self,
        tenant: Uuid,
        changeset: &Changeset,
        tx: &mut Tx<'_>,
    ) -> Result<PersistSummary, RepositoryError> {
        let mut summary = PersistSummary::default();

        global_vars::upsert_global_vars(tx, &changeset.global_vars, &mut summary).await?;
        sip_profiles::upsert_profiles(tx, tenant, &changeset.sip_profiles, &mut summary).await?;
        sip_profiles::upsert_gateways(tx, tenant, &changeset.sip_gateways, &mut summary).await?;
        directory::upsert_users(tx, tenant, &changeset.sip_users, &mut summary).await?;
        directory::upsert_groups(tx, tenant, &changeset.sip_groups, &mut summary).await?;
        dialplan::upsert_contexts(tx, tenant, &changeset.dialplan_contexts, &mut summary).await?;
        ivr::upsert_menus(tx, tenant, &changeset.ivr_menus, &mut summary).await?;
        callcenter::upsert_queues(tx, tenant, &changeset.callcenter_queues, &mut summary).await?;
        callcenter::upsert_agents(tx, tenant, &changeset.callcenter_agents, &mut summary).await?;
        callcenter::upsert_tiers(tx, tenant, &changeset.callcenter_tiers, &mut summary).await?;
        conference::upsert_rooms(tx, tenant, &changeset.conference_rooms, &mut summary).await?;
        conference::upsert_control_groups(tx, tenant, &changeset.conference_control_groups, &mut summary).await?;
        conference::upsert_profiles(tx, tenant, &changeset.conference_profiles, &mut summary).await?;
        voicemail::upsert_profiles(tx, tenant, &changeset.voicemail_profiles, &mut summary).await?;
        voicemail::upsert_boxes(tx, tenant, &changeset.voicemail_boxes, &mut summary).await?;
        blacklist::insert_entries(tx, tenant, &changeset.blacklist, &mut summary).await?;

        Ok(summary)
    }
}

#[async_trait]
impl ConfigRepository for PostgresConfigRepository {
    async fn resolve_tenant(&self, name: &str) -> Result<Uuid, RepositoryError> {
        let tenant = sqlx::query_scalar::<_, Uuid>("SELECT tenant_uuid FROM core.tenants WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        tenant.ok_or_else(|| RepositoryError::TenantNotFound(name.to_string()))
    }

    /// Persists a changeset using a new transaction.
    ///
    /// The transaction is rolled back when dropped on any error, so a file
    /// either lands completely or not at all.
    async fn persist_changeset(
        &self,
        tenant: Uuid,
        changeset: &Changeset,
    ) -> Result<PersistSummary, RepositoryError> {
        if changeset.is_empty() {
            return Ok(PersistSummary::default());
        }

        let mut tx = self.pool.begin().await?;
        let summary = self.persist_changeset_tx(tenant, changeset, &mut tx).await?;
        tx.commit().await?;

        debug!(
            rows_written = summary.rows_written,
            rows_skipped = summary.rows_skipped,
            "Changeset committed"
        );
        Ok(summary)
    }
}
