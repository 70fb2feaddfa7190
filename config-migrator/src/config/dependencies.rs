use crate::config::Settings;
use crate::config::handlers::{
    BlacklistHandler, CallcenterHandler, ConferenceHandler, DialplanHandler, DirectoryHandler,
    GlobalVarsHandler, IvrHandler, SipProfilesHandler, VoicemailHandler, VoicemailProfilesHandler,
    parse_global_vars, variable_map,
};
use crate::errors::AppError;
use config_migrator_pipeline::consumer::{FilesystemSources, ImportJob, SourceConsumer};
use config_migrator_pipeline::loader::ConfigLoader;
use config_migrator_pipeline::orchestrator::{Orchestrator, OrchestratorConfig};
use config_migrator_pipeline::processor::SourceProcessor;
use config_migrator_repository::{ConfigRepository, DryRunRepository, PostgresConfigRepository};
use config_migrator_shared::types::JobKind;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `Dependencies` holds the orchestrator and the jobs it should run.
pub struct Dependencies {
    pub orchestrator: Orchestrator,
    pub jobs: Vec<ImportJob>,
}

impl Dependencies {
    /// Creates the repository, registers a handler for every job kind and
    /// builds the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` when no database URL is configured outside dry
    /// run mode or when the connection pool cannot be created.
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let repository: Arc<dyn ConfigRepository> = if settings.dry_run {
            info!("Dry run enabled, nothing will be written to the database");
            Arc::new(DryRunRepository::new())
        } else {
            let database_url = settings
                .database_url
                .as_deref()
                .ok_or(AppError::MissingDatabaseUrl)?;
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;
            info!(max_connections = settings.max_connections, "Connected to PostgreSQL");
            Arc::new(PostgresConfigRepository::new(pool).await?)
        };

        let vars = load_variables(&settings.vars_path()).await;
        let orchestrator_config = OrchestratorConfig {
            tenant_name: settings.tenant.clone(),
            ..Default::default()
        };

        Ok(Dependencies {
            orchestrator: Orchestrator::new(
                SourceConsumer::new(Box::new(FilesystemSources)),
                build_processor(settings, vars),
                ConfigLoader::new(repository),
                orchestrator_config,
            ),
            jobs: settings.import_jobs(),
        })
    }
}

/// Registers one handler per job kind.
fn build_processor(settings: &Settings, vars: HashMap<String, String>) -> SourceProcessor {
    let mut processor = SourceProcessor::new();
    processor.register_handler(JobKind::GlobalVars, Arc::new(GlobalVarsHandler));
    processor.register_handler(
        JobKind::SipProfiles,
        Arc::new(SipProfilesHandler::new(settings.sip_profiles_root())),
    );
    processor.register_handler(JobKind::Directory, Arc::new(DirectoryHandler::new(vars)));
    processor.register_handler(
        JobKind::Dialplan,
        Arc::new(DialplanHandler::new(settings.dialplan_root())),
    );
    processor.register_handler(JobKind::Ivr, Arc::new(IvrHandler));
    processor.register_handler(JobKind::Callcenter, Arc::new(CallcenterHandler));
    processor.register_handler(JobKind::Conference, Arc::new(ConferenceHandler));
    processor.register_handler(JobKind::VoicemailProfiles, Arc::new(VoicemailProfilesHandler));
    processor.register_handler(JobKind::Voicemail, Arc::new(VoicemailHandler));
    processor.register_handler(JobKind::Blacklist, Arc::new(BlacklistHandler));
    processor
}

/// Reads `vars.xml` for `$${name}` expansion in directory files.
///
/// A missing or unparsable file leaves every reference unexpanded.
async fn load_variables(path: &Path) -> HashMap<String, String> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Global variables unavailable, references stay unexpanded");
            return HashMap::new();
        }
    };
    match parse_global_vars(&contents) {
        Ok(vars) => {
            debug!(path = %path.display(), count = vars.len(), "Loaded global variables");
            variable_map(&vars)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse global variables");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use config_migrator_pipeline::processor::ProcessSources;
    use config_migrator_shared::types::SourceFile;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings(args: &[&str]) -> Settings {
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("FREESWITCH_CONF_DIR");
        }
        Settings::try_parse_from(std::iter::once("config-migrator").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_dependencies_new_missing_database_url() {
        let result = Dependencies::new(&settings(&[])).await;

        assert!(matches!(result, Err(AppError::MissingDatabaseUrl)));
    }

    #[tokio::test]
    #[serial]
    async fn test_dependencies_new_invalid_database_url() {
        let result = Dependencies::new(&settings(&["--database-url", "invalid-database-url"])).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_dependencies_new_dry_run_needs_no_database() {
        let dependencies = Dependencies::new(&settings(&["--dry-run", "--conf-dir", "/nonexistent", "ivr", "dialplan"]))
            .await
            .unwrap();

        let kinds: Vec<_> = dependencies.jobs.iter().map(|j| j.kind).collect();
        assert_eq!(kinds, vec![JobKind::Dialplan, JobKind::Ivr]);
    }

    #[test]
    #[serial]
    fn test_every_job_kind_has_a_handler() {
        let processor = build_processor(&settings(&[]), HashMap::new());

        for kind in JobKind::ALL {
            assert!(processor.has_handler(kind), "no handler for {kind}");
        }
    }

    #[tokio::test]
    async fn test_load_variables_feeds_directory_expansion() {
        let mut vars_file = NamedTempFile::new().unwrap();
        vars_file
            .write_all(br#"<include><X-PRE-PROCESS cmd="set" data="default_password=4242"/></include>"#)
            .unwrap();

        let vars = load_variables(vars_file.path()).await;
        assert_eq!(vars["default_password"], "4242");

        let mut processor = SourceProcessor::new();
        processor.register_handler(JobKind::Directory, Arc::new(DirectoryHandler::new(vars)));
        let file = SourceFile::new(
            JobKind::Directory,
            "/etc/freeswitch/directory/default/1000.xml",
            1,
            r#"<include><user id="1000"><params><param name="password" value="$${default_password}"/></params></user></include>"#,
        );

        let changeset = processor.process(&file).unwrap();
        assert_eq!(changeset.sip_users[0].password, "4242");
    }

    #[tokio::test]
    async fn test_load_variables_missing_file() {
        let vars = load_variables(Path::new("/nonexistent/vars.xml")).await;

        assert!(vars.is_empty());
    }
}
