use clap::Parser;
use config_migrator_pipeline::consumer::{ImportJob, Source, WalkOrder};
use config_migrator_shared::types::JobKind;
use std::path::PathBuf;

const DEFAULT_CONF_DIR: &str = "/etc/freeswitch";
const DEFAULT_TENANT: &str = "Default";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Command line and environment settings of the migrator.
#[derive(Parser, Debug, Clone)]
#[command(name = "config-migrator")]
#[command(about = "Imports FreeSWITCH XML configuration into PostgreSQL")]
#[command(version)]
pub struct Settings {
    /// Jobs to run, in any order. Runs every job when empty.
    #[arg(value_name = "JOBS")]
    pub jobs: Vec<JobKind>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// FreeSWITCH configuration directory
    #[arg(long, env = "FREESWITCH_CONF_DIR", default_value = DEFAULT_CONF_DIR)]
    pub conf_dir: PathBuf,

    /// Tenant every row is imported for
    #[arg(long, env = "TENANT_NAME", default_value = DEFAULT_TENANT)]
    pub tenant: String,

    /// Size of the PostgreSQL connection pool
    #[arg(long, env = "PG_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Parse every source without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error when any source file failed to import
    #[arg(long)]
    pub strict: bool,
}

impl Settings {
    /// Selected jobs in default execution order, without duplicates.
    pub fn selected_jobs(&self) -> Vec<JobKind> {
        if self.jobs.is_empty() {
            return JobKind::ALL.to_vec();
        }
        let mut jobs = self.jobs.clone();
        jobs.sort();
        jobs.dedup();
        jobs
    }

    pub fn import_jobs(&self) -> Vec<ImportJob> {
        self.selected_jobs()
            .into_iter()
            .map(|kind| ImportJob::new(kind, self.source(kind)))
            .collect()
    }

    /// Where the files of `kind` live under the configuration directory.
    pub fn source(&self, kind: JobKind) -> Source {
        let conf = &self.conf_dir;
        let xml_tree = |dir: &str, order| Source::tree(conf.join(dir), &["xml"], order);
        match kind {
            JobKind::GlobalVars => Source::File(self.vars_path()),
            JobKind::SipProfiles => xml_tree("sip_profiles", WalkOrder::ShallowFirst),
            // Group files at the top of the tree reference users defined below it.
            JobKind::Directory => xml_tree("directory", WalkOrder::DeepFirst),
            JobKind::Dialplan => xml_tree("dialplan", WalkOrder::ShallowFirst),
            JobKind::Ivr => xml_tree("ivr_menus", WalkOrder::ShallowFirst),
            JobKind::Callcenter => Source::File(conf.join("autoload_configs/callcenter.conf.xml")),
            JobKind::Conference => Source::File(conf.join("autoload_configs/conference.conf.xml")),
            JobKind::VoicemailProfiles => Source::File(conf.join("autoload_configs/voicemail.conf.xml")),
            JobKind::Voicemail => xml_tree("voicemail", WalkOrder::ShallowFirst),
            JobKind::Blacklist => {
                Source::tree(conf.join("blacklist"), &["txt", "csv"], WalkOrder::ShallowFirst)
            }
        }
    }

    pub fn vars_path(&self) -> PathBuf {
        self.conf_dir.join("vars.xml")
    }

    pub fn dialplan_root(&self) -> PathBuf {
        self.conf_dir.join("dialplan")
    }

    pub fn sip_profiles_root(&self) -> PathBuf {
        self.conf_dir.join("sip_profiles")
    }
}
