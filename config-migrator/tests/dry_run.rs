use clap::Parser;
use config_migrator::{Settings, run};
use config_migrator_shared::types::JobKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn conf_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "vars.xml",
        r#"<include>
  <!-- Domain -->
  <X-PRE-PROCESS cmd="set" data="domain=pbx.example.com"/>
  <X-PRE-PROCESS cmd="set" data="default_password=4242"/>
</include>"#,
    );
    write(
        root,
        "sip_profiles/internal.xml",
        r#"<profile name="internal">
  <gateways>
    <gateway name="carrier"><param name="register" value="false"/></gateway>
  </gateways>
  <settings>
    <param name="sip-port" value="5060"/>
    <param name="context" value="public"/>
  </settings>
</profile>"#,
    );
    write(
        root,
        "sip_profiles/external/provider.xml",
        r#"<include><gateway name="provider"/></include>"#,
    );
    write(
        root,
        "directory/default.xml",
        r#"<include>
  <domain name="$${domain}">
    <groups>
      <group name="default">
        <users><user id="1000" type="pointer"/></users>
      </group>
    </groups>
  </domain>
</include>"#,
    );
    write(
        root,
        "directory/default/1000.xml",
        r#"<include><user id="1000"><params><param name="password" value="$${default_password}"/></params></user></include>"#,
    );
    write(
        root,
        "dialplan/default/00_echo.xml",
        r#"<include>
  <extension name="echo">
    <condition field="destination_number" expression="^9196$">
      <action application="answer"/>
      <action application="echo"/>
    </condition>
  </extension>
</include>"#,
    );
    write(
        root,
        "ivr_menus/demo.xml",
        r#"<include>
  <menu name="demo">
    <entry action="menu-sub" digits="1" param="sales"/>
    <entry action="menu-top" digits="9"/>
  </menu>
</include>"#,
    );
    write(root, "ivr_menus/broken.xml", "<include><menu name=\"broken\"></include>");
    write(root, "voicemail/empty.xml", "<include/>");
    write(root, "blacklist/spam.txt", "# robocallers\n5551000\n5552000\n5551000\n");

    dir
}

fn dry_run_settings(conf: &Path, extra: &[&str]) -> Settings {
    let conf = conf.to_string_lossy().into_owned();
    let mut args = vec!["config-migrator", "--dry-run", "--conf-dir", conf.as_str()];
    args.extend_from_slice(extra);
    Settings::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn test_dry_run_imports_every_job() {
    let conf = conf_tree();

    let report = run(&dry_run_settings(conf.path(), &[])).await.unwrap();

    assert_eq!(report.tenant, "Default");
    assert_eq!(report.totals.files_seen, 10);
    assert_eq!(report.totals.files_imported, 8);
    assert_eq!(report.totals.files_empty, 1);
    assert_eq!(report.totals.files_failed, 1);
    assert_eq!(report.totals.records, 26);
    assert_eq!(report.totals.rows_written, 26);
    assert!(report.has_failures());

    assert_eq!(report.per_job.len(), JobKind::ALL.len());
    assert_eq!(report.per_job[&JobKind::SipProfiles].records, 6);
    assert_eq!(report.per_job[&JobKind::Directory].records, 4);
    assert_eq!(report.per_job[&JobKind::Ivr].files_failed, 1);
    assert_eq!(report.per_job[&JobKind::Ivr].records, 7);
    assert_eq!(report.per_job[&JobKind::Blacklist].records, 2);
    assert_eq!(report.per_job[&JobKind::Callcenter].files_seen, 0);
}

#[tokio::test]
async fn test_dry_run_selected_jobs_only() {
    let conf = conf_tree();

    let report = run(&dry_run_settings(conf.path(), &["dialplan", "blacklist"])).await.unwrap();

    assert_eq!(
        report.per_job.keys().copied().collect::<Vec<_>>(),
        vec![JobKind::Dialplan, JobKind::Blacklist]
    );
    assert_eq!(report.totals.files_imported, 2);
    assert_eq!(report.totals.records, 7);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_missing_conf_dir_imports_nothing() {
    let conf = TempDir::new().unwrap();

    let report = run(&dry_run_settings(&conf.path().join("missing"), &[])).await.unwrap();

    assert_eq!(report.totals.files_seen, 0);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_report_serializes_with_job_names() {
    let conf = conf_tree();

    let report = run(&dry_run_settings(conf.path(), &["blacklist"])).await.unwrap();
    let summary = serde_json::to_value(&report).unwrap();

    assert_eq!(summary["tenant"], "Default");
    assert_eq!(summary["files_imported"], 1);
    assert_eq!(summary["per_job"]["blacklist"]["records"], 2);
}
