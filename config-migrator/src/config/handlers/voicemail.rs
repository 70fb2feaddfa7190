use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{Changeset, SourceFile, VoicemailBox, VoicemailProfile};
use tracing::warn;

/// Parses mailbox files: every `<user id>` owns one mailbox.
pub struct VoicemailHandler;

impl HandleSource for VoicemailHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let mut changeset = Changeset::default();

        for user in xml::descendants(doc.root_element(), "user") {
            let Some(mailbox) = user.attribute("id") else {
                warn!(path = %file.path.display(), "Mailbox user without an id, skipping");
                continue;
            };
            let password = xml::find_all(user, "params", "param")
                .find(|p| p.attribute("name") == Some("vm-password"))
                .and_then(|p| xml::attr(p, "value"));
            changeset.voicemail_boxes.push(VoicemailBox {
                mailbox: mailbox.to_string(),
                password,
                enabled: true,
            });
        }

        Ok(changeset)
    }
}

/// Parses the profiles of `voicemail.conf.xml`.
pub struct VoicemailProfilesHandler;

impl HandleSource for VoicemailProfilesHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let mut changeset = Changeset::default();

        for profile in xml::find_all(doc.root_element(), "profiles", "profile") {
            let Some(name) = profile.attribute("name") else {
                warn!("Voicemail profile without a name, skipping");
                continue;
            };
            changeset.voicemail_profiles.push(VoicemailProfile {
                name: name.to_string(),
                settings: xml::params(profile),
            });
        }

        Ok(changeset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_migrator_shared::types::{JobKind, Setting};

    #[test]
    fn test_mailboxes() {
        let xml = r#"<include>
  <user id="1000"><params><param name="vm-password" value="4321"/></params></user>
  <user id="1001"/>
  <user/>
</include>"#;
        let file = SourceFile::new(JobKind::Voicemail, "/etc/freeswitch/voicemail/boxes.xml", 1, xml);

        let changeset = VoicemailHandler.handle(&file).unwrap();

        assert_eq!(
            changeset.voicemail_boxes,
            vec![
                VoicemailBox { mailbox: "1000".to_string(), password: Some("4321".to_string()), enabled: true },
                VoicemailBox { mailbox: "1001".to_string(), password: None, enabled: true },
            ]
        );
    }

    #[test]
    fn test_profiles_keep_param_order() {
        let xml = r##"<configuration name="voicemail.conf" description="Voicemail">
  <settings/>
  <profiles>
    <profile name="default">
      <param name="file-extension" value="wav"/>
      <param name="terminator-key" value="#"/>
      <param name="max-login-attempts" value="3"/>
      <email>
        <param name="template-file" value="voicemail.tpl"/>
      </email>
    </profile>
  </profiles>
</configuration>"##;
        let file = SourceFile::new(
            JobKind::VoicemailProfiles,
            "/etc/freeswitch/autoload_configs/voicemail.conf.xml",
            1,
            xml,
        );

        let changeset = VoicemailProfilesHandler.handle(&file).unwrap();
        let profile = &changeset.voicemail_profiles[0];

        assert_eq!(profile.name, "default");
        assert_eq!(
            profile.settings,
            vec![
                Setting::new("file-extension", "wav", 0),
                Setting::new("terminator-key", "#", 1),
                Setting::new("max-login-attempts", "3", 2),
            ]
        );
    }
}
