use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    Changeset, Setting, SipGateway, SipProfile, SipProfileSetting, SourceFile,
};
use roxmltree::Node;
use std::path::PathBuf;
use tracing::warn;

const PROFILE_CATEGORY: &str = "sofia";

/// Parses Sofia profile files and the gateway include files next to them.
pub struct SipProfilesHandler {
    root: PathBuf,
}

impl SipProfilesHandler {
    /// `root` is the `sip_profiles` directory. A `<gateway>` outside any
    /// `<profile>` belongs to the profile its subdirectory is named after.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn include_profile(&self, file: &SourceFile) -> Option<String> {
        if file.path.parent().is_some_and(|p| p == self.root) {
            return None;
        }
        file.parent_dir_name()
    }
}

impl HandleSource for SipProfilesHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let root = doc.root_element();
        let file_name = file.file_name();
        let mut changeset = Changeset::default();

        for profile in xml::descendants(root, "profile") {
            let Some(name) = profile.attribute("name") else {
                warn!(path = %file.path.display(), "SIP profile without a name, skipping");
                continue;
            };
            changeset.sip_gateways.extend(
                xml::find_all(profile, "gateways", "gateway").filter_map(|g| parse_gateway(name, g)),
            );
            changeset.sip_profiles.push(SipProfile {
                name: name.to_string(),
                description: xml::attr(profile, "description")
                    .unwrap_or_else(|| format!("Migrated profile from {file_name}")),
                category: PROFILE_CATEGORY.to_string(),
                xml_config: xml::verbatim(&file.contents, profile),
                settings: settings(profile, &file_name),
            });
        }

        let loose: Vec<_> = xml::descendants(root, "gateway")
            .filter(|g| !g.ancestors().any(|a| a.has_tag_name("profile")))
            .collect();
        if !loose.is_empty() {
            match self.include_profile(file) {
                Some(profile) => changeset
                    .sip_gateways
                    .extend(loose.into_iter().filter_map(|g| parse_gateway(&profile, g))),
                None => warn!(
                    path = %file.path.display(),
                    gateways = loose.len(),
                    "Gateways outside a profile directory, skipping"
                ),
            }
        }

        Ok(changeset)
    }
}

fn settings(profile: Node, file_name: &str) -> Vec<SipProfileSetting> {
    xml::find_all(profile, "settings", "param")
        .filter_map(|p| Some((p, p.attribute("name")?)))
        .enumerate()
        .map(|(order, (param, name))| SipProfileSetting {
            setting: Setting::new(name, param.attribute("value").unwrap_or_default(), order as i32),
            description: xml::attr(param, "description")
                .unwrap_or_else(|| format!("Imported from {file_name}")),
        })
        .collect()
}

fn parse_gateway(profile: &str, gateway: Node) -> Option<SipGateway> {
    let Some(name) = gateway.attribute("name") else {
        warn!(profile, "Gateway without a name, skipping");
        return None;
    };
    Some(SipGateway {
        profile: profile.to_string(),
        name: name.to_string(),
        params: xml::params(gateway),
    })
}
