use super::global_vars::expand;
use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    Changeset, SettingKind, SipGroup, SipUser, SourceFile, UserSetting,
};
use roxmltree::Node;
use std::collections::HashMap;
use tracing::warn;

/// Parses directory files into SIP users and groups.
///
/// `$${name}` references in param and variable values are expanded from the
/// global variables the handler was built with.
pub struct DirectoryHandler {
    vars: HashMap<String, String>,
}

impl DirectoryHandler {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    fn settings(&self, user: Node) -> Vec<UserSetting> {
        let params = xml::find_all(user, "params", "param").map(|n| (SettingKind::Param, n));
        let variables = xml::find_all(user, "variables", "variable").map(|n| (SettingKind::Variable, n));

        params
            .chain(variables)
            .filter_map(|(kind, n)| {
                let name = n.attribute("name")?;
                Some((kind, name, n.attribute("value").unwrap_or_default()))
            })
            .enumerate()
            .map(|(order, (kind, name, value))| UserSetting {
                kind,
                name: name.to_string(),
                value: expand(value, &self.vars),
                order: order as i32,
            })
            .collect()
    }

    fn parse_user(&self, contents: &str, user: Node, id: &str) -> SipUser {
        let settings = self.settings(user);
        let lookup = |kind: SettingKind, name: &str| {
            settings
                .iter()
                .find(|s| s.kind == kind && s.name == name)
                .map(|s| s.value.clone())
        };

        let password = lookup(SettingKind::Param, "password")
            .filter(|p| !p.is_empty() && !p.contains("$${"))
            .unwrap_or_else(|| id.to_string());

        SipUser {
            username: id.to_string(),
            vm_password: lookup(SettingKind::Param, "vm-password").unwrap_or_else(|| id.to_string()),
            toll_allow: lookup(SettingKind::Variable, "toll_allow"),
            accountcode: lookup(SettingKind::Variable, "accountcode"),
            user_context: lookup(SettingKind::Variable, "user_context").unwrap_or_else(|| "default".to_string()),
            effective_caller_id_name: lookup(SettingKind::Variable, "effective_caller_id_name")
                .unwrap_or_else(|| format!("Extension {id}")),
            effective_caller_id_number: lookup(SettingKind::Variable, "effective_caller_id_number")
                .unwrap_or_else(|| id.to_string()),
            xml_config: xml::verbatim(contents, user),
            password,
            settings,
        }
    }
}

fn is_pointer(user: Node) -> bool {
    user.attribute("type") == Some("pointer")
}

impl HandleSource for DirectoryHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let root = doc.root_element();
        let mut changeset = Changeset::default();

        for user in xml::descendants(root, "user").filter(|u| !is_pointer(*u)) {
            let Some(id) = user.attribute("id") else {
                warn!("User without an id, skipping");
                continue;
            };
            changeset.sip_users.push(self.parse_user(&file.contents, user, id));
        }

        for group in xml::descendants(root, "group") {
            let Some(name) = group.attribute("name") else {
                warn!("Group without a name, skipping");
                continue;
            };
            let members = xml::find_all(group, "users", "user")
                .filter_map(|u| u.attribute("id"))
                .map(str::to_string)
                .collect();
            changeset.sip_groups.push(SipGroup {
                name: name.to_string(),
                members,
            });
        }

        Ok(changeset)
    }
}
