
/// A SIP user from the directory.
#[derive(Clone, Debug, PartialEq)]
pub struct SipUser {
    pub username: String,
    pub password: String,
    pub vm_password: String,
    pub toll_allow: Option<String>,
    pub accountcode: Option<String>,
    pub user_context: String,
    pub effective_caller_id_name: String,
    pub effective_caller_id_number: String,
    pub xml_config: String,
    pub settings: Vec<UserSetting>,
}

/// Which section of the user element a setting came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKind {
    Param,
    Variable,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Param => "param",
            SettingKind::Variable => "variable",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserSetting {
    pub kind: SettingKind,
    pub name: String,
    pub value: String,
    pub order: i32,
}

/// A directory group and the ids of the users it contains.
#[derive(Clone, Debug, PartialEq)]
pub struct SipGroup {
    pub name: String,
    pub members: Vec<String>,
}
