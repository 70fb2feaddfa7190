use crate::types::Setting;

#[derive(Clone, Debug, PartialEq)]
pub struct VoicemailBox {
    pub mailbox: String,
    pub password: Option<String>,
    pub enabled: bool,
}

/// A profile from `voicemail.conf.xml`.
#[derive(Clone, Debug, PartialEq)]
pub struct VoicemailProfile {
    pub name: String,
    pub settings: Vec<Setting>,
}
