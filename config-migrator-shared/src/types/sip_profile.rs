use crate::types::Setting;

/// A Sofia SIP profile.
#[derive(Clone, Debug, PartialEq)]
pub struct SipProfile {
    pub name: String,
    pub description: String,
    pub category: String,
    pub xml_config: String,
    pub settings: Vec<SipProfileSetting>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SipProfileSetting {
    pub setting: Setting,
    pub description: String,
}

/// A gateway attached to a profile referenced by name.
#[derive(Clone, Debug, PartialEq)]
pub struct SipGateway {
    pub profile: String,
    pub name: String,
    pub params: Vec<Setting>,
}
