use crate::types::Setting;

/// An advertised conference room.
#[derive(Clone, Debug, PartialEq)]
pub struct ConferenceRoom {
    pub name: String,
    pub status: Option<String>,
}

/// A `caller-controls` group with its key bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct ConferenceControlGroup {
    pub name: String,
    pub controls: Vec<ConferenceControl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConferenceControl {
    pub action: String,
    pub digits: String,
    pub order: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConferenceProfile {
    pub name: String,
    pub params: Vec<Setting>,
    pub xml_config: String,
}
