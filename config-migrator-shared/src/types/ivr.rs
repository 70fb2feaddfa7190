
/// An IVR `<menu>` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct IvrMenu {
    pub name: String,
    pub greet_long: Option<String>,
    pub greet_short: Option<String>,
    pub invalid_sound: Option<String>,
    pub exit_sound: Option<String>,
    pub confirm_macro: Option<String>,
    pub timeout: i32,
    pub inter_digit_timeout: i32,
    pub max_failures: i32,
    pub max_timeouts: i32,
    pub digit_len: i32,
    pub direct_dial: bool,
    pub xml_config: String,
    pub options: Vec<IvrMenuOption>,
}

/// A menu `<entry>`: the digits pressed and what happens next.
#[derive(Clone, Debug, PartialEq)]
pub struct IvrMenuOption {
    pub digits: String,
    pub action: String,
    pub destination: Option<String>,
    pub condition: Option<String>,
    pub priority: i32,
}
