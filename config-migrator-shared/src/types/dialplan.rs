
/// A dialplan context and the extensions it owns.
#[derive(Clone, Debug, PartialEq)]
pub struct DialplanContext {
    pub name: String,
    pub category: String,
    pub extensions: Vec<DialplanExtension>,
}

/// A single `<extension>` element.
///
/// `xml_config` keeps the verbatim source text of the element so the
/// original routing can be audited after the import.
#[derive(Clone, Debug, PartialEq)]
pub struct DialplanExtension {
    pub name: String,
    pub continue_on_match: bool,
    pub priority: i32,
    pub xml_config: String,
    pub conditions: Vec<DialplanCondition>,
}

/// A `<condition>` inside an extension, in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct DialplanCondition {
    pub field: String,
    pub expression: String,
    pub break_on_match: String,
    pub regex: Option<String>,
    pub order: i32,
    pub actions: Vec<DialplanAction>,
}

/// Whether an action runs when its condition matches or when it fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Action,
    AntiAction,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Action => "action",
            ActionKind::AntiAction => "anti-action",
        }
    }
}

/// An `<action>` or `<anti-action>`.
///
/// `order` is shared by both kinds within one condition.
#[derive(Clone, Debug, PartialEq)]
pub struct DialplanAction {
    pub kind: ActionKind,
    pub application: String,
    pub data: String,
    pub inline: bool,
    pub order: i32,
}
