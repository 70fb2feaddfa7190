use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Identifies one kind of import.
///
/// Each kind maps to a fixed source location under the FreeSWITCH
/// configuration directory and to exactly one registered handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    GlobalVars,
    SipProfiles,
    Directory,
    Dialplan,
    Ivr,
    Callcenter,
    Conference,
    VoicemailProfiles,
    Voicemail,
    Blacklist,
}

impl JobKind {
    /// Every job kind, in default execution order.
    ///
    /// Global variables go first so later jobs can reference them, and SIP
    /// profiles precede anything that could point at a profile.
    pub const ALL: [JobKind; 10] = [
        JobKind::GlobalVars,
        JobKind::SipProfiles,
        JobKind::Directory,
        JobKind::Dialplan,
        JobKind::Ivr,
        JobKind::Callcenter,
        JobKind::Conference,
        JobKind::VoicemailProfiles,
        JobKind::Voicemail,
        JobKind::Blacklist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::GlobalVars => "global-vars",
            JobKind::SipProfiles => "sip-profiles",
            JobKind::Directory => "directory",
            JobKind::Dialplan => "dialplan",
            JobKind::Ivr => "ivr",
            JobKind::Callcenter => "callcenter",
            JobKind::Conference => "conference",
            JobKind::VoicemailProfiles => "voicemail-profiles",
            JobKind::Voicemail => "voicemail",
            JobKind::Blacklist => "blacklist",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a job name does not match any known `JobKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobKind(pub String);

impl fmt::Display for UnknownJobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownJobKind {}

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        JobKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownJobKind(s.to_string()))
    }
}
