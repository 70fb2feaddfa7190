//! Handlers that turn FreeSWITCH source files into changesets, one per job kind.
mod blacklist;
mod callcenter;
mod conference;
mod dialplan;
mod directory;
mod global_vars;
mod ivr;
mod sip_profiles;
mod voicemail;
pub(crate) mod xml;

pub use blacklist::BlacklistHandler;
pub use callcenter::CallcenterHandler;
pub use conference::ConferenceHandler;
pub use dialplan::DialplanHandler;
pub use directory::DirectoryHandler;
pub use global_vars::{GlobalVarsHandler, expand, parse_global_vars, variable_map};
pub use ivr::IvrHandler;
pub use sip_profiles::SipProfilesHandler;
pub use voicemail::{VoicemailHandler, VoicemailProfilesHandler};
