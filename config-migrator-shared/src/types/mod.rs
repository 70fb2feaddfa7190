mod blacklist;
mod callcenter;
mod changeset;
mod conference;
mod dialplan;
mod directory;
mod global_var;
mod ivr;
mod job;
mod setting;
mod sip_profile;
mod source_file;
mod voicemail;

pub use blacklist::BlacklistEntry;
pub use callcenter::{CallcenterAgent, CallcenterQueue, CallcenterTier};
pub use changeset::Changeset;
pub use conference::{ConferenceControl, ConferenceControlGroup, ConferenceProfile, ConferenceRoom};
pub use dialplan::{ActionKind, DialplanAction, DialplanCondition, DialplanContext, DialplanExtension};
pub use directory::{SettingKind, SipGroup, SipUser, UserSetting};
pub use global_var::GlobalVar;
pub use ivr::{IvrMenu, IvrMenuOption};
pub use job::{JobKind, UnknownJobKind};
pub use setting::Setting;
pub use sip_profile::{SipGateway, SipProfile, SipProfileSetting};
pub use source_file::SourceFile;
pub use voicemail::{VoicemailBox, VoicemailProfile};
