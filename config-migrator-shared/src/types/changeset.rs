use crate::types::{
    BlacklistEntry, CallcenterAgent, CallcenterQueue, CallcenterTier, ConferenceControlGroup,
    ConferenceProfile, ConferenceRoom, DialplanContext, GlobalVar, IvrMenu, SipGateway, SipGroup,
    SipProfile, SipUser, VoicemailBox, VoicemailProfile,
};

/// Represents every record extracted from one source file.
///
/// A `Changeset` is persisted atomically: either all of its rows are written
/// or none are. Handlers usually fill only the fields of their own domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changeset {
    pub dialplan_contexts: Vec<DialplanContext>,
    pub ivr_menus: Vec<IvrMenu>,
    pub callcenter_queues: Vec<CallcenterQueue>,
    pub callcenter_agents: Vec<CallcenterAgent>,
    pub callcenter_tiers: Vec<CallcenterTier>,
    pub conference_rooms: Vec<ConferenceRoom>,
    pub conference_control_groups: Vec<ConferenceControlGroup>,
    pub conference_profiles: Vec<ConferenceProfile>,
    pub sip_users: Vec<SipUser>,
    pub sip_groups: Vec<SipGroup>,
    pub sip_profiles: Vec<SipProfile>,
    pub sip_gateways: Vec<SipGateway>,
    pub voicemail_boxes: Vec<VoicemailBox>,
    pub voicemail_profiles: Vec<VoicemailProfile>,
    pub blacklist: Vec<BlacklistEntry>,
    pub global_vars: Vec<GlobalVar>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Total number of rows the changeset flattens into, children included.
    pub fn record_count(&self) -> usize {
        let dialplan: usize = self
            .dialplan_contexts
            .iter()
            .map(|ctx| {
                1 + ctx
                    .extensions
                    .iter()
                    .map(|ext| {
                        1 + ext
                            .conditions
                            .iter()
                            .map(|cond| 1 + cond.actions.len())
                            .sum::<usize>()
                    })
                    .sum::<usize>()
            })
            .sum();
        let ivr: usize = self.ivr_menus.iter().map(|m| 1 + m.options.len()).sum();
        let queues: usize = self.callcenter_queues.iter().map(|q| 1 + q.params.len()).sum();
        let controls: usize = self
            .conference_control_groups
            .iter()
            .map(|g| 1 + g.controls.len())
            .sum();
        let conference_profiles: usize = self
            .conference_profiles
            .iter()
            .map(|p| 1 + p.params.len())
            .sum();
        let users: usize = self.sip_users.iter().map(|u| 1 + u.settings.len()).sum();
        let groups: usize = self.sip_groups.iter().map(|g| 1 + g.members.len()).sum();
        let profiles: usize = self.sip_profiles.iter().map(|p| 1 + p.settings.len()).sum();
        let gateways: usize = self.sip_gateways.iter().map(|g| 1 + g.params.len()).sum();
        let vm_profiles: usize = self
            .voicemail_profiles
            .iter()
            .map(|p| 1 + p.settings.len())
            .sum();

        dialplan
            + ivr
            + queues
            + self.callcenter_agents.len()
            + self.callcenter_tiers.len()
            + self.conference_rooms.len()
            + controls
            + conference_profiles
            + users
            + groups
            + profiles
            + gateways
            + self.voicemail_boxes.len()
            + vm_profiles
            + self.blacklist.len()
            + self.global_vars.len()
    }
}
