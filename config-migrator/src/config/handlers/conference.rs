use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    Changeset, ConferenceControl, ConferenceControlGroup, ConferenceProfile, ConferenceRoom,
    SourceFile,
};
use tracing::warn;

/// Parses `conference.conf.xml`: advertised rooms, caller-control groups
/// and profiles.
pub struct ConferenceHandler;

impl HandleSource for ConferenceHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let root = doc.root_element();
        let mut changeset = Changeset::default();

        for room in xml::find_all(root, "advertise", "room") {
            let Some(name) = room.attribute("name") else {
                warn!("Advertised room without a name, skipping");
                continue;
            };
            changeset.conference_rooms.push(ConferenceRoom {
                name: name.to_string(),
                status: xml::attr(room, "status"),
            });
        }

        for group in xml::find_all(root, "caller-controls", "group") {
            let Some(name) = group.attribute("name") else {
                warn!("Caller-control group without a name, skipping");
                continue;
            };
            let controls = xml::children(group, "control")
                .enumerate()
                .map(|(order, control)| ConferenceControl {
                    action: xml::attr_or(control, "action", ""),
                    digits: xml::attr_or(control, "digits", ""),
                    order: order as i32,
                })
                .collect();
            changeset.conference_control_groups.push(ConferenceControlGroup {
                name: name.to_string(),
                controls,
            });
        }

        for profile in xml::find_all(root, "profiles", "profile") {
            let Some(name) = profile.attribute("name") else {
                warn!("Conference profile without a name, skipping");
                continue;
            };
            changeset.conference_profiles.push(ConferenceProfile {
                name: name.to_string(),
                params: xml::params(profile),
                xml_config: xml::verbatim(&file.contents, profile),
            });
        }

        Ok(changeset)
    }
}
