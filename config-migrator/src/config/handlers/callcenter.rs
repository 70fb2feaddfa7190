use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    CallcenterAgent, CallcenterQueue, CallcenterTier, Changeset, Setting, SourceFile,
};
use roxmltree::Node;
use tracing::warn;

/// Parses `callcenter.conf.xml` into queues, agents and tiers.
pub struct CallcenterHandler;

impl HandleSource for CallcenterHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let root = doc.root_element();

        let queues = xml::find_all(root, "queues", "queue")
            .filter_map(|node| named(node, "queue"))
            .map(|(name, node)| parse_queue(name, node))
            .collect::<Result<Vec<_>, _>>()?;
        let agents = xml::find_all(root, "agents", "agent")
            .filter_map(|node| named(node, "agent"))
            .map(|(name, node)| parse_agent(name, node))
            .collect::<Result<Vec<_>, _>>()?;
        let tiers = xml::find_all(root, "tiers", "tier")
            .filter_map(|node| parse_tier(node).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Changeset {
            callcenter_queues: queues,
            callcenter_agents: agents,
            callcenter_tiers: tiers,
            ..Default::default()
        })
    }
}

fn named<'a, 'input>(node: Node<'a, 'input>, kind: &str) -> Option<(String, Node<'a, 'input>)> {
    match node.attribute("name") {
        Some(name) => Some((name.to_string(), node)),
        None => {
            warn!(element = kind, "Element without a name, skipping");
            None
        }
    }
}

/// Reads a field from the attribute, falling back to a `<param>` child.
fn field(node: Node, params: &[Setting], name: &str) -> Option<String> {
    xml::attr(node, name).or_else(|| {
        params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.clone())
    })
}

fn int_field(node: Node, params: &[Setting], name: &str, default: i32) -> Result<i32, ProcessorError> {
    match field(node, params, name) {
        Some(value) => xml::parse_int(node.tag_name().name(), name, &value),
        None => Ok(default),
    }
}

fn parse_queue(name: String, node: Node) -> Result<CallcenterQueue, ProcessorError> {
    let params = xml::params(node);
    Ok(CallcenterQueue {
        strategy: field(node, &params, "strategy").unwrap_or_else(|| "longest-idle-agent".to_string()),
        moh_sound: field(node, &params, "moh-sound")
            .or_else(|| field(node, &params, "music-on-hold"))
            .unwrap_or_else(|| "local_stream://moh".to_string()),
        max_wait_time: int_field(node, &params, "max-wait-time", 0)?,
        record_template: field(node, &params, "record-template"),
        name,
        params,
    })
}

fn parse_agent(name: String, node: Node) -> Result<CallcenterAgent, ProcessorError> {
    let params = xml::params(node);
    Ok(CallcenterAgent {
        agent_type: field(node, &params, "type").unwrap_or_else(|| "callback".to_string()),
        contact: field(node, &params, "contact"),
        status: field(node, &params, "status").unwrap_or_else(|| "Available".to_string()),
        max_no_answer: int_field(node, &params, "max-no-answer", 3)?,
        wrap_up_time: int_field(node, &params, "wrap-up-time", 10)?,
        reject_delay_time: int_field(node, &params, "reject-delay-time", 10)?,
        busy_delay_time: int_field(node, &params, "busy-delay-time", 10)?,
        name,
    })
}

fn parse_tier(node: Node) -> Result<Option<CallcenterTier>, ProcessorError> {
    let (Some(queue), Some(agent)) = (node.attribute("queue"), node.attribute("agent")) else {
        warn!("Tier without queue or agent, skipping");
        return Ok(None);
    };
    Ok(Some(CallcenterTier {
        queue: queue.to_string(),
        agent: agent.to_string(),
        level: xml::int_attr(node, "level", 1)?,
        position: xml::int_attr(node, "position", 1)?,
    }))
}
