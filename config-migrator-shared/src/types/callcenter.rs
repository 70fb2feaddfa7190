use crate::types::Setting;

#[derive(Clone, Debug, PartialEq)]
pub struct CallcenterQueue {
    pub name: String,
    pub strategy: String,
    pub moh_sound: String,
    pub max_wait_time: i32,
    pub record_template: Option<String>,
    /// Every `<param>` of the queue, verbatim and in order.
    pub params: Vec<Setting>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallcenterAgent {
    pub name: String,
    pub agent_type: String,
    pub contact: Option<String>,
    pub status: String,
    pub max_no_answer: i32,
    pub wrap_up_time: i32,
    pub reject_delay_time: i32,
    pub busy_delay_time: i32,
}

/// Links an agent to a queue. Both sides are referenced by name and
/// resolved against stored rows when persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CallcenterTier {
    pub queue: String,
    pub agent: String,
    pub level: i32,
    pub position: i32,
}
