//! Global variables from `vars.xml`.
//!
//! Besides the handler, this module exposes the variable map used to expand
//! `$${name}` references in other files.
use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{Changeset, GlobalVar, SourceFile};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::warn;

lazy_static! {
    static ref VARIABLE_REF: Regex = Regex::new(r"\$\$\{([^}]*)\}").unwrap();
}

const SET_COMMANDS: [&str; 4] = ["set", "exec-set", "stun-set", "env-set"];
const DEFAULT_DESCRIPTION: &str = "Uncategorized";

pub struct GlobalVarsHandler;

impl HandleSource for GlobalVarsHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        Ok(Changeset {
            global_vars: parse_global_vars(&file.contents)?,
            ..Default::default()
        })
    }
}

/// Extracts every `X-PRE-PROCESS` variable definition in document order.
///
/// The description of a variable is the closest single-line comment above
/// it. Multi-line comments leave the current description untouched.
pub fn parse_global_vars(contents: &str) -> Result<Vec<GlobalVar>, ProcessorError> {
    let doc = xml::parse(contents)?;
    let mut description = DEFAULT_DESCRIPTION.to_string();
    let mut vars = Vec::new();

    for node in doc.root().descendants() {
        if node.is_comment() {
            let text = node.text().unwrap_or_default().trim();
            if !text.is_empty() && !text.contains('\n') {
                description = text.to_string();
            }
            continue;
        }
        if !node.is_element() || !node.has_tag_name("X-PRE-PROCESS") {
            continue;
        }
        if !node.attribute("cmd").is_some_and(|cmd| SET_COMMANDS.contains(&cmd)) {
            continue;
        }
        let data = node.attribute("data").unwrap_or_default();
        match data.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => vars.push(GlobalVar {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
                description: description.clone(),
            }),
            _ => warn!(data, "Variable definition without name=value, skipping"),
        }
    }

    Ok(vars)
}

/// Builds the name to value map, expanding references to variables defined
/// earlier in the file. A later definition of the same name wins.
pub fn variable_map(vars: &[GlobalVar]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for var in vars {
        let value = expand(&var.value, &map);
        map.insert(var.name.clone(), value);
    }
    map
}

/// Replaces every `$${name}` whose name is known. Unknown references are
/// left as written.
pub fn expand(value: &str, vars: &HashMap<String, String>) -> String {
    VARIABLE_REF
        .replace_all(value, |caps: &Captures| match vars.get(&caps[1]) {
            Some(resolved) => resolved.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
