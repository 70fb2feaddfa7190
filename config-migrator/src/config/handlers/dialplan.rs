use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    ActionKind, Changeset, DialplanAction, DialplanCondition, DialplanContext, DialplanExtension,
    SourceFile,
};
use roxmltree::Node;
use std::path::PathBuf;

/// Priority slots reserved per source file. Extension `n` of file `k` gets
/// `base + k * PRIORITY_STRIDE + n`.
pub(crate) const PRIORITY_STRIDE: usize = 1000;

/// Priority of the `position`-th (1-based) extension of the `ordinal`-th file.
///
/// Fails when the file has more extensions than fit in its slot or when the
/// result does not fit the `INTEGER` column.
pub(crate) fn extension_priority(base: i32, ordinal: usize, position: usize) -> Result<i32, ProcessorError> {
    if position >= PRIORITY_STRIDE {
        return Err(ProcessorError::PriorityOutOfRange { ordinal, position });
    }
    ordinal
        .checked_mul(PRIORITY_STRIDE)
        .and_then(|slot| slot.checked_add(position))
        .and_then(|offset| i32::try_from(offset).ok())
        .and_then(|offset| offset.checked_add(base))
        .ok_or(ProcessorError::PriorityOutOfRange { ordinal, position })
}

/// Parses dialplan files into contexts, extensions, conditions and actions.
pub struct DialplanHandler {
    root: PathBuf,
}

impl DialplanHandler {
    /// `root` is the dialplan directory. Extensions of files directly inside
    /// it that declare no `<context>` belong to a context named after the file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Context for extensions that are not wrapped in a `<context>`.
    fn implicit_context(&self, file: &SourceFile) -> String {
        let in_root = file.path.parent().is_some_and(|p| p == self.root);
        match file.parent_dir_name() {
            Some(dir) if !in_root => dir,
            _ => file.stem(),
        }
    }
}

pub(crate) fn category(context: &str) -> &'static str {
    match context {
        "features" => "Feature Codes",
        "public" => "Public Dialplan",
        "default" => "Default Routing",
        "skinny-patterns" => "Skinny Patterns",
        _ => "Uncategorized",
    }
}

impl HandleSource for DialplanHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let root = doc.root_element();
        let mut position = 0;
        let mut contexts: Vec<DialplanContext> = Vec::new();

        for node in xml::descendants(root, "extension") {
            position += 1;
            let context_name = match node.ancestors().find(|a| a.has_tag_name("context")) {
                Some(context) => xml::attr_or(context, "name", &self.implicit_context(file)),
                None => self.implicit_context(file),
            };
            let priority = extension_priority(0, file.ordinal, position)?;
            let extension = parse_extension(&file.contents, node, priority);

            match contexts.iter_mut().find(|c| c.name == context_name) {
                Some(context) => context.extensions.push(extension),
                None => contexts.push(DialplanContext {
                    category: category(&context_name).to_string(),
                    name: context_name,
                    extensions: vec![extension],
                }),
            }
        }

        Ok(Changeset {
            dialplan_contexts: contexts,
            ..Default::default()
        })
    }
}

fn parse_extension(contents: &str, node: Node, priority: i32) -> DialplanExtension {
    let conditions = xml::children(node, "condition")
        .enumerate()
        .map(|(order, condition)| parse_condition(condition, order as i32))
        .collect();

    DialplanExtension {
        name: xml::attr_or(node, "name", "unnamed"),
        continue_on_match: xml::bool_attr(node, "continue"),
        priority,
        xml_config: xml::verbatim(contents, node),
        conditions,
    }
}

fn parse_condition(node: Node, order: i32) -> DialplanCondition {
    let actions = node
        .children()
        .filter(|n| n.is_element())
        .filter_map(|n| match n.tag_name().name() {
            "action" => Some((ActionKind::Action, n)),
            "anti-action" => Some((ActionKind::AntiAction, n)),
            _ => None,
        })
        .enumerate()
        .map(|(order, (kind, n))| DialplanAction {
            kind,
            application: xml::attr_or(n, "application", ""),
            data: xml::attr_or(n, "data", ""),
            inline: xml::bool_attr(n, "inline"),
            order: order as i32,
        })
        .collect();

    DialplanCondition {
        field: xml::attr_or(node, "field", ""),
        expression: xml::attr_or(node, "expression", ""),
        break_on_match: xml::attr_or(node, "break", "on-false"),
        regex: xml::attr(node, "regex"),
        order,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_migrator_shared::types::JobKind;

    const DEFAULT_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<include>
  <context name="default">
    <extension name="echo">
      <condition field="destination_number" expression="^9196$">
        <action application="answer"/>
        <anti-action application="log" data="no echo"/>
        <action application="echo" inline="true"/>
      </condition>
    </extension>
    <extension name="park" continue="true">
      <condition field="${sip_has_crypto}" expression="^$" break="never"/>
      <condition regex="any">
        <regex field="destination_number" expression="^5900$"/>
        <action application="park"/>
      </condition>
    </extension>
  </context>
  <context name="features">
    <extension><condition/></extension>
  </context>
</include>"#;

    fn handler() -> DialplanHandler {
        DialplanHandler::new("/etc/freeswitch/dialplan")
    }

    #[test]
    fn test_contexts_and_extensions() {
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/default.xml", 2, DEFAULT_XML);

        let changeset = handler().handle(&file).unwrap();
        let contexts = &changeset.dialplan_contexts;

        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].name, "default");
        assert_eq!(contexts[0].category, "Default Routing");
        assert_eq!(contexts[1].category, "Feature Codes");
        assert_eq!(contexts[1].extensions[0].name, "unnamed");

        let echo = &contexts[0].extensions[0];
        assert_eq!(echo.priority, 2001);
        assert!(!echo.continue_on_match);
        assert!(echo.xml_config.starts_with("<extension name=\"echo\">"));
        assert!(echo.xml_config.ends_with("</extension>"));

        let park = &contexts[0].extensions[1];
        assert_eq!(park.priority, 2002);
        assert!(park.continue_on_match);
        assert_eq!(park.conditions[0].break_on_match, "never");
        assert_eq!(park.conditions[1].break_on_match, "on-false");
        assert_eq!(park.conditions[1].regex.as_deref(), Some("any"));
        assert_eq!(park.conditions[1].order, 1);
    }

    #[test]
    fn test_action_order_spans_both_kinds() {
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/default.xml", 1, DEFAULT_XML);

        let changeset = handler().handle(&file).unwrap();
        let actions = &changeset.dialplan_contexts[0].extensions[0].conditions[0].actions;

        let summary: Vec<_> = actions.iter().map(|a| (a.kind, a.application.as_str(), a.order)).collect();
        assert_eq!(
            summary,
            vec![
                (ActionKind::Action, "answer", 0),
                (ActionKind::AntiAction, "log", 1),
                (ActionKind::Action, "echo", 2),
            ]
        );
        assert_eq!(actions[1].data, "no echo");
        assert!(actions[2].inline);
    }

    #[test]
    fn test_include_file_uses_directory_as_context() {
        let xml = r#"<include><extension name="tod"><condition wday="2-6"/></extension></include>"#;
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/public/00_inbound.xml", 3, xml);

        let changeset = handler().handle(&file).unwrap();

        assert_eq!(changeset.dialplan_contexts[0].name, "public");
        assert_eq!(changeset.dialplan_contexts[0].category, "Public Dialplan");
        assert_eq!(changeset.dialplan_contexts[0].extensions[0].priority, 3001);
    }

    #[test]
    fn test_root_file_without_context_uses_stem() {
        let xml = r#"<include><extension name="x"/></include>"#;
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/skinny-patterns.xml", 1, xml);

        let changeset = handler().handle(&file).unwrap();

        assert_eq!(changeset.dialplan_contexts[0].name, "skinny-patterns");
        assert_eq!(changeset.dialplan_contexts[0].category, "Skinny Patterns");
    }

    #[test]
    fn test_too_many_extensions_fail_the_file() {
        let extensions: String = (0..PRIORITY_STRIDE).map(|i| format!(r#"<extension name="e{i}"/>"#)).collect();
        let xml = format!("<include>{extensions}</include>");
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/default/huge.xml", 2, xml);

        assert!(matches!(
            handler().handle(&file),
            Err(ProcessorError::PriorityOutOfRange { ordinal: 2, position: 1000 })
        ));
    }

    #[test]
    fn test_extension_priority_bounds() {
        assert_eq!(extension_priority(0, 1, 999).unwrap(), 1999);
        assert_eq!(extension_priority(500, 2, 1).unwrap(), 2501);
        assert!(extension_priority(0, 3_000_000, 1).is_err());
        assert!(extension_priority(i32::MAX - 10, 1, 1).is_err());
    }

    #[test]
    fn test_file_without_extensions_is_empty() {
        let xml = r#"<include><X-PRE-PROCESS cmd="include" data="default/*.xml"/></include>"#;
        let file = SourceFile::new(JobKind::Dialplan, "/etc/freeswitch/dialplan/default.xml", 1, xml);

        assert!(handler().handle(&file).unwrap().is_empty());
    }
}
