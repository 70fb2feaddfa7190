use super::dialplan::{category, extension_priority};
use super::xml;
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_pipeline::processor::HandleSource;
use config_migrator_shared::types::{
    ActionKind, Changeset, DialplanAction, DialplanCondition, DialplanContext, DialplanExtension,
    IvrMenu, IvrMenuOption, SourceFile,
};
use roxmltree::Node;
use tracing::warn;

const DEFAULT_TIMEOUT: i32 = 10_000;
const DEFAULT_INTER_DIGIT_TIMEOUT: i32 = 2_000;
const DEFAULT_MAX_FAILURES: i32 = 3;
const DEFAULT_MAX_TIMEOUTS: i32 = 3;
const DEFAULT_DIGIT_LEN: i32 = 4;

/// Context that receives the routes dialing into each menu.
const ROUTE_CONTEXT: &str = "default";
/// Keeps menu routes clear of the priorities of imported dialplan files.
const ROUTE_PRIORITY_BASE: i32 = 1_000_000_000;

/// Parses IVR menu files. Every `<menu>` becomes one menu with its entries,
/// plus an extension in the `default` context that sends calls to the menu
/// when its name is dialed.
pub struct IvrHandler;

impl HandleSource for IvrHandler {
    fn handle(&self, file: &SourceFile) -> Result<Changeset, ProcessorError> {
        let doc = xml::parse(&file.contents)?;
        let mut menus = Vec::new();
        let mut routes = Vec::new();

        for (index, node) in xml::descendants(doc.root_element(), "menu").enumerate() {
            let menu = parse_menu(file, node)?;
            let priority = extension_priority(ROUTE_PRIORITY_BASE, file.ordinal, index + 1)?;
            routes.push(route(&menu, priority));
            menus.push(menu);
        }

        let dialplan_contexts = if routes.is_empty() {
            Vec::new()
        } else {
            vec![DialplanContext {
                name: ROUTE_CONTEXT.to_string(),
                category: category(ROUTE_CONTEXT).to_string(),
                extensions: routes,
            }]
        };

        Ok(Changeset {
            ivr_menus: menus,
            dialplan_contexts,
            ..Default::default()
        })
    }
}

/// `destination_number` equal to the menu name runs the `ivr` application.
fn route(menu: &IvrMenu, priority: i32) -> DialplanExtension {
    DialplanExtension {
        name: menu.name.clone(),
        continue_on_match: false,
        priority,
        xml_config: menu.xml_config.clone(),
        conditions: vec![DialplanCondition {
            field: "destination_number".to_string(),
            expression: format!("^{}$", menu.name),
            break_on_match: "on-false".to_string(),
            regex: None,
            order: 0,
            actions: vec![DialplanAction {
                kind: ActionKind::Action,
                application: "ivr".to_string(),
                data: menu.name.clone(),
                inline: false,
                order: 0,
            }],
        }],
    }
}

fn parse_menu(file: &SourceFile, menu: Node) -> Result<IvrMenu, ProcessorError> {
    let name = xml::attr_or(menu, "name", &file.stem());

    let mut options = Vec::new();
    for (index, entry) in xml::children(menu, "entry").enumerate() {
        let (Some(action), Some(digits)) = (entry.attribute("action"), entry.attribute("digits")) else {
            warn!(menu = %name, position = index + 1, "Menu entry without action or digits, skipping");
            continue;
        };
        options.push(IvrMenuOption {
            digits: digits.to_string(),
            action: action.to_string(),
            destination: xml::attr(entry, "param").or_else(|| xml::attr(entry, "destination")),
            condition: xml::attr(entry, "condition"),
            priority: index as i32 + 1,
        });
    }

    Ok(IvrMenu {
        greet_long: xml::attr(menu, "greet-long"),
        greet_short: xml::attr(menu, "greet-short"),
        invalid_sound: xml::attr(menu, "invalid-sound"),
        exit_sound: xml::attr(menu, "exit-sound"),
        confirm_macro: xml::attr(menu, "confirm-macro"),
        timeout: xml::int_attr(menu, "timeout", DEFAULT_TIMEOUT)?,
        inter_digit_timeout: xml::int_attr(menu, "inter-digit-timeout", DEFAULT_INTER_DIGIT_TIMEOUT)?,
        max_failures: xml::int_attr(menu, "max-failures", DEFAULT_MAX_FAILURES)?,
        max_timeouts: xml::int_attr(menu, "max-timeouts", DEFAULT_MAX_TIMEOUTS)?,
        digit_len: xml::int_attr(menu, "digit-len", DEFAULT_DIGIT_LEN)?,
        direct_dial: xml::bool_attr(menu, "direct-dial"),
        xml_config: xml::verbatim(&file.contents, menu),
        name,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_migrator_shared::types::JobKind;

    const DEMO_IVR: &str = r#"<include>
  <menu name="demo_ivr"
        greet-long="phrase:demo_ivr_main_menu"
        greet-short="phrase:demo_ivr_main_menu_short"
        invalid-sound="ivr/ivr-that_was_an_invalid_entry.wav"
        exit-sound="voicemail/vm-goodbye.wav"
        timeout="15000"
        max-failures="5"
        direct-dial="true">
    <entry action="menu-exec-app" digits="1" param="bridge sofia/$${domain}/888@conference.freeswitch.org"/>
    <entry action="menu-sub" digits="2" destination="demo_ivr_submenu"/>
    <entry digits="3" param="orphan"/>
    <entry action="menu-top" digits="9"/>
  </menu>
</include>"#;

    #[test]
    fn test_menu_attributes_and_defaults() {
        let file = SourceFile::new(JobKind::Ivr, "/etc/freeswitch/ivr_menus/demo_ivr.xml", 1, DEMO_IVR);

        let changeset = IvrHandler.handle(&file).unwrap();
        let menu = &changeset.ivr_menus[0];

        assert_eq!(menu.name, "demo_ivr");
        assert_eq!(menu.greet_long.as_deref(), Some("phrase:demo_ivr_main_menu"));
        assert_eq!(menu.confirm_macro, None);
        assert_eq!(menu.timeout, 15000);
        assert_eq!(menu.inter_digit_timeout, 2000);
        assert_eq!(menu.max_failures, 5);
        assert_eq!(menu.max_timeouts, 3);
        assert_eq!(menu.digit_len, 4);
        assert!(menu.direct_dial);
        assert!(menu.xml_config.starts_with("<menu name=\"demo_ivr\""));
    }

    #[test]
    fn test_entries_skip_incomplete_and_keep_position() {
        let file = SourceFile::new(JobKind::Ivr, "/etc/freeswitch/ivr_menus/demo_ivr.xml", 1, DEMO_IVR);

        let changeset = IvrHandler.handle(&file).unwrap();
        let options = &changeset.ivr_menus[0].options;

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].destination.as_deref(), Some("bridge sofia/$${domain}/888@conference.freeswitch.org"));
        assert_eq!(options[1].destination.as_deref(), Some("demo_ivr_submenu"));
        assert_eq!(options[2].digits, "9");
        assert_eq!(options[2].priority, 4);
        assert_eq!(options[2].destination, None);
    }

    #[test]
    fn test_every_menu_gets_a_default_route() {
        let xml = r#"<include><menu name="sales"/><menu name="support"/></include>"#;
        let file = SourceFile::new(JobKind::Ivr, "/etc/freeswitch/ivr_menus/queues.xml", 2, xml);

        let changeset = IvrHandler.handle(&file).unwrap();

        assert_eq!(changeset.dialplan_contexts.len(), 1);
        let context = &changeset.dialplan_contexts[0];
        assert_eq!(context.name, "default");
        assert_eq!(context.category, "Default Routing");

        let routes: Vec<_> = context.extensions.iter().map(|e| (e.name.as_str(), e.priority)).collect();
        assert_eq!(routes, vec![("sales", 1_000_002_001), ("support", 1_000_002_002)]);

        let sales = &context.extensions[0];
        assert!(!sales.continue_on_match);
        assert_eq!(sales.xml_config, r#"<menu name="sales"/>"#);
        assert_eq!(sales.conditions.len(), 1);
        assert_eq!(sales.conditions[0].field, "destination_number");
        assert_eq!(sales.conditions[0].expression, "^sales$");
        assert_eq!(sales.conditions[0].break_on_match, "on-false");

        let action = &sales.conditions[0].actions[0];
        assert_eq!((action.kind, action.application.as_str(), action.data.as_str()), (ActionKind::Action, "ivr", "sales"));
        assert_eq!(changeset.record_count(), 2 + 1 + 2 * 3);
    }

    #[test]
    fn test_file_without_menus_has_no_routes() {
        let file = SourceFile::new(JobKind::Ivr, "/etc/freeswitch/ivr_menus/empty.xml", 1, "<include/>");

        assert!(IvrHandler.handle(&file).unwrap().is_empty());
    }

    #[test]
    fn test_unnamed_menu_uses_file_stem() {
        let file = SourceFile::new(JobKind::Ivr, "/etc/freeswitch/ivr_menus/sales.xml", 1, "<include><menu/></include>");

        let changeset = IvrHandler.handle(&file).unwrap();

        assert_eq!(changeset.ivr_menus[0].name, "sales");
        assert!(!changeset.ivr_menus[0].direct_dial);
        assert_eq!(changeset.dialplan_contexts[0].extensions[0].conditions[0].expression, "^sales$");
    }

    #[test]
    fn test_invalid_timeout_fails_file() {
        let file = SourceFile::new(
            JobKind::Ivr,
            "/etc/freeswitch/ivr_menus/broken.xml",
            1,
            r#"<include><menu name="broken" timeout="soon"/></include>"#,
        );

        assert!(matches!(
            IvrHandler.handle(&file),
            Err(ProcessorError::InvalidAttribute { attribute, .. }) if attribute == "timeout"
        ));
    }
}
