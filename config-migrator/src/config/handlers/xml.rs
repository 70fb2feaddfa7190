//! Small helpers over `roxmltree` shared by the XML handlers.
use config_migrator_pipeline::errors::ProcessorError;
use config_migrator_shared::types::Setting;
use roxmltree::{Document, Node, ParsingOptions};

pub(crate) fn parse(contents: &str) -> Result<Document<'_>, ProcessorError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(contents, options).map_err(|e| ProcessorError::Xml(e.to_string()))
}

pub(crate) fn attr(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

pub(crate) fn attr_or(node: Node, name: &str, default: &str) -> String {
    node.attribute(name).unwrap_or(default).to_string()
}

/// `true` only for a case-insensitive "true".
pub(crate) fn bool_attr(node: Node, name: &str) -> bool {
    node.attribute(name)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Integer attribute with a default for when it is absent.
///
/// A present value that does not parse fails the whole file.
pub(crate) fn int_attr(node: Node, name: &str, default: i32) -> Result<i32, ProcessorError> {
    match node.attribute(name) {
        Some(value) => parse_int(node.tag_name().name(), name, value),
        None => Ok(default),
    }
}

pub(crate) fn parse_int(element: &str, attribute: &str, value: &str) -> Result<i32, ProcessorError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProcessorError::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

/// Every `<child>` directly under any `<parent>` below `root`, in document order.
pub(crate) fn find_all<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    parent: &'a str,
    child_tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    root.descendants()
        .filter(move |n| n.is_element() && n.has_tag_name(parent))
        .flat_map(move |p| children(p, child_tag))
}

/// Every element named `tag` below (or at) `root`, in document order.
pub(crate) fn descendants<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    root.descendants()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

/// Source text of the element exactly as written in the file.
pub(crate) fn verbatim(contents: &str, node: Node) -> String {
    contents
        .get(node.range())
        .unwrap_or_default()
        .to_string()
}

/// `<param name value>` children of `node` in order. Params without a name
/// are ignored; a missing value is stored as empty.
pub(crate) fn params(node: Node) -> Vec<Setting> {
    children(node, "param")
        .filter_map(|p| Some((p.attribute("name")?, p.attribute("value").unwrap_or(""))))
        .enumerate()
        .map(|(order, (name, value))| Setting::new(name, value, order as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_attr_defaults_and_errors() {
        let doc = parse(r#"<menu timeout="5000" digit-len="four"/>"#).unwrap();
        let menu = doc.root_element();

        assert_eq!(int_attr(menu, "timeout", 10000).unwrap(), 5000);
        assert_eq!(int_attr(menu, "max-failures", 3).unwrap(), 3);
        assert!(matches!(
            int_attr(menu, "digit-len", 4),
            Err(ProcessorError::InvalidAttribute { attribute, value, .. }) if attribute == "digit-len" && value == "four"
        ));
    }

    #[test]
    fn test_find_all_and_verbatim() {
        let contents = r#"<configuration><queues><queue name="a"/><queue name="b"/></queues></configuration>"#;
        let doc = parse(contents).unwrap();

        let queues: Vec<_> = find_all(doc.root_element(), "queues", "queue").collect();

        assert_eq!(queues.len(), 2);
        assert_eq!(verbatim(contents, queues[1]), r#"<queue name="b"/>"#);
    }

    #[test]
    fn test_params_keep_order() {
        let doc = parse(r#"<p><param name="x" value="1"/><param value="orphan"/><param name="y"/></p>"#).unwrap();

        let settings = params(doc.root_element());

        assert_eq!(settings, vec![Setting::new("x", "1", 0), Setting::new("y", "", 1)]);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(parse("<include><user></include>"), Err(ProcessorError::Xml(_))));
    }
}
