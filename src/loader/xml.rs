//! Configuration document reading.
//!
//! The loader walks documents as small element trees. quick-xml hands us a
//! flat event stream; this module folds it into [`XmlElement`] nodes so
//! the dispatch code can iterate children and read attributes the way the
//! document is structured.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::LoadError;

/// One parsed element: name, attributes in document order, text content,
/// children in document order.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Required attribute, `MissingAttribute` otherwise.
    pub fn require_attribute(&self, name: &str) -> Result<&str, LoadError> {
        self.attribute(name)
            .ok_or_else(|| LoadError::MissingAttribute(name.to_string()))
    }

    /// Integer attribute with a default for absence. A present but
    /// non-numeric value is a `BadAttributeValue`.
    pub fn int_attribute(&self, name: &str, default: i32) -> Result<i32, LoadError> {
        match self.attribute(name) {
            None => Ok(default),
            Some(v) => v
                .parse()
                .map_err(|_| LoadError::BadAttributeValue(v.to_string())),
        }
    }

    /// Boolean attribute with a default for absence; only `"true"` is
    /// true.
    pub fn bool_attribute(&self, name: &str, default: bool) -> bool {
        match self.attribute(name) {
            None => default,
            Some(v) => v == "true",
        }
    }

    /// Element text content, empty string when the element is empty.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Parse a whole document into its root element.
pub fn parse_document(input: &[u8]) -> Result<XmlElement, LoadError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| LoadError::BadXml("unmatched end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| LoadError::BadXml(e.to_string()))?;
                    parent.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(LoadError::BadXml(format!(
                    "parse error at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(LoadError::BadXml("unclosed element".to_string()));
    }
    root.ok_or_else(|| LoadError::BadXml("empty document".to_string()))
}

fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement, LoadError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| LoadError::BadXml(format!("invalid tag name: {e}")))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| LoadError::BadXml(format!("attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| LoadError::BadXml(format!("attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| LoadError::BadXml(format!("attribute value error: {e}")))?
            .to_string();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), LoadError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(LoadError::BadXml("multiple root elements".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes_and_text() {
        let doc = br#"<?xml version="1.0"?>
            <def format="2">
              <memory>
                <alloc init="false">malloc</alloc>
                <dealloc>free</dealloc>
              </memory>
            </def>"#;
        let root = parse_document(doc).unwrap();
        assert_eq!(root.name, "def");
        assert_eq!(root.attribute("format"), Some("2"));
        let memory = &root.children[0];
        assert_eq!(memory.name, "memory");
        assert_eq!(memory.children.len(), 2);
        assert_eq!(memory.children[0].text(), "malloc");
        assert_eq!(memory.children[0].attribute("init"), Some("false"));
    }

    #[test]
    fn malformed_documents_are_bad_xml() {
        assert!(matches!(
            parse_document(b"<def><function></def>"),
            Err(LoadError::BadXml(_))
        ));
        assert!(matches!(parse_document(b""), Err(LoadError::BadXml(_))));
        assert!(matches!(
            parse_document(b"<a/><b/>"),
            Err(LoadError::BadXml(_))
        ));
    }

    #[test]
    fn attribute_helpers() {
        let root = parse_document(br#"<def format="1" flag="true"/>"#).unwrap();
        assert_eq!(root.int_attribute("format", 7).unwrap(), 1);
        assert_eq!(root.int_attribute("absent", 7).unwrap(), 7);
        assert!(root.bool_attribute("flag", false));
        assert!(root.require_attribute("nope").is_err());
        assert_eq!(
            root.int_attribute("flag", 0),
            Err(LoadError::BadAttributeValue("true".to_string()))
        );
    }
}
