use crate::{FinstatError, Record, RequestType};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;
use tracing::debug;

/// Element being assembled while its subtree is read
struct Frame {
    name: String,
    fields: Record,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart) -> Result<Self, FinstatError> {
        let name = decode_name(start.name().as_ref())?;
        let mut fields = Record::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| FinstatError::Xml(e.to_string()))?;
            let key = format!("@{}", decode_name(attr.key.as_ref())?);
            let value = attr.unescape_value()?;
            fields.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.fields.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut fields = self.fields;
            if !text.is_empty() {
                fields.insert("#text".to_string(), Value::String(text.to_string()));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

fn decode_name(raw: &[u8]) -> Result<String, FinstatError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| FinstatError::Xml(format!("invalid UTF-8 in name: {}", e)))
}

/// Add a child element; repeated siblings collapse into an array
fn insert_child(fields: &mut Record, name: String, value: Value) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

/// Only whitespace, comments and processing instructions may follow the root element
fn expect_end_of_document(reader: &mut Reader<&[u8]>) -> Result<(), FinstatError> {
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(()),
            Event::Comment(_) | Event::PI(_) => {}
            Event::Text(text) => {
                if !text.unescape()?.trim().is_empty() {
                    return Err(FinstatError::Xml(
                        "junk after document element".to_string(),
                    ));
                }
            }
            _ => {
                return Err(FinstatError::Xml(
                    "junk after document element".to_string(),
                ))
            }
        }
    }
}

/// Convert an XML document into `(root element name, root value)`.
///
/// Attributes become `@name` keys, text next to attributes or child elements is
/// kept under `#text`, empty elements become null and text-only elements become strings.
pub fn parse_document(xml: &str) -> Result<(String, Value), FinstatError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => {
                        expect_end_of_document(&mut reader)?;
                        return Ok((name, value));
                    }
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = data.into_inner();
                    frame.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| FinstatError::Xml("unbalanced closing tag".to_string()))?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => {
                        expect_end_of_document(&mut reader)?;
                        return Ok((name, value));
                    }
                }
            }
            Event::Eof => {
                return Err(FinstatError::Xml(
                    "document ended before the root element was closed".to_string(),
                ))
            }
            _ => {}
        }
    }
}

/// Parse a successful API response body into the record under its result element
pub fn parse_response(xml: &str, request_type: RequestType) -> Result<Record, FinstatError> {
    let expected = request_type.result_element();
    let (root, value) = parse_document(xml)?;

    if root != expected {
        return Err(FinstatError::UnexpectedRoot {
            expected: expected.to_string(),
            found: root,
        });
    }

    match value {
        Value::Object(record) => {
            debug!("Parsed <{}> with {} top-level fields", root, record.len());
            Ok(record)
        }
        _ => Err(FinstatError::Xml(format!("<{}> has no child elements", root))),
    }
}
