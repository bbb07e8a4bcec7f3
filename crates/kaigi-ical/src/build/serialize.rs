//! Component tree serialization.

use super::{escape_param_value, escape_text, fold_line};
use crate::core::{Component, Property, Value};

/// Serializes a complete component tree into calendar text.
///
/// Every content line is folded at 75 octets and terminated with CRLF.
/// Property order is insertion order, so identical trees always
/// produce byte-identical output.
#[must_use]
pub fn serialize(root: &Component) -> String {
    let mut out = String::new();
    serialize_component(root, &mut out);
    out
}

/// Serializes one component (and its children) onto `out`.
pub fn serialize_component(component: &Component, out: &mut String) {
    push_line(out, &format!("BEGIN:{}", component.kind));
    for property in &component.properties {
        serialize_property(property, out);
    }
    for child in &component.children {
        serialize_component(child, out);
    }
    push_line(out, &format!("END:{}", component.kind));
}

/// Serializes a single property as one folded content line.
pub fn serialize_property(property: &Property, out: &mut String) {
    let mut line = property.name.clone();
    for param in &property.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        line.push_str(&escape_param_value(&param.value));
    }
    line.push(':');
    match &property.value {
        Value::Text(text) => line.push_str(&escape_text(text)),
        Value::Raw(raw) => line.push_str(raw),
        Value::Integer(n) => line.push_str(&n.to_string()),
    }
    push_line(out, &line);
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}
