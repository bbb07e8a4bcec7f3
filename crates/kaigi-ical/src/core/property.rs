//! iCalendar property types (RFC 5545 §3.1, §3.8).

/// A property parameter, e.g. `TZID=Europe/Berlin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    pub value: String,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            value: value.into(),
        }
    }

    /// Creates a TZID parameter.
    #[must_use]
    pub fn tzid(tzid: impl Into<String>) -> Self {
        Self::new("TZID", tzid)
    }
}

/// A property value.
///
/// Text values are escaped on serialization; raw values (date-times,
/// recurrence rules, comma-joined date lists) are emitted as-is since
/// escaping their separators would corrupt them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Raw(String),
    Integer(i64),
}

/// A property to be serialized onto one (folded) content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    pub value: Value,
}

impl Property {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Text(value.into()),
        }
    }

    /// Creates a property with a preformatted value that must not be escaped.
    #[must_use]
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Raw(value.into()),
        }
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: Value::Integer(value),
        }
    }

    /// Returns this property with a parameter appended.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        let name_upper = name.to_ascii_uppercase();
        self.params
            .iter()
            .find(|p| p.name == name_upper)
            .map(|p| p.value.as_str())
    }

    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}
