//! iCalendar component types (RFC 5545 §3.4-3.6).

use super::Property;

/// Component kind for iCalendar.
///
/// Only the kinds the generator emits; there is no parsing path, so no
/// unknown/X-component variant is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTIMEZONE component (emitted as a TZID-only stub).
    Timezone,
    /// VALARM component (nested within VEVENT).
    Alarm,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An iCalendar component under construction.
///
/// Components contain properties and nested sub-components; a
/// VCALENDAR contains a VTIMEZONE stub and a VEVENT, which may contain
/// a VALARM.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Component type/name.
    pub kind: ComponentKind,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VCALENDAR component.
    #[must_use]
    pub const fn calendar() -> Self {
        Self::new(ComponentKind::Calendar)
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub const fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTIMEZONE component.
    #[must_use]
    pub const fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    /// Creates a VALARM component.
    #[must_use]
    pub const fn alarm() -> Self {
        Self::new(ComponentKind::Alarm)
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Adds a child component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let name_upper = name.to_ascii_uppercase();
        self.properties.iter().find(|p| p.name == name_upper)
    }

    /// Returns whether a property with the given name is present.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children.iter().filter(|c| c.kind == kind).collect()
    }
}
