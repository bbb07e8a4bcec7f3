//! iCalendar text escaping (RFC 5545 §3.3.11).

/// Escapes a TEXT value.
///
/// Substitution order is fixed: backslash first, then newline, comma,
/// semicolon. Escaping the backslash first keeps the backslashes
/// introduced by the later substitutions intact.
#[must_use]
pub fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Escapes a parameter value.
///
/// Parameter values cannot carry backslash escapes; values containing
/// separators are double-quoted instead (RFC 5545 §3.2).
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    if s.contains([':', ';', ',']) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}
