//! iCalendar line folding.

/// Maximum line length in octets (not characters) per RFC 5545 §3.1.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line to the maximum length.
///
/// Lines longer than 75 octets are folded by inserting CRLF + one
/// space. Continuation segments budget one octet for their space
/// prefix. A cut point landing inside a multi-byte UTF-8 sequence is
/// moved backward to the nearest character boundary.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut rest = line;
    let mut first_segment = true;

    while !rest.is_empty() {
        let budget = if first_segment {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1 // Account for the space prefix
        };

        if rest.len() <= budget {
            if !first_segment {
                result.push_str("\r\n ");
            }
            result.push_str(rest);
            break;
        }

        let mut cut = budget;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }

        if !first_segment {
            result.push_str("\r\n ");
        }
        result.push_str(&rest[..cut]);
        rest = &rest[cut..];
        first_segment = false;
    }

    result
}
