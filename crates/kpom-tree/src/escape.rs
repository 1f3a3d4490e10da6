//! Entity escaping and decoding for text and attribute values

use std::borrow::Cow;

/// Escape character data for use between tags
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Escape a value for a double-quoted attribute
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Decode the predefined entities and numeric character references.
///
/// Unknown named entities are left as written.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            decoded.push_str(tail);
            return Cow::Owned(decoded);
        };

        let reference = &tail[1..semi];
        match resolve_reference(reference) {
            Some(ch) => decoded.push(ch),
            None => decoded.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

fn resolve_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = reference
                .strip_prefix("#x")
                .or_else(|| reference.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                reference.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Check that every `&` in raw markup starts a complete reference.
///
/// Returns the byte offset of the first malformed reference.
pub fn find_malformed_reference(raw: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(found) = raw[search_from..].find('&') {
        let amp = search_from + found;
        let tail = &raw[amp + 1..];
        let Some(semi) = tail.find(';') else {
            return Some(amp);
        };
        let reference = &tail[..semi];
        if !is_reference_name(reference) {
            return Some(amp);
        }
        search_from = amp + 1 + semi + 1;
    }
    None
}

fn is_reference_name(reference: &str) -> bool {
    if let Some(numeric) = reference.strip_prefix('#') {
        if let Some(hex) = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'))
        {
            return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
        }
        return !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit());
    }

    let mut chars = reference.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

pub(crate) fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == ':'
}

pub(crate) fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch.is_numeric() || ch == '-' || ch == '.'
}

#[cfg(test)]
mod tests {
    use crate::escape::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a < b && c"), "a &lt; b &amp;&amp; c");
    }

    #[test]
    fn test_escape_attribute_quotes() {
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("R&amp;D &lt;team&gt;"), "R&D <team>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&copy; 2024"), "&copy; 2024");
    }

    #[test]
    fn test_find_malformed_reference() {
        assert_eq!(find_malformed_reference("fine &amp; dandy"), None);
        assert_eq!(find_malformed_reference("&#x1F600;"), None);
        assert_eq!(find_malformed_reference("a & b"), Some(2));
        assert_eq!(find_malformed_reference("&#xZZ;"), Some(0));
        assert_eq!(find_malformed_reference("tail &amp"), Some(5));
    }
}
