//! Reader for Java-style `.properties` resources
//!
//! Supports `#`/`!` comments, `=`, `:` or whitespace separators, backslash
//! line continuations and the usual escapes including `\uXXXX`.

use std::collections::HashMap;

/// Key/value pairs read from a properties resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            entries.insert(unescape(key), unescape(value));
        }
        Properties { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join continued lines and drop blanks and comments
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim_start();
        match pending.take() {
            Some(mut joined) => {
                let (body, continues) = strip_continuation(line);
                joined.push_str(body);
                if continues {
                    pending = Some(joined);
                } else {
                    lines.push(joined);
                }
            }
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                let (body, continues) = strip_continuation(line);
                if continues {
                    pending = Some(body.to_string());
                } else {
                    lines.push(body.to_string());
                }
            }
        }
    }

    if let Some(joined) = pending {
        lines.push(joined);
    }
    lines
}

/// An odd number of trailing backslashes continues the line
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.len() - line.trim_end_matches('\\').len();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                break;
            }
            c if c.is_whitespace() => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut value = line[key_end..].trim_start();
    if let Some(rest) = value.strip_prefix(|c| c == '=' || c == ':') {
        value = rest.trim_start();
    }
    (key, value)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::properties::*;

    #[test]
    fn test_separators() {
        let props = Properties::parse("a=1\nb: 2\nc 3\nd = 4\n");
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some("4"));
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = Properties::parse("# comment\n! also comment\n\n   \nkey=value\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key"), Some("value"));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("list = a, \\\n       b, \\\n       c\nnext=1");
        assert_eq!(props.get("list"), Some("a, b, c"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = Properties::parse("path=C:\\\\\nother=x");
        assert_eq!(props.get("path"), Some("C:\\"));
        assert_eq!(props.get("other"), Some("x"));
    }

    #[test]
    fn test_escapes() {
        let props = Properties::parse("my\\ key=tab\\there \\u00e9\nk\\=v=x");
        assert_eq!(props.get("my key"), Some("tab\there é"));
        assert_eq!(props.get("k=v"), Some("x"));
    }

    #[test]
    fn test_empty_value() {
        let props = Properties::parse("empty=\n");
        assert_eq!(props.get("empty"), Some(""));
        assert!(Properties::parse("").is_empty());
    }

    #[test]
    fn test_crlf_input() {
        let props = Properties::parse("a=1\r\nb=2\r\n");
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
    }
}
