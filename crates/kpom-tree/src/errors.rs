use thiserror::Error;

/// The descriptor text is not a well-formed XML document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed descriptor at line {line}, column {column}: {message}")]
pub struct MalformedDescriptorError {
    /// 1-based line of the offending position
    pub line: usize,
    /// 1-based column (in characters) of the offending position
    pub column: usize,
    pub message: String,
}

impl MalformedDescriptorError {
    /// Build an error for a byte offset into `source`
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let prefix = source.get(..offset).unwrap_or(source);
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |idx| idx + 1);
        let column = prefix[line_start..].chars().count() + 1;

        MalformedDescriptorError {
            line,
            column,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_position_from_offset() {
        let source = "<a>\n  <b>\n</a>";
        let err = MalformedDescriptorError::at(source, 8, "boom");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn test_display_includes_position() {
        let err = MalformedDescriptorError::at("<a", 2, "unterminated start tag");
        assert_eq!(
            err.to_string(),
            "Malformed descriptor at line 1, column 3: unterminated start tag"
        );
    }
}
