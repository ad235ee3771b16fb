//! Source file bookkeeping
//!
//! The [`SourceMap`] owns the input buffer and file name and converts byte
//! offsets into 1-based line/column positions for diagnostics. A line-start
//! table is built once up front so conversion is a binary search.

use crate::span::Position;

/// Owns one source file's name and text and serves location queries.
#[derive(Debug, Clone)]
pub struct SourceMap {
    name: String,
    text: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Create a source map for the given file name and contents.
    ///
    /// Recognized line terminators are `\n`, `\r\n` (a single line advance),
    /// and a lone `\r`.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    i += 1;
                    line_starts.push(i);
                }
                b'\r' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i);
                }
                _ => i += 1,
            }
        }

        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    /// The file name this map was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert a byte offset to a 1-based line/column position.
    ///
    /// Offsets past the end of the buffer resolve to the position just after
    /// the last character, so EOF diagnostics stay printable.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let column = offset - self.line_starts[line] + 1;
        Position::new((line + 1) as u32, column as u32)
    }

    /// The text of the n-th line (1-based), without its terminator.
    pub fn line(&self, n: u32) -> Option<&str> {
        let index = (n as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches(['\n', '\r']))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        let map = SourceMap::new("t.k", "");
        let pos = map.position(0);
        assert_eq!((pos.line, pos.column), (1, 1));
    }

    #[test]
    fn test_eof_after_whitespace() {
        let map = SourceMap::new("t.k", "   \t\n  ");
        let pos = map.position(7);
        assert_eq!((pos.line, pos.column), (2, 3));
    }

    #[test]
    fn test_crlf_is_one_line_advance() {
        let map = SourceMap::new("t.k", "x\r\ny");
        let pos = map.position(3);
        assert_eq!((pos.line, pos.column), (2, 1));
        assert_eq!(map.line(1), Some("x"));
        assert_eq!(map.line(2), Some("y"));
    }

    #[test]
    fn test_lone_cr_advances_line() {
        let map = SourceMap::new("t.k", "a\rb");
        let pos = map.position(2);
        assert_eq!((pos.line, pos.column), (2, 1));
    }

    #[test]
    fn test_line_lookup() {
        let map = SourceMap::new("t.k", "x = 1;\ny = 2;\n");
        assert_eq!(map.line(1), Some("x = 1;"));
        assert_eq!(map.line(2), Some("y = 2;"));
        assert_eq!(map.line(3), Some(""));
        assert_eq!(map.line(4), None);
        assert_eq!(map.line(0), None);
    }

    #[test]
    fn test_position_mid_line() {
        let map = SourceMap::new("t.k", "x = 1;\ny = 2;");
        let pos = map.position(11);
        assert_eq!((pos.line, pos.column), (2, 5));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let map = SourceMap::new("t.k", "x");
        let pos = map.position(100);
        assert_eq!((pos.line, pos.column), (1, 2));
    }
}
