//! Input cursor with position tracking and backtracking support
//!
//! A [`Cursor`] is a borrowed view over the source text plus a byte offset.
//! It is `Copy`, so every parse attempt works on its own copy and a failed
//! attempt leaves the caller's cursor untouched.

use std::fmt;

/// Byte range `[start, end)` consumed by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Span of a node built in code rather than parsed from text
    pub const DETACHED: Span = Span { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Text covered by this span, if it lies inside `src` on char boundaries
    pub fn slice<'s>(&self, src: &'s str) -> Option<&'s str> {
        src.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Saved cursor position, see [`Cursor::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl Mark {
    pub fn position(&self) -> usize {
        self.0
    }
}

/// Immutable view over input text with a byte position
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `src`
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// Get the current character without advancing
    pub fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Look ahead at the character `offset` chars past the current one
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    /// Cursor moved forward by `n` bytes.
    ///
    /// Clamps to the end of input and rounds down to a char boundary.
    pub fn advance(self, n: usize) -> Self {
        let mut pos = (self.pos + n).min(self.src.len());
        while !self.src.is_char_boundary(pos) {
            pos -= 1;
        }
        Cursor { src: self.src, pos }
    }

    /// Cursor moved past the current character
    pub fn bump(self) -> Self {
        match self.current() {
            Some(ch) => self.advance(ch.len_utf8()),
            None => self,
        }
    }

    pub fn checkpoint(&self) -> Mark {
        Mark(self.pos)
    }

    /// Cursor over the same text at a previously saved position
    pub fn restore(self, mark: Mark) -> Self {
        assert!(
            mark.0 <= self.src.len() && self.src.is_char_boundary(mark.0),
            "mark {} does not belong to this input",
            mark.0
        );
        Cursor {
            src: self.src,
            pos: mark.0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input
    pub fn remaining(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Check if at end of input
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Whole input, consumed or not
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Text between two byte offsets, clamped to the input
    pub fn substring(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.src.len());
        let start = start.min(end);
        self.src.get(start..end).unwrap_or("")
    }

    /// Span from this cursor to a later one over the same input
    pub fn span_to(&self, later: Cursor<'a>) -> Span {
        Span::new(self.pos, later.pos.max(self.pos))
    }

    /// Get line and column (1-based, in chars) for a byte position
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;

        for (i, ch) in self.src.char_indices() {
            if i >= pos {
                break;
            }
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (line, col)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cursor(pos={}, remaining={:?})",
            self.pos,
            self.remaining().chars().take(20).collect::<String>()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let cursor = Cursor::new("hello");
        assert_eq!(cursor.len(), 5);
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn test_current_and_advance() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.current(), Some('a'));

        let next = cursor.advance(1);
        assert_eq!(next.position(), 1);
        assert_eq!(next.current(), Some('b'));
        // the original is untouched
        assert_eq!(cursor.position(), 0);

        let end = next.advance(10);
        assert!(end.is_eof());
        assert_eq!(end.current(), None);
    }

    #[test]
    fn test_peek() {
        let cursor = Cursor::new("hello");
        assert_eq!(cursor.peek(0), Some('h'));
        assert_eq!(cursor.peek(4), Some('o'));
        assert_eq!(cursor.peek(5), None);
    }

    #[test]
    fn test_checkpoint_restore() {
        let cursor = Cursor::new("test");
        let mark = cursor.checkpoint();
        let moved = cursor.advance(2);
        assert_eq!(moved.current(), Some('s'));

        let back = moved.restore(mark);
        assert_eq!(back, cursor);
        assert_eq!(cursor.restore(cursor.checkpoint()), cursor);
    }

    #[test]
    #[should_panic]
    fn test_restore_foreign_mark() {
        let long = Cursor::new("a longer input").advance(10);
        Cursor::new("short").restore(long.checkpoint());
    }

    #[test]
    fn test_unicode_boundaries() {
        let cursor = Cursor::new("Hé世");
        assert_eq!(cursor.len(), 6);
        // lands inside 'é', rounds down
        assert_eq!(cursor.advance(2).position(), 1);
        assert_eq!(cursor.bump().bump().current(), Some('世'));
    }

    #[test]
    fn test_remaining_and_substring() {
        let cursor = Cursor::new("hello world").advance(6);
        assert_eq!(cursor.remaining(), "world");
        assert_eq!(cursor.substring(0, 5), "hello");
        assert_eq!(cursor.substring(6, 100), "world");
        assert!(cursor.starts_with("wor"));
    }

    #[test]
    fn test_span() {
        let start = Cursor::new("abcdef").advance(1);
        let end = start.advance(3);
        let span = start.span_to(end);
        assert_eq!(span, Span::new(1, 4));
        assert_eq!(span.len(), 3);
        assert_eq!(span.slice("abcdef"), Some("bcd"));
        assert_eq!(span.join(Span::new(4, 6)), Span::new(1, 6));
    }

    #[test]
    fn test_line_col() {
        let cursor = Cursor::new("line1\nline2\nline3");
        assert_eq!(cursor.line_col(0), (1, 1));
        assert_eq!(cursor.line_col(4), (1, 5));
        assert_eq!(cursor.line_col(6), (2, 1));
        assert_eq!(cursor.line_col(12), (3, 1));
    }

    #[test]
    fn test_empty() {
        let cursor = Cursor::new("");
        assert!(cursor.is_empty());
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), None);
    }
}
