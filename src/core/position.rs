/*!
# Source position types (SourceSpan, LineIndex)

Offsets shared by the native binding and the canonical tree. Synthetic nodes
carry the `-1` sentinel in place of a real offset and/or length.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sentinel for an offset or length that has no meaningful source location.
pub const UNKNOWN_OFFSET: i32 = -1;

/// Offset + length within one compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: i32,
    pub length: i32,
}

impl SourceSpan {
    pub const UNKNOWN: SourceSpan = SourceSpan { start: UNKNOWN_OFFSET, length: UNKNOWN_OFFSET };

    pub fn new(start: i32, length: i32) -> Self { Self { start, length } }

    /// Span with unknown start but a known textual length (opaque text leaves).
    pub fn detached(length: usize) -> Self {
        Self { start: UNKNOWN_OFFSET, length: length as i32 }
    }

    pub fn is_known(&self) -> bool { self.start >= 0 && self.length >= 0 }

    /// Exclusive end offset, `None` when either part is unknown or the end overflows.
    pub fn end(&self) -> Option<i32> {
        if self.is_known() { self.start.checked_add(self.length) } else { None }
    }

    /// Byte range for slicing source text.
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        self.end().map(|end| self.start as usize..end as usize)
    }
}

impl Default for SourceSpan {
    fn default() -> Self { Self::UNKNOWN }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.length)
    }
}

/// Zero-based line/column of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Line index for fast offset->(line,column) mapping.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts.
    line_starts: Arc<Vec<u32>>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len() / 32 + 1);
        starts.push(0u32);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' { starts.push((i + 1) as u32); }
        }
        Self { line_starts: Arc::new(starts) }
    }

    pub fn line_count(&self) -> usize { self.line_starts.len() }

    /// `None` for the `-1` sentinel.
    pub fn locate(&self, offset: i32) -> Option<LineColumn> {
        if offset < 0 { return None; }
        let offset = offset as u32;
        let line = self.line_starts.partition_point(|&s| s <= offset).saturating_sub(1);
        Some(LineColumn { line, column: (offset - self.line_starts[line]) as usize })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_span_has_no_range() {
        assert!(!SourceSpan::UNKNOWN.is_known());
        assert_eq!(SourceSpan::UNKNOWN.range(), None);
        assert_eq!(SourceSpan::detached(3), SourceSpan::new(-1, 3));
        assert_eq!(SourceSpan::new(4, 2).range(), Some(4..6));
    }

    #[test]
    fn overflowing_span_has_no_end() {
        let span = SourceSpan::new(2_147_483_000, 1000);
        assert!(span.is_known());
        assert_eq!(span.end(), None);
        assert_eq!(span.range(), None);
        assert_eq!(SourceSpan::new(i32::MAX, 0).end(), Some(i32::MAX));
    }

    #[test]
    fn line_index_locates_offsets() {
        let text = "line1\nline2\nlast";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 3);
        let p = idx.locate(7).unwrap(); // 'i' in line2
        assert_eq!(p.line, 1);
        assert_eq!(p.column, 1);
        assert_eq!(p.to_string(), "2:2");
        assert_eq!(idx.locate(-1), None);
    }
}
