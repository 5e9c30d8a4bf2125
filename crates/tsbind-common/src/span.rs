//! Byte-offset spans into declaration source text.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Span covering `len` bytes starting at `start`.
    #[inline]
    pub const fn at(start: u32, len: u32) -> Self {
        Span {
            start,
            end: start + len,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice `source` by this span, returning "" when out of bounds.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        if start <= end && end <= source.len() {
            source.get(start..end).unwrap_or("")
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_text_is_bounds_checked() {
        let source = "interface Foo {}";
        assert_eq!(Span::new(10, 13).text(source), "Foo");
        assert_eq!(Span::new(10, 400).text(source), "");
    }

    #[test]
    fn span_merge_covers_both() {
        let merged = Span::new(4, 8).merge(Span::at(2, 3));
        assert_eq!(merged, Span::new(2, 8));
        assert_eq!(merged.len(), 6);
        assert!(merged.contains(7));
        assert!(!merged.contains(8));
    }
}
