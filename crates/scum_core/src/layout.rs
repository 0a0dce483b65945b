use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn fits(&self, total_len: usize) -> bool {
        self.end <= total_len
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Where one named property lives inside a body simulation blob.
///
/// On disk a property is `name, pad(5), type tag, pad(10), value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: ByteRange,
    pub type_tag: ByteRange,
    pub value: ByteRange,
}
