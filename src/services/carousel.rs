/// Position within a gallery's image set. Movement wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    /// Out-of-range indices wrap modulo `len`. Returns `None` for an empty set.
    pub fn new(index: usize, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            index: index % len,
            len,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.len
    }

    pub fn next(&self) -> Self {
        Self {
            index: (self.index + 1) % self.len,
            len: self.len,
        }
    }

    pub fn prev(&self) -> Self {
        let index = if self.index == 0 {
            self.len - 1
        } else {
            self.index - 1
        };
        Self {
            index,
            len: self.len,
        }
    }

    /// One-based `current/total` label.
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.index + 1, self.len)
    }
}
