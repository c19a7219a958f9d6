//! Allocation-free query helpers.

/// Which of a group's modules a query walks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModuleFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

/// Range of a caller-supplied buffer filled by one query.
///
/// Queries append to the buffer instead of allocating, so several queries
/// can share one scratch vector; the span tells each caller which part is
/// theirs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModuleSpan {
    pub start: usize,
    pub count: usize,
}

impl ModuleSpan {
    /// Span covering everything pushed onto `buffer` since `start`.
    pub fn since<T>(start: usize, buffer: &[T]) -> Self {
        Self {
            start,
            count: buffer.len() - start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The part of `buffer` this span covers.
    pub fn slice<'b, T>(&self, buffer: &'b [T]) -> &'b [T] {
        &buffer[self.start..self.start + self.count]
    }
}
