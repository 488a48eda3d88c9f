use std::num::NonZeroUsize;

use crate::caps;

/// One page of a listing. `has_more` is set iff the service truncated the
/// listing at the requested limit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub values: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new_empty() -> Self {
        Self {
            values: Vec::new(),
            has_more: false,
        }
    }

    pub fn new(values: impl Into<Vec<T>>, has_more: bool) -> Self {
        Self {
            values: values.into(),
            has_more,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            values: self.values.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }
}

/// Page size for a list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimit(NonZeroUsize);

impl ListLimit {
    pub const DEFAULT: Self = Self(NonZeroUsize::new(caps::DEFAULT_PAGE_SIZE).unwrap());

    /// Zero falls back to the default; anything above `max` is capped at `max`.
    pub fn capped(value: usize, max: usize) -> Self {
        let max = NonZeroUsize::new(max).unwrap_or(NonZeroUsize::MIN);
        Self(
            NonZeroUsize::new(value)
                .unwrap_or(Self::DEFAULT.0)
                .min(max),
        )
    }

    pub fn get(&self) -> NonZeroUsize {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0.get()
    }
}

impl Default for ListLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<ListLimit> for usize {
    fn from(value: ListLimit) -> Self {
        value.as_usize()
    }
}
