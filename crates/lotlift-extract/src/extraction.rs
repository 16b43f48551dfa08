//! Tagged result of a single field extraction attempt.

/// Outcome of looking for one field on a page.
///
/// A miss is a normal outcome, not an error; the empty string is a real
/// value some sites genuinely display and must stay distinguishable from
/// "not present at all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// The field was located and its value captured
    Found(T),
    /// The field is not present on this page
    NotFound,
}

impl<T> Extraction<T> {
    /// Whether a value was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert to an `Option`, dropping the tag.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Map the found value, preserving a miss.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Extraction<U> {
        match self {
            Self::Found(value) => Extraction::Found(f(value)),
            Self::NotFound => Extraction::NotFound,
        }
    }

    /// Chain another attempt that runs only on a miss.
    #[must_use]
    pub fn or_else<F: FnOnce() -> Extraction<T>>(self, f: F) -> Extraction<T> {
        match self {
            Self::Found(value) => Self::Found(value),
            Self::NotFound => f(),
        }
    }

    /// The found value, or the type's default on a miss.
    #[must_use]
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Found(value) => value,
            Self::NotFound => T::default(),
        }
    }
}

impl<T> From<Option<T>> for Extraction<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Found(v),
            None => Self::NotFound,
        }
    }
}

/// Treat an empty or whitespace-only capture as a miss.
#[must_use]
pub fn non_empty(value: String) -> Extraction<String> {
    if value.trim().is_empty() {
        Extraction::NotFound
    } else {
        Extraction::Found(value)
    }
}
