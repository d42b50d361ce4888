use tracing::trace;

/// Prefix of every allocated name.
///
/// `#` is not a legal character in host symbol names, so allocated names can
/// never collide with a user-chosen symbol.
pub const PREFIX: &str = "rv#";

/// Monotonic allocator of collision-free random variable names.
///
/// The counter starts at zero and is incremented on every allocation.
/// Uniqueness holds for the lifetime of the allocator; names are never
/// persisted so nothing is promised across allocators.
///
/// # Example
/// ```
/// use symstat::util::names::FreshNames;
///
/// let mut names = FreshNames::new();
/// let a = names.allocate();
/// let b = names.allocate();
///
/// assert_eq!(a, "rv#0");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Default)]
pub struct FreshNames {
    next: u64,
}

impl FreshNames {
    /// Creates an allocator whose first name is `rv#0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a name distinct from every name this allocator returned before.
    pub fn allocate(&mut self) -> String {
        let id = self.next;
        self.next += 1;

        let name = format!("{PREFIX}{id}");
        trace!(%name, "allocated random variable name");
        name
    }

    /// Number of names handed out so far.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_never_repeat() {
        let mut names = FreshNames::new();
        let all: HashSet<String> = (0..10_000).map(|_| names.allocate()).collect();

        assert_eq!(all.len(), 10_000);
        assert_eq!(names.allocated(), 10_000);
    }

    #[test]
    fn names_cannot_be_user_symbols() {
        let mut names = FreshNames::new();
        assert!(names.allocate().contains('#'));
    }
}
