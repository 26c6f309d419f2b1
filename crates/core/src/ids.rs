//! Collision-free identifiers for objects created on the destination side.
//!
//! Uniqueness is only guaranteed within one conversion run.

use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Kind of destination object an identifier is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Slide,
    Table,
    Image,
}

impl ObjectKind {
    /// Prefix put in front of the random token.
    pub fn prefix(&self) -> &'static str {
        match self {
            ObjectKind::Slide => "slide_",
            ObjectKind::Table => "table_",
            ObjectKind::Image => "image_",
        }
    }
}

type TokenSource = Box<dyn FnMut() -> String + Send>;

/// Issues prefixed random identifiers, retrying on collision.
pub struct IdAllocator {
    issued: HashSet<String>,
    tokens: TokenSource,
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("issued", &self.issued.len())
            .finish()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Allocator drawing random v4 UUID tokens.
    pub fn new() -> Self {
        Self::with_token_source(|| Uuid::new_v4().simple().to_string())
    }

    /// Allocator drawing tokens from a custom source.
    pub fn with_token_source<F>(source: F) -> Self
    where
        F: FnMut() -> String + Send + 'static,
    {
        Self {
            issued: HashSet::new(),
            tokens: Box::new(source),
        }
    }

    /// Issue a new identifier for an object kind.
    pub fn allocate(&mut self, kind: ObjectKind) -> String {
        loop {
            let candidate = format!("{}{}", kind.prefix(), (self.tokens)());
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            log::debug!("Identifier collision on {}, retrying", candidate);
        }
    }

    /// Number of identifiers issued so far.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    /// Whether an identifier was issued by this allocator.
    pub fn contains(&self, id: &str) -> bool {
        self.issued.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        let mut ids = IdAllocator::new();

        assert!(ids.allocate(ObjectKind::Slide).starts_with("slide_"));
        assert!(ids.allocate(ObjectKind::Table).starts_with("table_"));
        assert!(ids.allocate(ObjectKind::Image).starts_with("image_"));
        assert_eq!(ids.issued_count(), 3);
    }

    #[test]
    fn test_ids_fit_destination_limits() {
        let mut ids = IdAllocator::new();
        let id = ids.allocate(ObjectKind::Slide);

        // Leaves room for a placeholder suffix under a 50 character limit
        assert_eq!(id.len(), 38);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_collision_retries() {
        let mut tokens = vec!["a", "a", "a", "b"].into_iter();
        let mut ids = IdAllocator::with_token_source(move || {
            tokens.next().unwrap_or("z").to_string()
        });

        assert_eq!(ids.allocate(ObjectKind::Slide), "slide_a");
        assert_eq!(ids.allocate(ObjectKind::Slide), "slide_b");
        assert!(ids.contains("slide_a"));
        assert!(ids.contains("slide_b"));
    }

    #[test]
    fn test_same_token_different_kinds() {
        let mut ids = IdAllocator::with_token_source(|| "x".to_string());

        assert_eq!(ids.allocate(ObjectKind::Slide), "slide_x");
        assert_eq!(ids.allocate(ObjectKind::Table), "table_x");
    }

    #[test]
    fn test_many_unique() {
        let mut ids = IdAllocator::new();
        let all: HashSet<_> = (0..500).map(|_| ids.allocate(ObjectKind::Image)).collect();
        assert_eq!(all.len(), 500);
    }
}
