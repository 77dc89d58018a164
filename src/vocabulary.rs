use std::collections::HashMap;

/// integer identity of a distinct card name
/// identities are dense, starting at 0, in first-seen order
pub type CardId = usize;

/// Hands out card identities while deck definitions are being ingested
///
/// The registry is the only place the vocabulary grows. Once every deck has been
/// read it is consumed by `freeze`, so no vector can be built against a vocabulary
/// that is still changing size.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: HashMap<String, CardId>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        IdentityRegistry::default()
    }
    /// Returns the identity for `name`, assigning the next one if it is new
    ///
    /// # Example
    /// ```
    /// use deck_clustering::vocabulary::IdentityRegistry;
    /// let mut registry = IdentityRegistry::new();
    /// assert_eq!(registry.identity_for("Fireball"), 0);
    /// assert_eq!(registry.identity_for("Frostbolt"), 1);
    /// assert_eq!(registry.identity_for("Fireball"), 0);
    /// ```
    pub fn identity_for(&mut self, name: &str) -> CardId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.ids.len();
        self.ids.insert(name.to_string(), id);
        id
    }
    /// number of distinct cards seen so far
    pub fn size(&self) -> usize {
        self.ids.len()
    }
    /// Ends ingestion and returns the immutable vocabulary
    pub fn freeze(self) -> CardVocabulary {
        CardVocabulary {
            size: self.ids.len(),
            ids: self.ids,
        }
    }
}

/// A frozen card vocabulary
/// its size is the length of every membership vector in a run
#[derive(Debug, Clone)]
pub struct CardVocabulary {
    ids: HashMap<String, CardId>,
    size: usize,
}

impl CardVocabulary {
    #[inline(always)]
    pub const fn size(&self) -> usize {
        self.size
    }
    pub fn lookup(&self, name: &str) -> Option<CardId> {
        self.ids.get(name).copied()
    }
    /// Card names ordered by identity
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![""; self.size];
        for (name, id) in &self.ids {
            names[*id] = name.as_str();
        }
        names
    }
}
