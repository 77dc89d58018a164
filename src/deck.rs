use crate::error::ClusterError;
use crate::membership::{to_membership_vector, MembershipVector};
use crate::vocabulary::{CardId, IdentityRegistry};
use std::collections::BTreeSet;

/// A deck as read from the input, before any card has an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDefinition {
    /// ground-truth archetype
    pub label: String,
    /// card names in column order, empty cells already skipped
    pub cards: Vec<String>,
}

impl DeckDefinition {
    pub fn new<S: Into<String>>(label: S, cards: Vec<String>) -> Self {
        DeckDefinition {
            label: label.into(),
            cards,
        }
    }
    /// Registers every card of this deck and returns its identity set
    pub fn register(&self, registry: &mut IdentityRegistry) -> BTreeSet<CardId> {
        self.cards
            .iter()
            .map(|name| registry.identity_for(name))
            .collect()
    }
}

/// A labeled deck and its membership vector over the frozen vocabulary
///
/// Decks are immutable once built. Two decks are equal iff their labels and
/// their card-identity sets are equal, the vector is derived and not compared.
#[derive(Debug, Clone)]
pub struct Deck {
    label: String,
    cards: BTreeSet<CardId>,
    membership: MembershipVector,
}

impl Deck {
    /// Creates a deck and vectorizes its cards
    ///
    /// # Arguments
    /// * `label` ground-truth archetype
    /// * `cards` card identities, all below `vocabulary_size`
    /// * `vocabulary_size` size of the frozen vocabulary
    pub fn new<S: Into<String>>(
        label: S,
        cards: BTreeSet<CardId>,
        vocabulary_size: usize,
    ) -> Result<Self, ClusterError> {
        let membership = to_membership_vector(&cards, vocabulary_size)?;
        Ok(Deck {
            label: label.into(),
            cards,
            membership,
        })
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn cards(&self) -> &BTreeSet<CardId> {
        &self.cards
    }
    pub fn membership(&self) -> &MembershipVector {
        &self.membership
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.cards == other.cards
    }
}

impl Eq for Deck {}
