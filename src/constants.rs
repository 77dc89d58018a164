/// number of clusters decks are grouped into
pub const K: usize = 10;
/// maximum number of cards in a deck, also the size of a centroid card set
pub const DECK_SIZE: usize = 30;
/// name of the column holding a deck's archetype
pub const LABEL_COLUMN: &str = "type";
/// index of the first card column in the deck csv
pub const FIRST_CARD_COLUMN: usize = 5;
