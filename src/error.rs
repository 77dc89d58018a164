use thiserror::Error;

/// Errors raised by the clustering core
///
/// Every one of these is fatal to a run, nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClusterError {
    /// two vectors (or a vector and the vocabulary) disagree on length
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// a card identity that the frozen vocabulary never handed out
    #[error("card identity {identity} out of range for vocabulary of size {vocabulary_size}")]
    IdentityOutOfRange {
        identity: usize,
        vocabulary_size: usize,
    },
    #[error("no decks to cluster")]
    NoDecks,
    #[error("cluster count must be greater than zero")]
    NoClusters,
    #[error("vocabulary is empty")]
    EmptyVocabulary,
}
