use crate::constants::DECK_SIZE;
use crate::error::ClusterError;
use crate::kmeans::ClusterAssignment;
use crate::membership::{to_membership_vector, MembershipVector};
use crate::vocabulary::CardId;
use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use rand::Rng;
use tracing::warn;

/// The representative card set of one cluster
///
/// `cards` is authoritative, `membership` is its projection onto the vocabulary
/// and is rebuilt whenever a new centroid is made. A centroid never has more
/// than `DECK_SIZE` set positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Centroid {
    cards: Vec<CardId>,
    membership: MembershipVector,
}

impl Centroid {
    /// Creates a centroid from a card set
    /// the set may hold duplicates, it may not hold more than `DECK_SIZE` cards
    pub fn from_cards(cards: Vec<CardId>, vocabulary_size: usize) -> Result<Self, ClusterError> {
        if cards.len() > DECK_SIZE {
            return Err(ClusterError::LengthMismatch {
                expected: DECK_SIZE,
                found: cards.len(),
            });
        }
        let membership = to_membership_vector(&cards, vocabulary_size)?;
        Ok(Centroid { cards, membership })
    }
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
    pub fn membership(&self) -> &MembershipVector {
        &self.membership
    }
}

/// Creates `k` centroids of `DECK_SIZE` cards each drawn uniformly from the vocabulary
///
/// Draws are made with replacement, so a centroid may end up with fewer than
/// `DECK_SIZE` distinct cards.
///
/// # Arguments
/// * `k` number of centroids
/// * `vocabulary_size` size of the frozen vocabulary
/// * `rng` random source, seed it for reproducible runs
pub fn init_random<R: Rng>(
    k: usize,
    vocabulary_size: usize,
    rng: &mut R,
) -> Result<Vec<Centroid>, ClusterError> {
    if k == 0 {
        return Err(ClusterError::NoClusters);
    }
    if vocabulary_size == 0 {
        return Err(ClusterError::EmptyVocabulary);
    }
    (0..k)
        .map(|_| {
            let cards = (0..DECK_SIZE)
                .map(|_| rng.gen_range(0, vocabulary_size))
                .collect();
            Centroid::from_cards(cards, vocabulary_size)
        })
        .collect()
}

/// Picks `n` positions by repeatedly taking the current maximum and zeroing it
///
/// The first position holding the maximum is taken, so ties go to the lowest
/// index. Once every frequency has been zeroed the maximum is 0 and position 0
/// is taken again, which leaves duplicates in the result.
pub fn top_identities(frequencies: &ArrayView1<u32>, n: usize) -> Vec<CardId> {
    let mut frequencies = frequencies.to_owned();
    let mut chosen = Vec::with_capacity(n);
    if frequencies.is_empty() {
        return chosen;
    }
    for _ in 0..n {
        let mut max = 0u32;
        for &frequency in frequencies.iter() {
            if frequency > max {
                max = frequency;
            }
        }
        let idx = frequencies.iter().position(|f| *f == max).unwrap_or(0);
        chosen.push(idx);
        frequencies[idx] = 0;
    }
    chosen
}

/// Card set given to a cluster that lost all of its decks
/// it is the lowest `DECK_SIZE` identities, whatever those cards are
pub fn collapsed_cards(vocabulary_size: usize) -> Vec<CardId> {
    (0..DECK_SIZE.min(vocabulary_size)).collect()
}

/// Sums the membership vectors of a cluster's decks position-wise
pub fn card_frequencies<'a, I>(
    members: I,
    vocabulary_size: usize,
) -> Result<Array1<u32>, ClusterError>
where
    I: IntoIterator<Item = &'a MembershipVector>,
{
    let mut frequencies = Array1::<u32>::zeros(vocabulary_size);
    for membership in members {
        if membership.len() != vocabulary_size {
            return Err(ClusterError::LengthMismatch {
                expected: vocabulary_size,
                found: membership.len(),
            });
        }
        frequencies.zip_mut_with(&membership.view(), |f, &bit| {
            if bit {
                *f += 1;
            }
        });
    }
    Ok(frequencies)
}

/// Recomputes every cluster's centroid from its current members
///
/// The new card set is the `DECK_SIZE` most frequent cards of the cluster, see
/// `top_identities`. An empty cluster collapses onto `collapsed_cards`.
pub fn recompute(
    assignment: &ClusterAssignment,
    vocabulary_size: usize,
) -> Result<Vec<Centroid>, ClusterError> {
    assignment
        .clusters()
        .par_iter()
        .enumerate()
        .map(|(i, members)| {
            if members.is_empty() {
                warn!(cluster = i, "empty cluster collapsed onto the lowest card identities");
                return Centroid::from_cards(collapsed_cards(vocabulary_size), vocabulary_size);
            }
            let frequencies =
                card_frequencies(members.iter().map(|deck| deck.membership()), vocabulary_size)?;
            let cards = top_identities(&frequencies.view(), DECK_SIZE);
            Centroid::from_cards(cards, vocabulary_size)
        })
        .collect()
}
