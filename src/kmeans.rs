use ndarray::parallel::prelude::*;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info};

use crate::centroid::{init_random, recompute, Centroid};
use crate::deck::Deck;
use crate::distance::hamming_distance;
use crate::error::ClusterError;

/// Decks grouped by cluster index, each cluster in deck input order
///
/// Rebuilt from scratch every round. Two assignments are equal iff they have the
/// same clusters holding equal decks in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterAssignment<'a> {
    clusters: Vec<Vec<&'a Deck>>,
}

impl<'a> ClusterAssignment<'a> {
    /// The assignment before the first round, it never equals a real one
    pub fn empty() -> Self {
        ClusterAssignment::default()
    }
    pub fn from_clusters(clusters: Vec<Vec<&'a Deck>>) -> Self {
        ClusterAssignment { clusters }
    }
    pub fn clusters(&self) -> &[Vec<&'a Deck>] {
        &self.clusters
    }
    pub fn cluster(&self, index: usize) -> Option<&[&'a Deck]> {
        self.clusters.get(index).map(|c| c.as_slice())
    }
    /// number of clusters, empty ones included
    pub fn len(&self) -> usize {
        self.clusters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
    /// total number of assigned decks
    pub fn deck_count(&self) -> usize {
        self.clusters.iter().map(|c| c.len()).sum()
    }
    fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(|c| c.len()).collect()
    }
}

/// Index of the centroid nearest to `deck`
/// only a strictly smaller distance replaces the current best, so ties go to the lowest index
fn nearest_centroid(deck: &Deck, centroids: &[Centroid]) -> Result<usize, ClusterError> {
    // larger than any distance a vocabulary can produce
    let mut min_dist = usize::MAX;
    let mut min_idx = 0usize;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = hamming_distance(deck.membership(), centroid.membership())?;
        if dist < min_dist {
            min_dist = dist;
            min_idx = j;
        }
    }
    Ok(min_idx)
}

/// Assigns each deck to its nearest centroid
///
/// Distances are computed in parallel but grouped in deck order, so the result
/// is the same as a sequential pass.
///
/// # Arguments
/// * `decks` every deck of the run
/// * `centroids` one centroid per cluster
pub fn assign<'a>(
    decks: &'a [Deck],
    centroids: &[Centroid],
) -> Result<ClusterAssignment<'a>, ClusterError> {
    if centroids.is_empty() {
        return Err(ClusterError::NoClusters);
    }
    let nearest = decks
        .par_iter()
        .map(|deck| nearest_centroid(deck, centroids))
        .collect::<Result<Vec<usize>, ClusterError>>()?;

    let mut clusters: Vec<Vec<&'a Deck>> = vec![Vec::new(); centroids.len()];
    for (deck, cluster) in decks.iter().zip(nearest) {
        clusters[cluster].push(deck);
    }
    Ok(ClusterAssignment { clusters })
}

/// true iff a round reproduced the previous round's assignment exactly
#[inline(always)]
pub fn has_converged(previous: &ClusterAssignment, current: &ClusterAssignment) -> bool {
    previous == current
}

/// Final state of a clustering run
#[derive(Debug, Clone)]
pub struct ClusteringOutcome<'a> {
    /// the last assignment computed
    pub assignment: ClusterAssignment<'a>,
    /// the centroids that produced `assignment`
    pub centroids: Vec<Centroid>,
    /// number of completed assign/recompute rounds
    pub rounds: usize,
    /// false if the round cap was hit before a fixed point
    pub converged: bool,
}

/// Clusters decks by card composition using hamming distance
/// centroids are card sets, not means
pub struct Kmeans<'a> {
    /// the decks being clustered
    decks: &'a [Deck],
    /// length of every membership vector
    vocabulary_size: usize,
    /// current centroid of each cluster
    centroids: Vec<Centroid>,
}

impl<'a> Kmeans<'a> {
    /// Initialize k centroids from random card draws
    ///
    /// # Arguments
    /// * `k` number of clusters
    /// * `decks` decks to cluster, vectorized over the same vocabulary
    /// * `vocabulary_size` size of the frozen vocabulary
    /// * `rng` random source for the card draws
    pub fn init_random<R: Rng>(
        k: usize,
        decks: &'a [Deck],
        vocabulary_size: usize,
        rng: &mut R,
    ) -> Result<Self, ClusterError> {
        let centroids = init_random(k, vocabulary_size, rng)?;
        Kmeans::with_centroids(decks, vocabulary_size, centroids)
    }
    /// Starts from fixed centroids instead of random ones
    pub fn with_centroids(
        decks: &'a [Deck],
        vocabulary_size: usize,
        centroids: Vec<Centroid>,
    ) -> Result<Self, ClusterError> {
        if decks.is_empty() {
            return Err(ClusterError::NoDecks);
        }
        if centroids.is_empty() {
            return Err(ClusterError::NoClusters);
        }
        if vocabulary_size == 0 {
            return Err(ClusterError::EmptyVocabulary);
        }
        for membership in decks
            .iter()
            .map(|d| d.membership())
            .chain(centroids.iter().map(|c| c.membership()))
        {
            if membership.len() != vocabulary_size {
                return Err(ClusterError::LengthMismatch {
                    expected: vocabulary_size,
                    found: membership.len(),
                });
            }
        }
        Ok(Kmeans {
            decks,
            vocabulary_size,
            centroids,
        })
    }
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }
    /// Runs assign/recompute rounds until an assignment repeats
    ///
    /// With `max_rounds` unset the loop has no bound. With it set, the run stops
    /// after that many completed rounds and reports `converged == false`.
    ///
    /// # Arguments
    /// * `max_rounds` optional cap on completed rounds
    /// * `on_round` called with the round number after each completed round
    pub fn run(
        &mut self,
        max_rounds: Option<usize>,
        on_round: &mut dyn FnMut(usize),
    ) -> Result<ClusteringOutcome<'a>, ClusterError> {
        let start_time = Instant::now();
        let mut previous = ClusterAssignment::empty();
        let mut rounds = 0usize;
        loop {
            let current = assign(self.decks, &self.centroids)?;
            debug!(round = rounds, sizes = ?current.sizes(), "assigned decks");

            let converged = has_converged(&previous, &current);
            let capped = max_rounds.map_or(false, |max| rounds >= max);
            if converged || capped {
                if converged {
                    info!(rounds, "converged in {}ms", start_time.elapsed().as_millis());
                } else {
                    info!(rounds, "stopped at round cap without converging");
                }
                return Ok(ClusteringOutcome {
                    assignment: current,
                    centroids: self.centroids.clone(),
                    rounds,
                    converged,
                });
            }

            self.centroids = recompute(&current, self.vocabulary_size)?;
            previous = current;
            rounds += 1;
            on_round(rounds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::CardId;
    use std::collections::BTreeSet;

    fn deck(label: &str, cards: &[CardId], vocabulary_size: usize) -> Deck {
        let cards: BTreeSet<CardId> = cards.iter().copied().collect();
        Deck::new(label, cards, vocabulary_size).unwrap()
    }

    fn centroid(cards: &[CardId], vocabulary_size: usize) -> Centroid {
        Centroid::from_cards(cards.to_vec(), vocabulary_size).unwrap()
    }

    #[test]
    fn test_assign_ties_go_to_lowest_centroid() {
        let decks = vec![deck("X", &[0, 1], 4)];
        // both centroids are at distance 2
        let centroids = vec![centroid(&[0, 2], 4), centroid(&[1, 3], 4)];
        let assignment = assign(&decks, &centroids).unwrap();
        assert_eq!(assignment.cluster(0).unwrap().len(), 1);
        assert!(assignment.cluster(1).unwrap().is_empty());
    }

    #[test]
    fn test_assign_keeps_far_decks() {
        // every deck is at the maximum possible distance from the only centroid
        let decks = vec![deck("X", &[0, 1], 4), deck("Y", &[0, 1], 4)];
        let centroids = vec![centroid(&[2, 3], 4)];
        let assignment = assign(&decks, &centroids).unwrap();
        assert_eq!(assignment.deck_count(), 2);
    }

    #[test]
    fn test_assign_preserves_input_order() {
        let decks = vec![
            deck("A", &[0], 3),
            deck("B", &[2], 3),
            deck("C", &[0, 1], 3),
        ];
        let centroids = vec![centroid(&[0], 3), centroid(&[2], 3)];
        let assignment = assign(&decks, &centroids).unwrap();
        let labels: Vec<&str> = assignment.clusters()[0].iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_assign_rejects_mismatched_lengths() {
        let decks = vec![deck("A", &[0], 3)];
        let centroids = vec![centroid(&[0], 4)];
        assert_eq!(
            assign(&decks, &centroids).unwrap_err(),
            ClusterError::LengthMismatch {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn test_empty_assignment_never_converges() {
        let decks = vec![deck("A", &[0], 2)];
        let centroids = vec![centroid(&[0], 2)];
        let assignment = assign(&decks, &centroids).unwrap();
        assert!(!has_converged(&ClusterAssignment::empty(), &assignment));
        assert!(has_converged(&assignment, &assignment.clone()));
    }

    #[test]
    fn test_convergence_uses_deck_equality() {
        let decks = vec![deck("A", &[0], 2), deck("A", &[0], 2)];
        let first = ClusterAssignment::from_clusters(vec![vec![&decks[0]], vec![]]);
        let second = ClusterAssignment::from_clusters(vec![vec![&decks[1]], vec![]]);
        assert!(has_converged(&first, &second));
    }

    #[test]
    fn test_run_respects_round_cap() {
        let decks = vec![deck("A", &[0, 1], 3), deck("B", &[2], 3)];
        let centroids = vec![centroid(&[0, 1], 3), centroid(&[2], 3)];
        let mut kmeans = Kmeans::with_centroids(&decks, 3, centroids).unwrap();
        let mut seen = Vec::new();
        let outcome = kmeans.run(Some(0), &mut |round| seen.push(round)).unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.rounds, 0);
        assert!(seen.is_empty());
        assert_eq!(outcome.assignment.deck_count(), 2);
    }

    #[test]
    fn test_with_centroids_validates() {
        let decks = vec![deck("A", &[0], 2)];
        assert_eq!(
            Kmeans::with_centroids(&[], 2, vec![centroid(&[0], 2)]).err(),
            Some(ClusterError::NoDecks)
        );
        assert_eq!(
            Kmeans::with_centroids(&decks, 2, vec![]).err(),
            Some(ClusterError::NoClusters)
        );
        let short = Centroid::from_cards(vec![0], 1).unwrap();
        assert_eq!(
            Kmeans::with_centroids(&decks, 2, vec![short]).err(),
            Some(ClusterError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
