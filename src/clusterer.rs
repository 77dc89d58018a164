use crate::accuracy::Evaluation;
use crate::constants::K;
use crate::deck::{Deck, DeckDefinition};
use crate::error::ClusterError;
use crate::kmeans::{ClusteringOutcome, Kmeans};
use crate::vocabulary::{CardVocabulary, IdentityRegistry};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// options for clustering a collection of decks
#[derive(Debug, Clone)]
pub struct ClustererOptions {
    /// decks in input order
    pub definitions: Vec<DeckDefinition>,
    /// number of clusters
    pub k: usize,
    /// stop after this many rounds even without a fixed point
    /// `None` keeps iterating until the assignment repeats
    pub max_rounds: Option<usize>,
    /// seed for the random centroids, `None` draws one from the os
    pub seed: Option<u64>,
}

impl ClustererOptions {
    pub fn new(definitions: Vec<DeckDefinition>) -> Self {
        ClustererOptions {
            definitions,
            k: K,
            max_rounds: None,
            seed: None,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteringReport {
    pub deck_count: usize,
    pub vocabulary_size: usize,
    pub rounds: usize,
    pub converged: bool,
    pub evaluation: Evaluation,
}

/// Owns the vectorized decks of a run
///
/// Building one is the two-phase ingestion: every definition registers its
/// cards first, the vocabulary is frozen, and only then are decks vectorized.
#[derive(Debug)]
pub struct Clusterer {
    vocabulary: CardVocabulary,
    decks: Vec<Deck>,
    k: usize,
    max_rounds: Option<usize>,
    seed: Option<u64>,
}

impl Clusterer {
    pub fn init(options: ClustererOptions) -> Result<Clusterer, ClusterError> {
        if options.definitions.is_empty() {
            return Err(ClusterError::NoDecks);
        }
        if options.k == 0 {
            return Err(ClusterError::NoClusters);
        }

        let mut registry = IdentityRegistry::new();
        let card_sets: Vec<_> = options
            .definitions
            .iter()
            .map(|definition| definition.register(&mut registry))
            .collect();
        let vocabulary = registry.freeze();
        if vocabulary.size() == 0 {
            return Err(ClusterError::EmptyVocabulary);
        }

        let decks = options
            .definitions
            .into_iter()
            .zip(card_sets)
            .map(|(definition, cards)| Deck::new(definition.label, cards, vocabulary.size()))
            .collect::<Result<Vec<Deck>, ClusterError>>()?;

        info!(
            decks = decks.len(),
            cards = vocabulary.size(),
            "vectorized decks"
        );
        Ok(Clusterer {
            vocabulary,
            decks,
            k: options.k,
            max_rounds: options.max_rounds,
            seed: options.seed,
        })
    }
    pub fn vocabulary(&self) -> &CardVocabulary {
        &self.vocabulary
    }
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }
    /// Clusters the decks from random centroids drawn with the configured seed
    pub fn run(&self, on_round: &mut dyn FnMut(usize)) -> Result<ClusteringOutcome, ClusterError> {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.run_with_rng(&mut rng, on_round)
    }
    /// Clusters the decks from random centroids drawn from `rng`
    pub fn run_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        on_round: &mut dyn FnMut(usize),
    ) -> Result<ClusteringOutcome, ClusterError> {
        let mut kmeans = Kmeans::init_random(self.k, &self.decks, self.vocabulary.size(), rng)?;
        kmeans.run(self.max_rounds, on_round)
    }
    /// Clusters, then scores the final assignment against the deck labels
    pub fn run_and_evaluate(
        &self,
        on_round: &mut dyn FnMut(usize),
    ) -> Result<ClusteringReport, ClusterError> {
        let outcome = self.run(on_round)?;
        self.report(&outcome)
    }
    pub fn report(&self, outcome: &ClusteringOutcome) -> Result<ClusteringReport, ClusterError> {
        let evaluation = Evaluation::evaluate(&outcome.assignment)?;
        Ok(ClusteringReport {
            deck_count: self.decks.len(),
            vocabulary_size: self.vocabulary.size(),
            rounds: outcome.rounds,
            converged: outcome.converged,
            evaluation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<DeckDefinition> {
        vec![
            DeckDefinition::new("Face", vec!["Leper Gnome".into(), "Arcane Golem".into()]),
            DeckDefinition::new("Face", vec!["Leper Gnome".into(), "Wolfrider".into()]),
            DeckDefinition::new("Control", vec!["Shield Slam".into(), "Brawl".into()]),
        ]
    }

    #[test]
    fn test_init_builds_vocabulary_before_vectors() {
        let clusterer = Clusterer::init(ClustererOptions::new(definitions())).unwrap();
        assert_eq!(clusterer.vocabulary().size(), 5);
        // the first deck was vectorized against the full vocabulary
        assert_eq!(clusterer.decks()[0].membership().len(), 5);
        assert_eq!(clusterer.vocabulary().lookup("Brawl"), Some(4));
    }

    #[test]
    fn test_init_valid_options() {
        assert_eq!(
            Clusterer::init(ClustererOptions::new(vec![])).err(),
            Some(ClusterError::NoDecks)
        );
        let mut options = ClustererOptions::new(definitions());
        options.k = 0;
        assert_eq!(Clusterer::init(options).err(), Some(ClusterError::NoClusters));
        let empty = vec![DeckDefinition::new("Face", vec![])];
        assert_eq!(
            Clusterer::init(ClustererOptions::new(empty)).err(),
            Some(ClusterError::EmptyVocabulary)
        );
    }

    #[test]
    fn test_seeded_runs_match() {
        let mut options = ClustererOptions::new(definitions());
        options.k = 2;
        options.seed = Some(1);
        options.max_rounds = Some(50);
        let clusterer = Clusterer::init(options).unwrap();
        let a = clusterer.run_and_evaluate(&mut |_| {}).unwrap();
        let b = clusterer.run_and_evaluate(&mut |_| {}).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.evaluation.total, 3);
        assert!(a.evaluation.accuracy >= 0.0 && a.evaluation.accuracy <= 1.0);
    }
}
